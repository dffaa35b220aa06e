use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scheds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scheds::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scheds::Date).string().null())
                    .col(ColumnDef::new(Scheds::Time).string().null())
                    .col(ColumnDef::new(Scheds::Title).string().null())
                    .col(ColumnDef::new(Scheds::Reason).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scheds::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scheds {
    Table,
    Id,
    Date,
    Time,
    Title,
    Reason,
}
