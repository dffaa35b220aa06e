use sea_orm::entity::prelude::*;

use crate::contract::model::Sched;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scheds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sched {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            date: m.date,
            time: m.time,
            title: m.title,
            reason: m.reason,
        }
    }
}
