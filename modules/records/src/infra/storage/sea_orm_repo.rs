//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so they can be built
//! with a `DatabaseConnection` or a transaction.

use anyhow::Context;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::contract::model::{NewSched, NewUser, RecordId, Sched, User};
use crate::domain::repo::{SchedsRepository, UsersRepository};
use crate::infra::storage::entity::scheds::{
    ActiveModel as SchedAM, Column as SchedColumn, Entity as SchedEntity,
};
use crate::infra::storage::entity::users::{
    ActiveModel as UserAM, Column as UserColumn, Entity as UserEntity,
};

/// `%needle%` with LIKE metacharacters in `needle` matched literally.
fn containment_pattern(needle: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

/// Users table adapter.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = UserEntity::find()
            .order_by_asc(UserColumn::Id)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, needle: &str) -> anyhow::Result<Vec<User>> {
        let rows = UserEntity::find()
            .filter(
                Condition::any()
                    .add(UserColumn::Fullname.like(containment_pattern(needle)))
                    .add(UserColumn::Address.like(containment_pattern(needle))),
            )
            .order_by_asc(UserColumn::Id)
            .all(&self.conn)
            .await
            .context("search failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str, limit: u64) -> anyhow::Result<Vec<User>> {
        let rows = UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .order_by_asc(UserColumn::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, u: NewUser) -> anyhow::Result<User> {
        let m = UserAM {
            id: NotSet,
            fullname: Set(u.fullname),
            username: Set(u.username),
            password: Set(u.password),
            address: Set(u.address),
        };
        let stored = m.insert(&self.conn).await.context("insert failed")?;
        Ok(stored.into())
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        let m = UserAM {
            id: Set(u.id),
            fullname: Set(u.fullname),
            username: Set(u.username),
            password: Set(u.password),
            address: Set(u.address),
        };
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let res = UserEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}

/// Schedules table adapter.
pub struct SeaOrmSchedsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmSchedsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> SchedsRepository for SeaOrmSchedsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<Sched>> {
        let found = SchedEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn list(&self) -> anyhow::Result<Vec<Sched>> {
        let rows = SchedEntity::find()
            .order_by_asc(SchedColumn::Id)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, s: NewSched) -> anyhow::Result<Sched> {
        let m = SchedAM {
            id: NotSet,
            date: Set(s.date),
            time: Set(s.time),
            title: Set(s.title),
            reason: Set(s.reason),
        };
        let stored = m.insert(&self.conn).await.context("insert failed")?;
        Ok(stored.into())
    }

    async fn update(&self, s: Sched) -> anyhow::Result<()> {
        let m = SchedAM {
            id: Set(s.id),
            date: Set(s.date),
            time: Set(s.time),
            title: Set(s.title),
            reason: Set(s.reason),
        };
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let res = SchedEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
