use async_trait::async_trait;

use crate::contract::model::{NewSched, NewUser, RecordId, Sched, User};

/// Port for user persistence. Implemented by infra adapters; the domain
/// service only sees this trait.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<User>>;

    /// All rows ordered by id.
    async fn list(&self) -> anyhow::Result<Vec<User>>;

    /// Rows whose fullname or address contains `needle`, ordered by id.
    async fn search(&self, needle: &str) -> anyhow::Result<Vec<User>>;

    /// Rows whose username equals `username` exactly, at most `limit` of them.
    async fn find_by_username(&self, username: &str, limit: u64) -> anyhow::Result<Vec<User>>;

    /// Persist a new row and return it with its assigned id.
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User>;

    /// Overwrite every column of an existing row.
    async fn update(&self, user: User) -> anyhow::Result<()>;

    /// Returns false when no row had that id.
    async fn delete(&self, id: RecordId) -> anyhow::Result<bool>;
}

/// Port for schedule persistence.
#[async_trait]
pub trait SchedsRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<Sched>>;

    async fn list(&self) -> anyhow::Result<Vec<Sched>>;

    async fn insert(&self, new_sched: NewSched) -> anyhow::Result<Sched>;

    async fn update(&self, sched: Sched) -> anyhow::Result<()>;

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool>;
}
