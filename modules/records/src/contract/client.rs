use async_trait::async_trait;

use crate::contract::model::{
    Credentials, NewSched, NewUser, RecordId, Sched, SchedPatch, User, UserPatch,
};

/// Public API of the records module for in-process consumers.
/// Errors carry a [`crate::contract::error::RecordsError`] inside the `anyhow::Error`.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> anyhow::Result<User>;

    async fn get_user(&self, id: RecordId) -> anyhow::Result<User>;

    /// All users ordered by id
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;

    /// Substring match on fullname or address; empty query returns everything
    async fn search_users(&self, query: &str) -> anyhow::Result<Vec<User>>;

    async fn update_user(&self, id: RecordId, patch: UserPatch) -> anyhow::Result<User>;

    async fn delete_user(&self, id: RecordId) -> anyhow::Result<()>;

    /// Verify a login name + secret pair and return the matching account
    async fn authenticate(&self, credentials: Credentials) -> anyhow::Result<User>;

    async fn create_sched(&self, new_sched: NewSched) -> anyhow::Result<Sched>;

    async fn get_sched(&self, id: RecordId) -> anyhow::Result<Sched>;

    async fn list_scheds(&self) -> anyhow::Result<Vec<Sched>>;

    async fn update_sched(&self, id: RecordId, patch: SchedPatch) -> anyhow::Result<Sched>;

    async fn delete_sched(&self, id: RecordId) -> anyhow::Result<()>;
}
