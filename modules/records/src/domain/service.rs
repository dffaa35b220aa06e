use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    Credentials, NewSched, NewUser, RecordId, RecordKind, Sched, SchedPatch, User, UserPatch,
};
use crate::domain::credentials::{dummy_compare, secrets_match};
use crate::domain::error::DomainError;
use crate::domain::repo::{SchedsRepository, UsersRepository};
use crate::domain::upsert::{check_required, Merge};

/// Domain service with the record rules for users and schedules.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    scheds: Arc<dyn SchedsRepository>,
}

impl Service {
    pub fn new(users: Arc<dyn UsersRepository>, scheds: Arc<dyn SchedsRepository>) -> Self {
        Self { users, scheds }
    }

    // ---- users ----

    #[instrument(name = "records.service.create_user", skip_all)]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        check_required(&new_user)?;

        let user = self.users.insert(new_user).await?;
        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "records.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: RecordId) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "records.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.list().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    /// Empty query means "everything"; otherwise substring match on fullname or address.
    #[instrument(name = "records.service.search_users", skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, DomainError> {
        let users = if query.is_empty() {
            self.users.list().await?
        } else {
            self.users.search(query).await?
        };
        debug!("Search matched {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "records.service.update_user", skip(self, patch), fields(user_id = id))]
    pub async fn update_user(&self, id: RecordId, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");
        let mut current = self.get_user(id).await?;
        current.merge(patch);
        self.users.update(current.clone()).await?;
        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "records.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: RecordId) -> Result<(), DomainError> {
        info!("Deleting user");
        ensure_deleted(self.users.delete(id).await?, RecordKind::User, id)
    }

    /// Fails closed: unknown, ambiguous and wrong-secret logins all return
    /// `Authentication`, after one secret comparison each.
    #[instrument(
        name = "records.service.authenticate",
        skip_all,
        fields(username = %credentials.username)
    )]
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, DomainError> {
        let mut candidates = self
            .users
            .find_by_username(&credentials.username, 2)
            .await?;

        match candidates.len() {
            1 => {
                let user = candidates.remove(0);
                if secrets_match(&credentials.password, user.password.as_deref()) {
                    info!(user_id = user.id, "Login accepted");
                    Ok(user)
                } else {
                    debug!("Secret mismatch");
                    Err(DomainError::Authentication)
                }
            }
            0 => {
                dummy_compare(&credentials.password);
                debug!("No user with that login name");
                Err(DomainError::Authentication)
            }
            _ => {
                dummy_compare(&credentials.password);
                warn!("Login name is shared by several users; refusing login");
                Err(DomainError::Authentication)
            }
        }
    }

    // ---- schedules ----

    #[instrument(name = "records.service.create_sched", skip_all)]
    pub async fn create_sched(&self, new_sched: NewSched) -> Result<Sched, DomainError> {
        info!("Creating new schedule");
        check_required(&new_sched)?;

        let sched = self.scheds.insert(new_sched).await?;
        info!("Successfully created schedule with id={}", sched.id);
        Ok(sched)
    }

    #[instrument(name = "records.service.get_sched", skip(self), fields(sched_id = id))]
    pub async fn get_sched(&self, id: RecordId) -> Result<Sched, DomainError> {
        debug!("Getting schedule by id");
        self.scheds
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::sched_not_found(id))
    }

    #[instrument(name = "records.service.list_scheds", skip(self))]
    pub async fn list_scheds(&self) -> Result<Vec<Sched>, DomainError> {
        let scheds = self.scheds.list().await?;
        debug!("Listed {} schedules", scheds.len());
        Ok(scheds)
    }

    #[instrument(name = "records.service.update_sched", skip(self, patch), fields(sched_id = id))]
    pub async fn update_sched(
        &self,
        id: RecordId,
        patch: SchedPatch,
    ) -> Result<Sched, DomainError> {
        info!("Updating schedule");
        let mut current = self.get_sched(id).await?;
        current.merge(patch);
        self.scheds.update(current.clone()).await?;
        info!("Successfully updated schedule");
        Ok(current)
    }

    #[instrument(name = "records.service.delete_sched", skip(self), fields(sched_id = id))]
    pub async fn delete_sched(&self, id: RecordId) -> Result<(), DomainError> {
        info!("Deleting schedule");
        ensure_deleted(self.scheds.delete(id).await?, RecordKind::Sched, id)
    }
}

/// A delete that touched no row is a store failure, not a silent success.
fn ensure_deleted(deleted: bool, kind: RecordKind, id: RecordId) -> Result<(), DomainError> {
    if deleted {
        info!("Successfully deleted {kind}");
        Ok(())
    } else {
        warn!("Delete affected no rows");
        Err(DomainError::store(format!("no {kind} row with id {id}")))
    }
}
