use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::RecordsApi,
    error::RecordsError,
    model::{Credentials, NewSched, NewUser, RecordId, Sched, SchedPatch, User, UserPatch},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the RecordsApi trait that delegates to the domain service
pub struct RecordsLocalClient {
    service: Arc<Service>,
}

impl RecordsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RecordsApi for RecordsLocalClient {
    async fn create_user(&self, new_user: NewUser) -> anyhow::Result<User> {
        self.service
            .create_user(new_user)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn get_user(&self, id: RecordId) -> anyhow::Result<User> {
        self.service
            .get_user(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.service
            .list_users()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn search_users(&self, query: &str) -> anyhow::Result<Vec<User>> {
        self.service
            .search_users(query)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_user(&self, id: RecordId, patch: UserPatch) -> anyhow::Result<User> {
        self.service
            .update_user(id, patch)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn delete_user(&self, id: RecordId) -> anyhow::Result<()> {
        self.service
            .delete_user(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn authenticate(&self, credentials: Credentials) -> anyhow::Result<User> {
        self.service
            .authenticate(credentials)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn create_sched(&self, new_sched: NewSched) -> anyhow::Result<Sched> {
        self.service
            .create_sched(new_sched)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn get_sched(&self, id: RecordId) -> anyhow::Result<Sched> {
        self.service
            .get_sched(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn list_scheds(&self) -> anyhow::Result<Vec<Sched>> {
        self.service
            .list_scheds()
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_sched(&self, id: RecordId, patch: SchedPatch) -> anyhow::Result<Sched> {
        self.service
            .update_sched(id, patch)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn delete_sched(&self, id: RecordId) -> anyhow::Result<()> {
        self.service
            .delete_sched(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::NotFound { kind, id } => RecordsError::not_found(kind, id),
        DomainError::Validation { missing } => {
            RecordsError::validation(format!("missing required fields: {}", missing.join(", ")))
        }
        DomainError::Authentication => RecordsError::Unauthorized,
        DomainError::Store { .. } => RecordsError::Internal,
    };

    anyhow::Error::new(contract_error)
}
