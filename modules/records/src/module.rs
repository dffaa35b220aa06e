use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::{openapi, routes};
use crate::config::RecordsConfig;
use crate::contract::client::RecordsApi;
use crate::domain::chat::ChatBot;
use crate::domain::service::Service;
use crate::gateways::local::RecordsLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmSchedsRepository, SeaOrmUsersRepository};

/// Users, schedules, login and chat, wired over one database connection.
#[derive(Clone)]
pub struct RecordsModule {
    service: Arc<Service>,
    chat: Arc<ChatBot>,
    config: RecordsConfig,
}

impl RecordsModule {
    pub const NAME: &'static str = "records";

    /// Build the module over an already-migrated connection.
    pub fn new(db: DatabaseConnection, config: RecordsConfig) -> Self {
        let users = Arc::new(SeaOrmUsersRepository::new(db.clone()));
        let scheds = Arc::new(SeaOrmSchedsRepository::new(db));
        let service = Arc::new(Service::new(users, scheds));
        let chat = Arc::new(ChatBot::new(&config.chat));

        info!(
            legacy_routes = config.legacy_routes,
            extra_replies = config.chat.replies.len(),
            "records module initialized"
        );
        Self {
            service,
            chat,
            config,
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        info!("Running records migrations");
        Migrator::up(db, None)
            .await
            .context("records migrations failed")?;
        Ok(())
    }

    pub fn config(&self) -> &RecordsConfig {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn RecordsApi> {
        Arc::new(RecordsLocalClient::new(self.service()))
    }

    pub fn register_rest(&self, router: Router) -> Router {
        routes::register_routes(
            router,
            self.service(),
            Arc::clone(&self.chat),
            self.config.legacy_routes,
        )
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        openapi::document()
    }
}
