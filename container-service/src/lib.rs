pub mod config;
pub mod dtos;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::ServiceConfig;
use crate::services::{
    bootstrap_demo_data, AuthService, BootstrapOutcome, ContainerService, FileSessionStorage,
    InMemoryContainerRepository, InMemorySessionStorage, InMemoryUserRepository, SessionHolder,
    SessionStorage,
};
use service_core::error::AppError;
use std::sync::Arc;

/// Wired services for one client process.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub container_service: ContainerService,
}

impl AppState {
    /// Fresh in-memory stores with the session kept in `storage`.
    pub fn with_session_storage(storage: Arc<dyn SessionStorage>) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let containers = Arc::new(InMemoryContainerRepository::new());

        Self {
            auth_service: AuthService::new(users, SessionHolder::new(storage)),
            container_service: ContainerService::new(containers),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_session_storage(Arc::new(InMemorySessionStorage::new()))
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let storage: Arc<dyn SessionStorage> = match &config.session.file {
            Some(path) => {
                let storage = FileSessionStorage::new(path);
                tracing::info!(path = %storage.path().display(), "Using file-backed session storage");
                Arc::new(storage)
            }
            None => Arc::new(InMemorySessionStorage::new()),
        };
        Self::with_session_storage(storage)
    }

    /// Seed the demo admin and containers unless they already exist.
    pub async fn bootstrap(
        &self,
        admin_email: &str,
        admin_password: &str,
    ) -> Result<BootstrapOutcome, AppError> {
        Ok(bootstrap_demo_data(
            &self.auth_service,
            &self.container_service,
            admin_email,
            admin_password,
        )
        .await?)
    }
}
