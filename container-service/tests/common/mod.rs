//! Shared setup for container-service integration tests.
//!
//! Every test gets its own stores and session, so tests never observe each
//! other's users or containers.

#![allow(dead_code)]

use container_service::{
    dtos::{
        auth::RegisterRequest,
        container::{CreateContainerRequest, SetAccessRequest},
    },
    models::{Container, ContainerType, SanitizedUser, UserRole},
    AppState,
};

pub const ADMIN_EMAIL: &str = "a@x.com";
pub const ADMIN_PASSWORD: &str = "adminpw";
pub const WORKER_PASSWORD: &str = "workerpw";

pub fn setup() -> AppState {
    AppState::in_memory()
}

pub async fn register(state: &AppState, email: &str, role: UserRole) -> SanitizedUser {
    let password = match role {
        UserRole::Admin => ADMIN_PASSWORD,
        UserRole::Worker => WORKER_PASSWORD,
    };
    let username = email.split('@').next().unwrap_or("user");
    state
        .auth_service
        .register(RegisterRequest::new(
            email,
            format!("{username}-user"),
            password,
            role,
        ))
        .await
        .expect("Failed to register test user")
}

pub async fn register_admin(state: &AppState) -> SanitizedUser {
    register(state, ADMIN_EMAIL, UserRole::Admin).await
}

pub async fn register_worker(state: &AppState, email: &str) -> SanitizedUser {
    register(state, email, UserRole::Worker).await
}

pub async fn create_container(
    state: &AppState,
    owner: &SanitizedUser,
    name: &str,
    container_type: ContainerType,
) -> Container {
    state
        .container_service
        .create(
            owner,
            CreateContainerRequest::new(name, container_type, format!("{name} content")),
        )
        .await
        .expect("Failed to create test container")
}

pub fn ids(containers: &[Container]) -> Vec<uuid::Uuid> {
    containers.iter().map(|c| c.id).collect()
}

/// Public flag on, no explicit grants.
pub fn public_access() -> SetAccessRequest {
    SetAccessRequest {
        is_public: true,
        ..Default::default()
    }
}
