//! Demo data for a fresh in-memory deployment.

use crate::{
    dtos::{auth::RegisterRequest, container::CreateContainerRequest, container::SetAccessRequest},
    models::{ContainerType, SanitizedUser, UserRole},
    services::{AuthService, ContainerService, ServiceError},
};

pub const DEMO_ADMIN_USERNAME: &str = "admin";

/// Result of a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub admin: SanitizedUser,
    /// `false` when the admin already existed and nothing was written.
    pub created: bool,
}

/// Create the demo admin and its two public containers.
///
/// Runs at most once per store: if `admin_email` is already registered the
/// call is a no-op. The session is left untouched.
pub async fn bootstrap_demo_data(
    auth: &AuthService,
    containers: &ContainerService,
    admin_email: &str,
    admin_password: &str,
) -> Result<BootstrapOutcome, ServiceError> {
    if let Some(existing) = auth.find_user_by_email(admin_email).await? {
        tracing::debug!(user_id = %existing.id, "Demo data already present");
        return Ok(BootstrapOutcome {
            admin: existing,
            created: false,
        });
    }

    let admin = auth
        .create_user(RegisterRequest::new(
            admin_email,
            DEMO_ADMIN_USERNAME,
            admin_password,
            UserRole::Admin,
        ))
        .await?;

    let seeds = [
        ("Financial Reports", ContainerType::Data, "Q1 2025 Financial Data"),
        (
            "Company Policies",
            ContainerType::Document,
            "Employee Handbook and Policies",
        ),
    ];
    for (name, container_type, content) in seeds {
        let container = containers
            .create(
                &admin,
                CreateContainerRequest::new(name, container_type, content),
            )
            .await?;
        containers
            .set_access(&admin, container.id, SetAccessRequest::new([admin.id], true))
            .await?;
    }

    tracing::info!(user_id = %admin.id, "Demo data bootstrapped");
    Ok(BootstrapOutcome {
        admin,
        created: true,
    })
}
