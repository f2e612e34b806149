use container_service::{config::ServiceConfig, AppState};
use service_core::error::AppError;
use service_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = ServiceConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.common.log_format,
    )?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting container service"
    );

    if let Err(e) = run(&config).await {
        tracing::error!(
            kind = ?e.kind(),
            error = %e,
            public_message = %e.public_message(),
            "Container service failed"
        );
        return Err(e);
    }
    Ok(())
}

async fn run(config: &ServiceConfig) -> Result<(), AppError> {
    let state = AppState::from_config(config);

    if config.demo.seed {
        let outcome = state
            .bootstrap(&config.demo.admin_email, &config.demo.admin_password)
            .await?;
        tracing::info!(
            admin_id = %outcome.admin.id,
            created = outcome.created,
            "Demo data ready"
        );
    }

    match state.auth_service.current_user().await? {
        Some(user) => {
            let visible = state.container_service.list(&user, None).await?;
            tracing::info!(
                user_id = %user.id,
                role = %user.role,
                visible_containers = visible.len(),
                "Resumed session"
            );
        }
        None => tracing::info!("No active session"),
    }

    Ok(())
}
