use crate::config::LogFormat;
use crate::error::AppError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `log_level` when it is set. Fails if a global
/// subscriber was already installed.
pub fn init_tracing(service_name: &str, log_level: &str, format: LogFormat) -> Result<(), AppError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .json()
            .flatten_event(true)
    });
    let pretty_layer = (format == LogFormat::Pretty).then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| {
            eprintln!(
                "Failed to initialize tracing for service '{}': {}",
                service_name, e
            );
            AppError::ConfigError(anyhow::anyhow!("Failed to initialize tracing: {}", e))
        })?;

    tracing::debug!(service = %service_name, format = ?format, "Tracing initialized");
    Ok(())
}
