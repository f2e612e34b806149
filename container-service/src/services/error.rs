use crate::services::policy::PolicyError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("Container not found")]
    ContainerNotFound,

    #[error("{0}")]
    Forbidden(#[from] PolicyError),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(crate::utils::describe_validation_errors(&err))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid email or password"))
            }
            ServiceError::DuplicateEmail => {
                AppError::Conflict(anyhow::anyhow!("User with this email already exists"))
            }
            ServiceError::UserNotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            ServiceError::ContainerNotFound => {
                AppError::NotFound(anyhow::anyhow!("Container not found"))
            }
            ServiceError::Forbidden(e) => AppError::Forbidden(anyhow::anyhow!(e.to_string())),
            ServiceError::Unauthenticated => {
                AppError::Unauthorized(anyhow::anyhow!("Not authenticated"))
            }
            ServiceError::ValidationError(e) => AppError::ValidationError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::error::ErrorKind;

    #[test]
    fn test_maps_to_boundary_kinds() {
        let cases = [
            (ServiceError::InvalidCredentials, ErrorKind::Unauthorized),
            (ServiceError::DuplicateEmail, ErrorKind::Conflict),
            (ServiceError::UserNotFound, ErrorKind::NotFound),
            (ServiceError::ContainerNotFound, ErrorKind::NotFound),
            (ServiceError::Forbidden(PolicyError::NotOwner), ErrorKind::Forbidden),
            (ServiceError::Unauthenticated, ErrorKind::Unauthorized),
            (
                ServiceError::ValidationError("Name is required".to_string()),
                ErrorKind::Validation,
            ),
            (
                ServiceError::Internal(anyhow::anyhow!("storage offline")),
                ErrorKind::Internal,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(AppError::from(err).kind(), kind);
        }
    }

    #[test]
    fn test_validation_message_has_no_identifiers() {
        let app: AppError = ServiceError::ValidationError("Name is required".to_string()).into();
        assert_eq!(app.public_message(), "Name is required");
    }
}
