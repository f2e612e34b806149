use crate::models::UserRole;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role: UserRole,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_registration() {
        let req = RegisterRequest::new("a@x.com", "alice", "adminpw", UserRole::Admin);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_short_username_and_password() {
        let req = RegisterRequest::new("a@x.com", "al", "pw", UserRole::Worker);
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_rejects_malformed_email() {
        let req = RegisterRequest::new("not-an-email", "alice", "secret1", UserRole::Worker);
        assert!(req.validate().is_err());
    }
}
