use crate::{
    dtos::auth::RegisterRequest,
    models::{SanitizedUser, User, UserRole},
    services::{AccessPolicy, PolicyError, ServiceError, SessionHolder, UserRepository},
    utils::{hash_password, verify_password, Password, PasswordHashString},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Identity store: credentials, registration, session lifecycle and the
/// admin-only user management operations.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    session: SessionHolder,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, session: SessionHolder) -> Self {
        Self { users, session }
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    /// Resolve credentials to a user and make it the current session.
    ///
    /// Email matching is exact and case-sensitive. An unknown email and a
    /// wrong secret are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SanitizedUser, ServiceError> {
        let user = self.verify_credentials(email, password).await?;
        self.session.set(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Create an account and sign it in. If the session cannot be written the
    /// account is removed again, so a retry starts from a clean store.
    pub async fn register(&self, req: RegisterRequest) -> Result<SanitizedUser, ServiceError> {
        let user = self.create_user(req).await?;

        if let Err(e) = self.session.set(&user).await {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                "Session write failed, rolling back registration"
            );
            self.users.delete(user.id).await?;
            return Err(e);
        }
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        if let Some(user) = self.session.current().await? {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.session.clear().await
    }

    pub async fn current_user(&self) -> Result<Option<SanitizedUser>, ServiceError> {
        self.session.current().await
    }

    /// All accounts in registration order. Admin only.
    pub async fn list_users(
        &self,
        actor: &SanitizedUser,
    ) -> Result<Vec<SanitizedUser>, ServiceError> {
        AccessPolicy::require_role(actor, UserRole::Admin).inspect_err(|_| {
            tracing::warn!(user_id = %actor.id, "Non-admin attempted to list users");
        })?;

        let users = self.users.list().await?;
        Ok(users.into_iter().map(SanitizedUser::from).collect())
    }

    /// Remove an account. Admin only, and never the actor's own account.
    pub async fn delete_user(&self, actor: &SanitizedUser, user_id: Uuid) -> Result<(), ServiceError> {
        AccessPolicy::require_role(actor, UserRole::Admin)?;
        if actor.id == user_id {
            return Err(PolicyError::SelfDeletion.into());
        }

        if !self.users.delete(user_id).await? {
            return Err(ServiceError::UserNotFound);
        }

        tracing::info!(actor_id = %actor.id, user_id = %user_id, "User deleted");
        Ok(())
    }

    pub(crate) async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SanitizedUser>, ServiceError> {
        Ok(self.users.find_by_email(email).await?.map(SanitizedUser::from))
    }

    /// Validate, hash and store a new account without touching the session.
    pub(crate) async fn create_user(
        &self,
        req: RegisterRequest,
    ) -> Result<SanitizedUser, ServiceError> {
        req.validate()?;

        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = hash_password(&Password::new(req.password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let user = User::new(req.email, req.username, password_hash.into_string(), req.role);

        // The lookup above is advisory; the insert re-checks under the write lock.
        if !self.users.insert(user.clone()).await? {
            return Err(ServiceError::DuplicateEmail);
        }

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user.sanitized())
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SanitizedUser, ServiceError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::warn!("Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        let matches = verify_password(
            &Password::new(password),
            &PasswordHashString::new(user.password_hash.clone()),
        )?;
        if !matches {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user.sanitized())
    }
}
