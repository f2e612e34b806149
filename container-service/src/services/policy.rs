//! Authorization policy for containers and role-gated operations.
//!
//! Visibility is the union of ownership, an explicit grant, and the public
//! flag (public only widens visibility for workers). Mutation and deletion
//! belong to the owner alone, whatever the actor's role.

use crate::models::{Container, SanitizedUser, UserRole};

/// Authorization rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Only the container's owner may modify it.
    NotOwner,
    /// The operation needs a specific role.
    RoleRequired { required: UserRole },
    /// An account may not delete itself.
    SelfDeletion,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::NotOwner => {
                write!(f, "Only the owner can modify or delete this container")
            }
            PolicyError::RoleRequired { required } => {
                write!(f, "This action requires the {} role", required)
            }
            PolicyError::SelfDeletion => write!(f, "You cannot delete your own account"),
        }
    }
}

impl std::error::Error for PolicyError {}

#[derive(Debug, Clone)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn can_view(user: &SanitizedUser, container: &Container) -> bool {
        if container.is_owned_by(user.id) {
            return true;
        }
        if user.is_worker() && container.is_public {
            return true;
        }
        container.grants_access_to(user.id)
    }

    pub fn can_mutate(user: &SanitizedUser, container: &Container) -> bool {
        container.is_owned_by(user.id)
    }

    pub fn can_delete(user: &SanitizedUser, container: &Container) -> bool {
        container.is_owned_by(user.id)
    }

    pub fn ensure_can_mutate(user: &SanitizedUser, container: &Container) -> Result<(), PolicyError> {
        if Self::can_mutate(user, container) {
            Ok(())
        } else {
            Err(PolicyError::NotOwner)
        }
    }

    pub fn ensure_can_delete(user: &SanitizedUser, container: &Container) -> Result<(), PolicyError> {
        if Self::can_delete(user, container) {
            Ok(())
        } else {
            Err(PolicyError::NotOwner)
        }
    }

    pub fn require_role(user: &SanitizedUser, role: UserRole) -> Result<(), PolicyError> {
        if user.role == role {
            Ok(())
        } else {
            Err(PolicyError::RoleRequired { required: role })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContainerType, User};
    use std::collections::BTreeSet;

    fn user(role: UserRole) -> SanitizedUser {
        User::new(
            format!("{}@example.com", uuid::Uuid::new_v4()),
            "someone".to_string(),
            String::new(),
            role,
        )
        .sanitized()
    }

    fn container_owned_by(owner: &SanitizedUser) -> Container {
        Container::new(
            owner.id,
            "Reports".to_string(),
            ContainerType::Data,
            "Q1".to_string(),
        )
    }

    #[test]
    fn test_owner_sees_container_even_with_empty_access_list() {
        for role in [UserRole::Admin, UserRole::Worker] {
            let owner = user(role);
            let mut c = container_owned_by(&owner);
            c.access_list = BTreeSet::new();
            c.is_public = false;
            assert!(AccessPolicy::can_view(&owner, &c));
        }
    }

    #[test]
    fn test_public_flag_opens_container_to_workers_only() {
        let owner = user(UserRole::Admin);
        let mut c = container_owned_by(&owner);
        c.is_public = true;

        assert!(AccessPolicy::can_view(&user(UserRole::Worker), &c));
        assert!(!AccessPolicy::can_view(&user(UserRole::Admin), &c));
    }

    #[test]
    fn test_explicit_grant_opens_container_to_any_role() {
        let owner = user(UserRole::Worker);
        let admin = user(UserRole::Admin);
        let worker = user(UserRole::Worker);
        let mut c = container_owned_by(&owner);
        c.access_list.insert(admin.id);
        c.access_list.insert(worker.id);

        assert!(AccessPolicy::can_view(&admin, &c));
        assert!(AccessPolicy::can_view(&worker, &c));
        assert!(!AccessPolicy::can_view(&user(UserRole::Worker), &c));
    }

    #[test]
    fn test_only_owner_can_mutate_or_delete() {
        let owner = user(UserRole::Admin);
        let other_admin = user(UserRole::Admin);
        let granted_worker = user(UserRole::Worker);
        let mut c = container_owned_by(&owner);
        c.is_public = true;
        c.access_list.insert(other_admin.id);
        c.access_list.insert(granted_worker.id);

        assert!(AccessPolicy::can_mutate(&owner, &c));
        assert!(AccessPolicy::can_delete(&owner, &c));
        for actor in [&other_admin, &granted_worker] {
            assert!(AccessPolicy::can_view(actor, &c));
            assert!(!AccessPolicy::can_mutate(actor, &c));
            assert!(!AccessPolicy::can_delete(actor, &c));
            assert_eq!(
                AccessPolicy::ensure_can_delete(actor, &c),
                Err(PolicyError::NotOwner)
            );
        }
    }

    #[test]
    fn test_require_role_reports_missing_role() {
        let worker = user(UserRole::Worker);
        assert_eq!(
            AccessPolicy::require_role(&worker, UserRole::Admin),
            Err(PolicyError::RoleRequired {
                required: UserRole::Admin
            })
        );
        assert!(AccessPolicy::require_role(&worker, UserRole::Worker).is_ok());
    }
}
