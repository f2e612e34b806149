//! Record storage behind the identity and container services.
//!
//! The services only see the repository traits; the in-memory
//! implementations keep records in insertion order and are cheap to create,
//! so every test can start from an empty store.

use crate::models::{Container, User};
use crate::services::ServiceError;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error>;
    /// Returns `false` without storing anything when the email is taken.
    async fn insert(&self, user: User) -> Result<bool, anyhow::Error>;
    async fn list(&self) -> Result<Vec<User>, anyhow::Error>;
    /// Returns `false` when no record had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error>;
}

/// In-place change to one container. Returning an error discards the change.
pub type ContainerPatch =
    Box<dyn FnOnce(&mut Container) -> Result<(), ServiceError> + Send + 'static>;

#[async_trait]
pub trait ContainerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Container>, anyhow::Error>;
    async fn list(&self) -> Result<Vec<Container>, anyhow::Error>;
    async fn insert(&self, container: Container) -> Result<(), anyhow::Error>;
    /// Look up, check and rewrite one record as a single atomic step.
    ///
    /// `patch` runs against a copy while the store is locked; the copy is
    /// written back only if `patch` succeeds. `Ok(None)` means no record had
    /// this id.
    async fn modify(
        &self,
        id: Uuid,
        patch: ContainerPatch,
    ) -> Result<Option<Container>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<bool, anyhow::Error> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email || u.id == user.id) {
            return Ok(false);
        }
        users.push(user);
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<User>, anyhow::Error> {
        Ok(self.users.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryContainerRepository {
    containers: RwLock<Vec<Container>>,
}

impl InMemoryContainerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContainerRepository for InMemoryContainerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Container>, anyhow::Error> {
        Ok(self
            .containers
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Container>, anyhow::Error> {
        Ok(self.containers.read().await.clone())
    }

    async fn insert(&self, container: Container) -> Result<(), anyhow::Error> {
        let mut containers = self.containers.write().await;
        if containers.iter().any(|c| c.id == container.id) {
            return Err(anyhow::anyhow!("Duplicate container id {}", container.id));
        }
        containers.push(container);
        Ok(())
    }

    async fn modify(
        &self,
        id: Uuid,
        patch: ContainerPatch,
    ) -> Result<Option<Container>, ServiceError> {
        let mut containers = self.containers.write().await;
        let Some(slot) = containers.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        let mut draft = slot.clone();
        patch(&mut draft)?;
        if draft.id != slot.id || draft.owner_id != slot.owner_id {
            return Err(ServiceError::Internal(anyhow::anyhow!(
                "Container {} patch changed an immutable field",
                id
            )));
        }

        *slot = draft.clone();
        Ok(Some(draft))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        let mut containers = self.containers.write().await;
        let before = containers.len();
        containers.retain(|c| c.id != id);
        Ok(containers.len() != before)
    }
}
