use crate::{
    dtos::container::{CreateContainerRequest, SetAccessRequest, UpdateContainerRequest},
    models::{Container, ContainerType, SanitizedUser},
    services::{AccessPolicy, ContainerPatch, ContainerRepository, ServiceError},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Container store. Every operation takes the acting identity and consults
/// [`AccessPolicy`] before reading or writing a record.
#[derive(Clone)]
pub struct ContainerService {
    containers: Arc<dyn ContainerRepository>,
}

impl ContainerService {
    pub fn new(containers: Arc<dyn ContainerRepository>) -> Self {
        Self { containers }
    }

    /// Containers the user may view, optionally narrowed to one type.
    pub async fn list(
        &self,
        user: &SanitizedUser,
        type_filter: Option<ContainerType>,
    ) -> Result<Vec<Container>, ServiceError> {
        let visible: Vec<Container> = self
            .containers
            .list()
            .await?
            .into_iter()
            .filter(|c| AccessPolicy::can_view(user, c))
            .filter(|c| type_filter.is_none_or(|t| c.container_type == t))
            .collect();

        tracing::debug!(
            user_id = %user.id,
            type_filter = ?type_filter,
            count = visible.len(),
            "Listed containers"
        );
        Ok(visible)
    }

    /// A single container. Missing and not-viewable are both reported as
    /// not found.
    pub async fn get(&self, user: &SanitizedUser, id: Uuid) -> Result<Container, ServiceError> {
        match self.containers.find_by_id(id).await? {
            Some(c) if AccessPolicy::can_view(user, &c) => Ok(c),
            _ => Err(ServiceError::ContainerNotFound),
        }
    }

    pub async fn create(
        &self,
        user: &SanitizedUser,
        req: CreateContainerRequest,
    ) -> Result<Container, ServiceError> {
        req.validate()?;

        let container = Container::new(user.id, req.name, req.container_type, req.content);
        self.containers.insert(container.clone()).await?;

        tracing::info!(
            container_id = %container.id,
            owner_id = %user.id,
            container_type = %container.container_type,
            "Container created"
        );
        Ok(container)
    }

    /// Merge the supplied fields into an owned container.
    pub async fn update(
        &self,
        user: &SanitizedUser,
        id: Uuid,
        patch: UpdateContainerRequest,
    ) -> Result<Container, ServiceError> {
        let actor = user.clone();
        let container = self
            .modify_owned(
                user,
                id,
                Box::new(move |container: &mut Container| {
                    AccessPolicy::ensure_can_mutate(&actor, container)?;
                    patch.validate()?;

                    if let Some(name) = patch.name {
                        container.name = name;
                    }
                    if let Some(container_type) = patch.container_type {
                        container.container_type = container_type;
                    }
                    if let Some(content) = patch.content {
                        container.content = content;
                    }
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(container_id = %id, user_id = %user.id, "Container updated");
        Ok(container)
    }

    /// Replace the access set and public flag of an owned container in one
    /// write.
    pub async fn set_access(
        &self,
        user: &SanitizedUser,
        id: Uuid,
        req: SetAccessRequest,
    ) -> Result<Container, ServiceError> {
        let actor = user.clone();
        let container = self
            .modify_owned(
                user,
                id,
                Box::new(move |container: &mut Container| {
                    AccessPolicy::ensure_can_mutate(&actor, container)?;
                    container.access_list = req.user_ids;
                    container.is_public = req.is_public;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            container_id = %id,
            user_id = %user.id,
            granted = container.access_list.len(),
            is_public = container.is_public,
            "Container access updated"
        );
        Ok(container)
    }

    pub async fn delete(&self, user: &SanitizedUser, id: Uuid) -> Result<(), ServiceError> {
        let container = self
            .containers
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::ContainerNotFound)?;

        AccessPolicy::ensure_can_delete(user, &container).inspect_err(|_| {
            tracing::warn!(container_id = %id, user_id = %user.id, "Container delete denied");
        })?;

        if !self.containers.delete(id).await? {
            return Err(ServiceError::ContainerNotFound);
        }

        tracing::info!(container_id = %id, user_id = %user.id, "Container deleted");
        Ok(())
    }

    async fn modify_owned(
        &self,
        user: &SanitizedUser,
        id: Uuid,
        patch: ContainerPatch,
    ) -> Result<Container, ServiceError> {
        self.containers
            .modify(id, patch)
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::Forbidden(_)) {
                    tracing::warn!(container_id = %id, user_id = %user.id, "Container change denied");
                }
            })?
            .ok_or(ServiceError::ContainerNotFound)
    }
}
