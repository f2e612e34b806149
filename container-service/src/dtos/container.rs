use crate::models::ContainerType;
use crate::utils::validation::require_non_blank;
use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContainerRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    pub content: String,
}

impl CreateContainerRequest {
    pub fn new(
        name: impl Into<String>,
        container_type: ContainerType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            container_type,
            content: content.into(),
        }
    }
}

impl Validate for CreateContainerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_blank(&mut errors, "name", &self.name, "Name is required");
        require_non_blank(&mut errors, "content", &self.content, "Content is required");

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContainerRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub container_type: Option<ContainerType>,
    pub content: Option<String>,
}

impl Validate for UpdateContainerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            require_non_blank(&mut errors, "name", name, "Name is required");
        }
        if let Some(content) = &self.content {
            require_non_blank(&mut errors, "content", content, "Content is required");
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Replaces a container's access set and public flag together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetAccessRequest {
    pub user_ids: BTreeSet<Uuid>,
    pub is_public: bool,
}

impl SetAccessRequest {
    pub fn new(user_ids: impl IntoIterator<Item = Uuid>, is_public: bool) -> Self {
        Self {
            user_ids: user_ids.into_iter().collect(),
            is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_and_content_are_rejected() {
        let req = CreateContainerRequest::new("   ", ContainerType::Data, "\n\t");
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(UpdateContainerRequest::default().validate().is_ok());
    }

    #[test]
    fn test_patch_with_blank_name_is_rejected() {
        let patch = UpdateContainerRequest {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_set_access_collapses_duplicates() {
        let u = Uuid::new_v4();
        let req = SetAccessRequest::new([u, u], true);
        assert_eq!(req.user_ids.len(), 1);
    }
}
