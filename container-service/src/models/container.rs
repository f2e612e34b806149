//! Container model - typed content blobs with an owner and an access set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    Data,
    Document,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Data => "data",
            ContainerType::Document => "document",
        }
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container entity. `id` and `owner_id` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    pub content: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub access_list: BTreeSet<Uuid>,
    pub is_public: bool,
}

impl Container {
    /// Create a private container whose access set holds only the owner.
    pub fn new(
        owner_id: Uuid,
        name: String,
        container_type: ContainerType,
        content: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            container_type,
            content,
            owner_id,
            created_at: Utc::now(),
            access_list: BTreeSet::from([owner_id]),
            is_public: false,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Explicit grant only; ownership and the public flag are not considered.
    pub fn grants_access_to(&self, user_id: Uuid) -> bool {
        self.access_list.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_container_is_private_and_owner_listed() {
        let owner = Uuid::new_v4();
        let c = Container::new(
            owner,
            "Reports".to_string(),
            ContainerType::Data,
            "Q1".to_string(),
        );
        assert!(!c.is_public);
        assert!(c.is_owned_by(owner));
        assert!(c.grants_access_to(owner));
        assert_eq!(c.access_list.len(), 1);
    }

    #[test]
    fn test_container_type_serializes_under_type_key() {
        let c = Container::new(
            Uuid::new_v4(),
            "Handbook".to_string(),
            ContainerType::Document,
            "Policies".to_string(),
        );
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["type"], "document");
        assert_eq!(value["is_public"], false);
    }
}
