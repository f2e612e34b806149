//! Client-scoped session persistence.
//!
//! The session is one JSON-encoded [`SanitizedUser`] stored under a fixed key
//! in a [`SessionStorage`]. Storage is injected: tests use
//! [`InMemorySessionStorage`], a long-lived client uses
//! [`FileSessionStorage`] so the identity survives restarts.

use crate::models::SanitizedUser;
use crate::services::ServiceError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SESSION_KEY: &str = "user";

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error>;
    async fn remove(&self, key: &str) -> Result<(), anyhow::Error>;
}

#[derive(Default)]
pub struct InMemorySessionStorage {
    entries: DashMap<String, String>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), anyhow::Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value entries kept as one JSON object in a file.
///
/// Writes go to a sibling temp file that is then renamed over the target.
pub struct FileSessionStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, empty and unparsable files all read as no entries; the next
    /// write replaces an unparsable file.
    async fn read_entries(&self) -> Result<BTreeMap<String, String>, anyhow::Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read session file {}: {}",
                    self.path.display(),
                    e
                ))
            }
        };
        if bytes.is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable session file"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        let written = match tokio::fs::write(&tmp, payload).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::debug!(error = %cleanup, "Session temp file not removed");
            }
            return Err(anyhow::anyhow!(
                "Failed to write session file {}: {}",
                self.path.display(),
                e
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), anyhow::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

/// Holds the current identity for one client.
#[derive(Clone)]
pub struct SessionHolder {
    storage: Arc<dyn SessionStorage>,
}

impl SessionHolder {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// The persisted identity, if any. An unreadable payload is dropped and
    /// treated as signed out.
    pub async fn current(&self) -> Result<Option<SanitizedUser>, ServiceError> {
        let Some(raw) = self.storage.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<SanitizedUser>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session payload");
                self.storage.remove(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Like [`SessionHolder::current`] but fails with `Unauthenticated`.
    pub async fn require(&self) -> Result<SanitizedUser, ServiceError> {
        self.current().await?.ok_or(ServiceError::Unauthenticated)
    }

    pub async fn set(&self, user: &SanitizedUser) -> Result<(), ServiceError> {
        let payload = serde_json::to_string(user)
            .map_err(|e| anyhow::anyhow!("Failed to encode session: {}", e))?;
        self.storage.set(SESSION_KEY, &payload).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.storage.remove(SESSION_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserRole};

    fn identity() -> SanitizedUser {
        User::new(
            "w@x.com".to_string(),
            "worker".to_string(),
            "hash".to_string(),
            UserRole::Worker,
        )
        .sanitized()
    }

    #[tokio::test]
    async fn test_set_current_clear_cycle() {
        let holder = SessionHolder::new(Arc::new(InMemorySessionStorage::new()));
        assert!(holder.current().await.unwrap().is_none());

        let user = identity();
        holder.set(&user).await.unwrap();
        assert_eq!(holder.current().await.unwrap(), Some(user.clone()));
        assert_eq!(holder.require().await.unwrap(), user);

        holder.clear().await.unwrap();
        assert!(holder.current().await.unwrap().is_none());
        assert!(matches!(
            holder.require().await,
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_identity() {
        let holder = SessionHolder::new(Arc::new(InMemorySessionStorage::new()));
        let first = identity();
        let second = identity();
        holder.set(&first).await.unwrap();
        holder.set(&second).await.unwrap();
        assert_eq!(holder.current().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_corrupted_payload_reads_as_signed_out() {
        let storage = Arc::new(InMemorySessionStorage::new());
        storage.set(SESSION_KEY, "{not json").await.unwrap();

        let holder = SessionHolder::new(storage.clone());
        assert!(holder.current().await.unwrap().is_none());
        assert!(storage.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let user = identity();

        SessionHolder::new(Arc::new(FileSessionStorage::new(&path)))
            .set(&user)
            .await
            .unwrap();

        let reopened = SessionHolder::new(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(reopened.current().await.unwrap(), Some(user));

        reopened.clear().await.unwrap();
        let again = SessionHolder::new(Arc::new(FileSessionStorage::new(&path)));
        assert!(again.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));
        assert!(storage.get(SESSION_KEY).await.unwrap().is_none());
        storage.remove(SESSION_KEY).await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_truncated_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, r#"{"user": "trunc"#).await.unwrap();

        let holder = SessionHolder::new(Arc::new(FileSessionStorage::new(&path)));
        assert!(holder.current().await.unwrap().is_none());
        holder.clear().await.unwrap();

        let user = identity();
        holder.set(&user).await.unwrap();
        let reopened = SessionHolder::new(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(reopened.current().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_file_storage_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail.
        let path = dir.path().join("session.json");
        tokio::fs::create_dir_all(path.join("occupied")).await.unwrap();

        let storage = FileSessionStorage::new(&path);
        let result = storage.write_entries(&BTreeMap::new()).await;

        assert!(result.is_err());
        assert!(!path.with_extension("tmp").exists());
        assert!(path.is_dir());
    }
}
