//! Certificate persistence.
//!
//! The issuance side keeps account keys and certificates in a byte-oriented
//! key/value store. The proxy only checks at start-up that the configured
//! store is usable.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry for {0:?}")]
    Miss(String),

    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte store keyed by opaque names such as `example.com` or `acme_account+key`.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirCertificateStore {
    base_path: PathBuf,
}

impl DirCertificateStore {
    /// Open the store, creating the directory with owner-only permissions.
    pub async fn open(base_path: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(base_path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(base_path, std::fs::Permissions::from_mode(0o700)).await?;
        }

        tracing::info!(storage_path = %base_path.display(), "Certificate store opened");
        Ok(Self {
            base_path: base_path.to_path_buf(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl CertificateStore for DirCertificateStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::Miss(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, data).await?;
        tracing::debug!(key = %key, bytes = data.len(), "Certificate store entry written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Round-trip a probe entry to prove the store is reachable and writable.
pub async fn probe(store: &dyn CertificateStore) -> Result<(), StoreError> {
    const PROBE_KEY: &str = ".probe";
    store.put(PROBE_KEY, b"ok").await?;
    store.get(PROBE_KEY).await?;
    store.delete(PROBE_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirCertificateStore::open(&dir.path().join("certs")).await.unwrap();

        assert!(matches!(store.get("example.com").await, Err(StoreError::Miss(_))));

        store.put("example.com", b"-----BEGIN CERTIFICATE-----").await.unwrap();
        assert_eq!(
            store.get("example.com").await.unwrap(),
            b"-----BEGIN CERTIFICATE-----".to_vec()
        );

        store.delete("example.com").await.unwrap();
        store.delete("example.com").await.unwrap();
        assert!(matches!(store.get("example.com").await, Err(StoreError::Miss(_))));
    }

    #[tokio::test]
    async fn test_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirCertificateStore::open(dir.path()).await.unwrap();

        for key in ["", "..", "../escape", "a/b", "a\\b"] {
            assert!(
                matches!(store.put(key, b"x").await, Err(StoreError::InvalidKey(_))),
                "key {key:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_probe() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirCertificateStore::open(dir.path()).await.unwrap();
        probe(&store).await.unwrap();
        assert!(matches!(store.get(".probe").await, Err(StoreError::Miss(_))));
    }
}
