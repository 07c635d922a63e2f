//! TOML file registry, re-read on every fetch.
//!
//! ```toml
//! [[services]]
//! name = "git"
//! namespace = "tools"
//! ports = [8080]
//! annotations = { "ingress.director/target" = "git.example.com" }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use super::{FetchError, RegistryFetcher, ServiceRecord};

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    services: Vec<ServiceRecord>,
}

pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl RegistryFetcher for FileFetcher {
    async fn fetch(&self) -> Result<Vec<ServiceRecord>, FetchError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let document: RegistryDocument =
            toml::from_str(&content).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(document.services)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_services() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[services]]
            name = "git"
            namespace = "tools"
            ports = [8080]
            annotations = {{ "ingress.director/target" = "git.example.com" }}

            [[services]]
            name = "headless"
            namespace = "tools"
            "#
        )
        .unwrap();

        let records = FileFetcher::new(file.path().to_path_buf()).fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].backend_target().as_deref(), Some("git.tools:8080"));
        assert!(records[1].ports.is_empty());
    }

    #[tokio::test]
    async fn test_example_registry() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("services.example.toml");
        let records = FileFetcher::new(path).fetch().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].backend_target().as_deref(), Some("blog.blog:8080"));
    }

    #[tokio::test]
    async fn test_empty_document_is_empty_registry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let records = FileFetcher::new(file.path().to_path_buf()).fetch().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let fetcher = FileFetcher::new(PathBuf::from("/nonexistent/services.toml"));
        assert!(matches!(fetcher.fetch().await, Err(FetchError::Io { .. })));
    }

    #[tokio::test]
    async fn test_garbage_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "services = 12").unwrap();
        let fetcher = FileFetcher::new(file.path().to_path_buf());
        assert!(matches!(fetcher.fetch().await, Err(FetchError::Decode(_))));
    }
}
