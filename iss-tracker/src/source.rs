//! Upstream OEM sources: NASA's public feed, or a local file

use async_trait::async_trait;
use iss_core::{EphemerisError, EphemerisSource};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SourceConfig;

/// Fetches the OEM XML over HTTP(S).
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("iss-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl EphemerisSource for HttpSource {
    async fn fetch(&self) -> iss_core::Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| EphemerisError::Fetch(format!("GET {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(EphemerisError::Fetch(format!(
                "HTTP error {} from {}",
                response.status(),
                self.url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EphemerisError::Fetch(format!("Failed to read body from {}: {}", self.url, e)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the OEM XML from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EphemerisSource for FileSource {
    async fn fetch(&self) -> iss_core::Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EphemerisError::Fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Pick the source named by the config; a local file wins over the URL.
pub fn from_config(config: &SourceConfig) -> anyhow::Result<Arc<dyn EphemerisSource>> {
    match &config.file {
        Some(path) => Ok(Arc::new(FileSource::new(path))),
        None => Ok(Arc::new(HttpSource::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("oem.xml");
        std::fs::write(&path, "<ndm/>").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), "<ndm/>");
        assert!(source.describe().contains("oem.xml"));
    }

    #[tokio::test]
    async fn test_file_source_missing_is_fetch_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileSource::new(temp_dir.path().join("missing.xml"));

        assert!(matches!(source.fetch().await, Err(EphemerisError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_from_config_prefers_file() {
        let config = SourceConfig {
            file: Some("local.xml".to_string()),
            ..SourceConfig::default()
        };
        let source = from_config(&config).unwrap();
        assert_eq!(source.describe(), "file local.xml");

        let source = from_config(&SourceConfig::default()).unwrap();
        assert_eq!(source.describe(), crate::config::NASA_OEM_URL);
    }

    #[tokio::test]
    #[ignore] // Requires network connection
    async fn test_fetch_nasa_feed() {
        let source = from_config(&SourceConfig::default()).unwrap();
        let xml = source.fetch().await.unwrap();
        assert!(iss_core::parse_oem(&xml).unwrap().len() > 0);
    }
}
