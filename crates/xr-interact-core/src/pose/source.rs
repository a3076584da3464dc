//! Where template bytes come from

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{InteractionError, Result};

/// Fetches raw template payloads by URL
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches templates over HTTP(S). Any non-2xx status is a failure.
pub struct HttpTemplateSource {
    client: reqwest::Client,
}

impl HttpTemplateSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InteractionError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| InteractionError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!(url, len = bytes.len(), "Fetched pose template");
        Ok(bytes.to_vec())
    }
}

/// Reads templates from the local filesystem. Accepts plain paths and
/// `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct FileTemplateSource;

impl FileTemplateSource {
    fn path_for(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = Self::path_for(url);
        tokio::fs::read(&path).await.map_err(|e| InteractionError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pick a source for a base URL: HTTP(S) goes over the network, anything
/// else is read from disk.
pub fn source_for_base_url(base_url: &str, timeout: Duration) -> Result<Box<dyn TemplateSource>> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(Box::new(HttpTemplateSource::new(timeout)?))
    } else {
        Ok(Box::new(FileTemplateSource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_reads_plain_and_file_urls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3, 4]).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let source = FileTemplateSource;
        assert_eq!(source.fetch(&path).await.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(
            source.fetch(&format!("file://{path}")).await.unwrap(),
            vec![1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        let err = FileTemplateSource
            .fetch(&missing.to_string_lossy())
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionError::Fetch { .. }));
    }
}
