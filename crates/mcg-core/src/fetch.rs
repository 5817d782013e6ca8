use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::CONTENT_TYPE;

use crate::error::FetchError;

/// Raw body of a retrieved document plus its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchedDocument {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("application/json".to_string()),
        }
    }

    pub fn yaml(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("application/x-yaml".to_string()),
        }
    }
}

/// Retrieves documents by URL. Implementations must not retry; a failure is
/// terminal for the load that asked for it.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}

/// Options for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Fetches `http(s)://` URLs with reqwest and `file://` URLs from disk.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(options: &FetchOptions) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure)
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_file(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let path = url::Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| FetchError::transport(url, "not a valid file URL"))?;

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => "application/x-yaml",
            _ => "application/json",
        };

        Ok(FetchedDocument {
            body,
            content_type: Some(content_type.to_string()),
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        if url.starts_with("file:") {
            return self.fetch_file(url).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        Ok(FetchedDocument { body, content_type })
    }
}

/// Serves documents from memory and counts requests per URL.
///
/// Unknown URLs answer with a 404 status error. Used by the integration tests
/// of this workspace; hidden from the public docs.
#[doc(hidden)]
#[derive(Default)]
pub struct MemoryFetcher {
    documents: IndexMap<String, FetchedDocument>,
    requests: Mutex<HashMap<String, usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, document: FetchedDocument) -> Self {
        self.documents.insert(url.into(), document);
        self
    }

    /// How many times `url` was requested.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .map(|r| r.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            *requests.entry(url.to_string()).or_default() += 1;
        }
        tokio::task::yield_now().await;
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::status(url, 404))
    }
}
