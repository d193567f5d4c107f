//! HTTP document source
//!
//! Fetches manifests and resource documents from a statically served site.

use async_trait::async_trait;
use url::Url;

use crate::error::{RepoError, Result};
use crate::source::{DocumentSource, SourceType};

/// Request timeout of the HTTP client
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Static site client
pub struct HttpSource {
    /// Base location as configured
    location: String,
    /// Base URL, always ending with `/` so relative joins keep its path
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a client for a base URL
    pub fn new(location: impl Into<String>) -> Result<Self> {
        let location = location.into();
        let base = Url::parse(&format!("{}/", location.trim_end_matches('/'))).map_err(|e| {
            RepoError::InvalidSource {
                location: location.clone(),
                reason: e.to_string(),
            }
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("crdoc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            location,
            base,
            client,
        })
    }

    /// Absolute URL of a document path
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn source_type(&self) -> SourceType {
        SourceType::Http
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepoError::DocumentNotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        response.text().await.map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })
    }
}
