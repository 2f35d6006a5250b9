//! Remote catalog fetch
//!
//! A single GET of a fixed JSON resource. Any transport error, non-2xx
//! status or malformed body is a fetch failure the priority chain treats
//! as "absent"; nothing here is fatal.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use super::models::CatalogData;

/// Errors from the remote catalog fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be decoded.
    #[error("catalog request failed")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("catalog request returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Source of the remote demo catalog.
#[automock]
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetch the catalog.
    async fn fetch(&self) -> Result<CatalogData, FetchError>;
}

/// [`CatalogFetcher`] backed by an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogFetcher {
    /// Fetch from `url` with a fresh client.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self) -> Result<CatalogData, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.json().await?)
    }
}
