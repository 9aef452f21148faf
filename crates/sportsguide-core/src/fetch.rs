//! Listing page retrieval.
//!
//! One GET, bounded by a timeout, no retries. A failed fetch ends the run
//! before anything is written.

use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::config::SourceSettings;
use crate::error::FetchError;

/// Downloads the listing page over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(source: &SourceSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(source.user_agent.clone())
            .timeout(Duration::from_secs(source.timeout_secs))
            .build()
            .map_err(|source_err| FetchError::Request {
                url: source.url.clone(),
                source: source_err,
            })?;
        Ok(Self {
            client,
            url: source.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page body.
    ///
    /// # Errors
    /// Transport failures and non-success statuses.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: self.url.clone(),
            source,
        };

        tracing::info!(url = %self.url, "fetching listing page");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(request_error)?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await.map_err(request_error)?;
        tracing::debug!(bytes = body.len(), "listing page received");
        Ok(body)
    }

    /// Fetch on a private runtime, for synchronous callers.
    ///
    /// # Errors
    /// Same as [`HttpFetcher::fetch`]; runtime start-up failures surface as
    /// [`FetchError::Runtime`].
    pub fn fetch_blocking(&self) -> Result<String, FetchError> {
        let runtime = tokio::runtime::Runtime::new().map_err(FetchError::Runtime)?;
        runtime.block_on(self.fetch())
    }
}

/// Read a saved copy of the listing page.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_page(path: &Path) -> Result<String, FetchError> {
    std::fs::read_to_string(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })
}
