//! HTTP transport for results, detail, and business pages.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;

use crate::error::ScraperError;
use crate::profile::RequestProfile;

/// Fetches a page body by URL.
///
/// The crawler only needs GET-and-read-text; implementations may enforce
/// their own concurrency limits. Completion order is not dispatch order.
pub trait PageFetcher: Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// `reqwest`-backed fetcher sending one [`RequestProfile`]'s headers.
///
/// Non-2xx responses become typed errors; nothing is retried.
pub struct YelpClient {
    client: Client,
    headers: HeaderMap,
}

impl YelpClient {
    /// Creates a client with the given request timeout and header profile.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, profile: &dyn RequestProfile) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(profile.user_agent())
            .build()?;
        Ok(Self {
            client,
            headers: profile.headers(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

impl PageFetcher for YelpClient {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send {
        self.get_text(url)
    }
}
