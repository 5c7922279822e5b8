//! Rate-limited JSON transport shared by the prediction and dashboard clients.

use crate::error::{ClientError, Result};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// HTTP transport bound to one base URL.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    http: Client,
    rate_limiter: Arc<DirectLimiter>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport.
    ///
    /// # Errors
    /// Returns error if the rate is zero or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self> {
        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            ClientError::Configuration("requests_per_second must be greater than zero".to_string())
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the rate limiter and makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Waits for the rate limiter and makes a JSON POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        let body_json = serde_json::to_string(body)?;
        tracing::debug!("POST {} body_len={}", url, body_json.len());

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body_json)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Converts non-success statuses into errors and decodes the body.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), text));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
