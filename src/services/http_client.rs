// src/services/http_client.rs
// DOCUMENTATION: Shared HTTP client with retry policy
// PURPOSE: One reqwest client, configured once at startup and passed into every component

use crate::errors::ScraperError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Status codes worth another attempt
const RETRY_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before retry n is `backoff_factor * 2^n`
    pub backoff_factor: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff_factor * 2u32.saturating_pow(attempt)
    }
}

/// Cloneable handle to the shared client
/// DOCUMENTATION: Cloning is cheap, reqwest::Client is reference counted
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(retry: RetryPolicy) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ScraperError::Config(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { client, retry })
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send with retries on connection failures and 500/502/503/504
    /// DOCUMENTATION: When retries run out the last response is returned as is,
    /// callers decide what a non-success status means for them
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ScraperError> {
        let request = request
            .build()
            .map_err(|e| ScraperError::ExternalApi(format!("Invalid request: {}", e)))?;
        let mut attempt = 0;

        loop {
            let current = request.try_clone().ok_or_else(|| {
                ScraperError::ExternalApi("Request body cannot be retried".to_string())
            })?;

            match self.client.execute(current).await {
                Ok(response)
                    if RETRY_STATUSES.contains(&response.status())
                        && attempt < self.retry.max_retries =>
                {
                    log::debug!(
                        "Retrying {} after status {} (attempt {}/{})",
                        response.url(),
                        response.status(),
                        attempt + 1,
                        self.retry.max_retries
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() && attempt < self.retry.max_retries => {
                    log::debug!(
                        "Retrying after connection error: {} (attempt {}/{})",
                        e,
                        attempt + 1,
                        self.retry.max_retries
                    );
                }
                Err(e) => return Err(ScraperError::ExternalApi(format!("Request failed: {}", e))),
            }

            tokio::time::sleep(self.retry.delay(attempt)).await;
            attempt += 1;
        }
    }

    /// Send and reject non-success statuses
    pub async fn send_ok(&self, request: RequestBuilder) -> Result<Response, ScraperError> {
        let response = self.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScraperError::ExternalApi(format!(
                "API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response)
    }
}
