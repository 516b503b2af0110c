//! HTTP client for OpenAI-compatible completion servers.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability;
use crate::sse::{StreamEvent, process_sse};
use crate::types::{CompletionRequest, CompletionResponse, ModelListResponse};

/// Base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9998";

/// Timeout for the liveness probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for listing models.
const MODELS_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for completion requests, streaming included.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// A stream of parsed completion events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Client for an OpenAI-compatible completion server.
///
/// Timeouts are fixed per-call constants: 5s for the health probe, 10s for
/// model listing, 30s for completions.
#[derive(Debug, Clone)]
pub struct Client {
    client: ReqwestClient,
    base_url: String,
}

impl Client {
    /// Create a new client for the given base address.
    ///
    /// The address is validated up front; a trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| Error::url(format!("Invalid base URL '{base_url}': {e}"), Some(e)))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self { client, base_url })
    }

    /// Returns the configured base address, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Convert a non-success response into an API error carrying the body.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<failed to read error response: {e}>"),
        };
        Error::api(status_code, body)
    }

    /// Map a reqwest error to our error type.
    fn map_request_error(e: reqwest::Error, timeout: Duration) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Probe the server's liveness endpoint.
    ///
    /// Returns `Ok(())` only for a success status within the bounded window.
    pub async fn health(&self) -> Result<()> {
        observability::HEALTH_CHECKS.click();
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| Self::map_request_error(e, HEALTH_TIMEOUT))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        Ok(())
    }

    /// Query the models advertised by the server.
    pub async fn models(&self) -> Result<ModelListResponse> {
        observability::MODEL_LISTS.click();
        let url = format!("{}/v1/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .timeout(MODELS_TIMEOUT)
            .send()
            .await
            .map_err(|e| Self::map_request_error(e, MODELS_TIMEOUT))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ModelListResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Submit a completion request and get a non-streaming response.
    pub async fn complete(&self, mut params: CompletionRequest) -> Result<CompletionResponse> {
        params.stream = false;
        observability::CLIENT_REQUESTS.click();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .timeout(COMPLETION_TIMEOUT)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                Self::map_request_error(e, COMPLETION_TIMEOUT)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<CompletionResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Submit a completion request and get a streaming response.
    ///
    /// Returns a stream of [`StreamEvent`]s that can be processed
    /// incrementally. Dropping the stream closes the underlying transport.
    pub async fn stream(&self, mut params: CompletionRequest) -> Result<EventStream> {
        params.stream = true;
        observability::CLIENT_REQUESTS.click();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = self.default_headers();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(COMPLETION_TIMEOUT)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                Self::map_request_error(e, COMPLETION_TIMEOUT)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        // Get the byte stream from the response
        let stream = response.bytes_stream();

        // Create an SSE processor
        let event_stream = process_sse(stream);

        Ok(Box::pin(event_stream))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("default base URL is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = Client::new("http://localhost:8000").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");

        // Trailing slashes are trimmed before paths are appended.
        let client = Client::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn client_default_base_url() {
        let client = Client::default();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn client_rejects_invalid_url() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }
}
