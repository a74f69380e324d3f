//! HTTP transport abstraction
//!
//! The executor only needs two verbs and the raw response; keeping them
//! behind a trait lets tests script responses without a network.

use crate::errors::HttpError;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Content type of every JSON request body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Trait for issuing HTTP requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` with the given content type
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, HttpError>;

    /// GET without a body
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// Raw response from an HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Status code and reason phrase, e.g. `"502 Bad Gateway"`
    pub status_line: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status_line = match reqwest::StatusCode::from_u16(status) {
            Ok(code) => code.to_string(),
            Err(_) => status.to_string(),
        };
        Self {
            status,
            status_line,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Transport settings. Deadlines live here; the executor has no timers.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request deadline
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("wechat-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Production transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(&TransportConfig::default())
    }

    pub fn with_config(config: &TransportConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating ReqwestTransport (timeout: {:?}, connect_timeout: {:?})",
            config.timeout, config.connect_timeout
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HttpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_request_error)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_line: status.to_string(),
            body: body.to_vec(),
        })
    }
}

fn map_request_error(e: reqwest::Error) -> HttpError {
    // The URL carries the access token
    let e = e.without_url();
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Request(e)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| {
                let err = map_request_error(e);
                error!("POST request failed: {}", err);
                err
            })?;

        Self::read(response).await
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let err = map_request_error(e);
            error!("GET request failed: {}", err);
            err
        })?;

        Self::read(response).await
    }
}
