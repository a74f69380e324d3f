use thiserror::Error;
use wechat_core::ErrorEnvelope;

/// API-specific errors for wechat-api
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid URL template: {0}")]
    InvalidUrlTemplate(#[from] wechat_utils::UtilsError),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to fetch access token: {0}")]
    CredentialFetch(#[source] CredentialError),

    #[error("Failed to refresh access token: {0}")]
    CredentialRefresh(#[source] CredentialError),

    #[error("HTTP error: {0}")]
    Transport(#[from] HttpError),

    #[error("http.Status: {status_line}")]
    TransportStatus { status: u16, status_line: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server answered with a non-zero status code
    #[error(transparent)]
    Api(#[from] ErrorEnvelope),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// The application status code, if the server reported one
    pub fn api_code(&self) -> Option<i64> {
        match self {
            ApiError::Api(envelope) => Some(envelope.err_code),
            _ => None,
        }
    }

    /// True if this is an application error carrying one of `expired_codes`,
    /// i.e. expiry persisted after the retry.
    ///
    /// Prefer [`ApiClient::is_credential_expired`](crate::ApiClient::is_credential_expired),
    /// which checks against the codes that client actually retries on.
    pub fn is_credential_expired(&self, expired_codes: &[i64]) -> bool {
        self.api_code()
            .map(|code| expired_codes.contains(&code))
            .unwrap_or(false)
    }
}

/// Transport-level failures, raised before any response body is looked at
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors reported by a credential provider
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No access token available")]
    Unavailable,

    #[error("Credential provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
