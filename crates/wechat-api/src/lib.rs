//! # WeChat API
//!
//! HTTP client core for WeChat platform APIs.
//!
//! Every call is authenticated with a short-lived access token appended to
//! the URL. When the server reports the token as expired (inside an
//! otherwise successful response), the client forces the credential
//! provider to refresh it and sends the call once more.

pub mod client;
pub mod config;
pub mod credential;
pub mod errors;
pub mod sdk;
pub mod suite;
pub mod transport;

// Re-export common types for convenience
pub use client::ApiClient;
pub use config::ApiConfig;
pub use credential::{CredentialProvider, StaticCredentialProvider};
pub use errors::*;
pub use sdk::{Wechat, ACCESS_TOKEN_ENV, API_FAMILY_ENV};
pub use suite::SuiteClient;
pub use transport::{
    HttpResponse, HttpTransport, ReqwestTransport, TransportConfig, JSON_CONTENT_TYPE,
};

// Re-export core types that API consumers will need
pub use wechat_core::{impl_envelope, ApiFamily, Envelope, ErrorEnvelope};
