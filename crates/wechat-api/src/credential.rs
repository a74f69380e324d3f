//! Access token supply.
//!
//! The API client never stores a credential itself: it asks its provider for
//! one at the start of every logical call, and asks for a forced refresh when
//! the server reports the credential as expired.

use crate::errors::CredentialError;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of access tokens
///
/// Implementations own caching, persistence and refresh policy, and must be
/// safe to call from many tasks at once.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return the current, non-expired access token, obtaining one if needed
    async fn fetch(&self) -> Result<String, CredentialError>;

    /// Discard any cached access token and unconditionally obtain a new one
    async fn force_refresh(&self) -> Result<String, CredentialError>;
}

#[async_trait]
impl<P: CredentialProvider + ?Sized> CredentialProvider for Arc<P> {
    async fn fetch(&self) -> Result<String, CredentialError> {
        (**self).fetch().await
    }

    async fn force_refresh(&self) -> Result<String, CredentialError> {
        (**self).force_refresh().await
    }
}

/// Provider handing out a fixed access token, e.g. one issued by a central
/// token service and passed in through configuration.
///
/// It has no way to obtain a new token, so a forced refresh returns the same one.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    fn token(&self) -> Result<String, CredentialError> {
        if self.token.is_empty() {
            return Err(CredentialError::Unavailable);
        }
        Ok(self.token.clone())
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn fetch(&self) -> Result<String, CredentialError> {
        self.token()
    }

    async fn force_refresh(&self) -> Result<String, CredentialError> {
        self.token()
    }
}
