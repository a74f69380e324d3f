use crate::client::ApiClient;
use crate::credential::CredentialProvider;
use crate::errors::{ApiError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use wechat_core::{ApiFamily, Envelope};

/// Client for third-party suite APIs on the enterprise platform.
///
/// Calls are authenticated with a `suite_access_token`, and expiry of that
/// token is reported with its own status code (42009).
#[derive(Debug, Clone)]
pub struct SuiteClient<T: HttpTransport = ReqwestTransport> {
    suite_id: String,
    inner: ApiClient<T>,
}

impl SuiteClient<ReqwestTransport> {
    pub fn new(suite_id: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let suite_id = checked_suite_id(suite_id.into())?;
        Ok(Self {
            suite_id,
            inner: ApiClient::new(credentials, ApiFamily::Suite)?,
        })
    }
}

impl<T: HttpTransport> SuiteClient<T> {
    pub fn with_transport(
        suite_id: impl Into<String>,
        transport: T,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let suite_id = checked_suite_id(suite_id.into())?;
        Ok(Self {
            suite_id,
            inner: ApiClient::with_transport(transport, credentials, ApiFamily::Suite),
        })
    }

    pub fn suite_id(&self) -> &str {
        &self.suite_id
    }

    /// The underlying executor
    pub fn client(&self) -> &ApiClient<T> {
        &self.inner
    }

    /// See [`ApiClient::post_json`]; the URL must end with `suite_access_token=`
    pub async fn post_json<Req, Resp>(&self, incomplete_url: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Envelope,
    {
        self.inner.post_json(incomplete_url, request).await
    }

    /// See [`ApiClient::get_json`]
    pub async fn get_json<Resp>(&self, incomplete_url: &str) -> Result<Resp>
    where
        Resp: DeserializeOwned + Envelope,
    {
        self.inner.get_json(incomplete_url).await
    }
}

fn checked_suite_id(suite_id: String) -> Result<String> {
    if suite_id.trim().is_empty() {
        return Err(ApiError::Config("suite_id must not be empty".to_string()));
    }
    Ok(suite_id)
}
