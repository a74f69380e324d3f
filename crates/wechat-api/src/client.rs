use crate::config::ApiConfig;
use crate::credential::{CredentialProvider, StaticCredentialProvider};
use crate::errors::{ApiError, Result};
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport, JSON_CONTENT_TYPE};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use wechat_core::{ApiFamily, Envelope, ErrorEnvelope, ERR_CODE_OK};
use wechat_utils::{complete_url, mask_secret, validate_url_template, BufferPool};

/// Outcome of one decoded attempt that did not fail outright
enum Attempt<T> {
    Done(T),
    Expired(ErrorEnvelope),
}

/// JSON API client that authenticates every call with an access token and
/// recovers once from an expired token.
///
/// URLs are passed in without the token value, e.g.
/// `https://api.weixin.qq.com/cgi-bin/menu/get?access_token=`; the client
/// appends the escaped token itself.
pub struct ApiClient<T: HttpTransport = ReqwestTransport> {
    transport: Arc<T>,
    credentials: Arc<dyn CredentialProvider>,
    family: ApiFamily,
    expired_codes: Vec<i64>,
    buffers: Arc<BufferPool>,
}

impl ApiClient<ReqwestTransport> {
    /// Create a new API client with the default HTTP transport
    pub fn new(credentials: Arc<dyn CredentialProvider>, family: ApiFamily) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(transport, credentials, family))
    }

    /// Create an API client authenticated with a fixed access token
    pub fn from_access_token(access_token: impl Into<String>, family: ApiFamily) -> Result<Self> {
        Self::new(
            Arc::new(StaticCredentialProvider::new(access_token)),
            family,
        )
    }

    /// Create API client from any configuration implementing ApiConfig trait
    pub fn from_config<C>(config: &C) -> std::result::Result<Self, C::Error>
    where
        C: ApiConfig,
        C::Error: From<ApiError>,
    {
        debug!("Creating ApiClient from config");
        let access_token = config.get_access_token()?;
        let family = config.get_api_family()?;
        let transport_config = config.get_transport_config()?;

        debug!(
            "  access_token: {}, family: {}",
            mask_secret(&access_token),
            family
        );

        let transport = ReqwestTransport::with_config(&transport_config).map_err(ApiError::from)?;
        Ok(Self::with_transport(
            transport,
            Arc::new(StaticCredentialProvider::new(access_token)),
            family,
        ))
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create an API client over a custom transport
    pub fn with_transport(
        transport: T,
        credentials: Arc<dyn CredentialProvider>,
        family: ApiFamily,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            credentials,
            family,
            expired_codes: family.expired_codes().to_vec(),
            buffers: Arc::new(BufferPool::new()),
        }
    }

    /// Replace the family's "access token expired" codes
    pub fn with_expired_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.expired_codes = codes.into_iter().collect();
        self
    }

    pub fn family(&self) -> ApiFamily {
        self.family
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_expired_code(&self, code: i64) -> bool {
        self.expired_codes.contains(&code)
    }

    /// True if `err` reports one of this client's "access token expired"
    /// codes, which only happens when the retry hit the same expiry
    pub fn is_credential_expired(&self, err: &ApiError) -> bool {
        err.is_credential_expired(&self.expired_codes)
    }

    /// POST `request` as JSON and decode the response.
    ///
    /// On an "access token expired" status the token is force-refreshed and
    /// the call is sent once more; the returned value always comes from the
    /// last attempt only.
    pub async fn post_json<Req, Resp>(&self, incomplete_url: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Envelope,
    {
        validate_url_template(incomplete_url)?;

        let mut body = self.buffers.acquire();
        serde_json::to_writer(&mut *body, request).map_err(ApiError::Encode)?;
        trace!("Request body: {}", String::from_utf8_lossy(&body));

        self.execute(incomplete_url, Some(body.as_slice())).await
    }

    /// GET a resource and decode the response, with the same token recovery
    /// as [`post_json`](Self::post_json)
    pub async fn get_json<Resp>(&self, incomplete_url: &str) -> Result<Resp>
    where
        Resp: DeserializeOwned + Envelope,
    {
        validate_url_template(incomplete_url)?;
        self.execute(incomplete_url, None).await
    }

    async fn execute<Resp>(&self, incomplete_url: &str, body: Option<&[u8]>) -> Result<Resp>
    where
        Resp: DeserializeOwned + Envelope,
    {
        let method = if body.is_some() { "POST" } else { "GET" };

        let mut token = self
            .credentials
            .fetch()
            .await
            .map_err(ApiError::CredentialFetch)?;

        let mut has_retried = false;
        loop {
            let url = complete_url(incomplete_url, &token);

            debug!("HTTP {} request to: {}", method, incomplete_url);
            trace!("  access_token: {}", mask_secret(&token));

            let response = match body {
                Some(body) => self.transport.post(&url, JSON_CONTENT_TYPE, body).await?,
                None => self.transport.get(&url).await?,
            };

            debug!("Response status: {}", response.status_line);

            match self.inspect::<Resp>(response)? {
                Attempt::Done(resp) => return Ok(resp),
                Attempt::Expired(status) if !has_retried => {
                    debug!(
                        "Access token expired (errcode: {}, errmsg: {}), current token: {}",
                        status.err_code,
                        status.err_msg,
                        mask_secret(&token)
                    );
                    has_retried = true;

                    token = self
                        .credentials
                        .force_refresh()
                        .await
                        .map_err(ApiError::CredentialRefresh)?;
                    debug!("Retrying with new token: {}", mask_secret(&token));
                }
                Attempt::Expired(status) => {
                    debug!(
                        "Access token still expired after refresh, giving up: {}",
                        mask_secret(&token)
                    );
                    return Err(ApiError::Api(status));
                }
            }
        }
    }

    /// Check the transport status, decode a fresh response value and classify
    /// its status code
    fn inspect<Resp>(&self, response: HttpResponse) -> Result<Attempt<Resp>>
    where
        Resp: DeserializeOwned + Envelope,
    {
        if !response.is_ok() {
            return Err(ApiError::TransportStatus {
                status: response.status,
                status_line: response.status_line,
            });
        }

        let decoded: Resp = serde_json::from_slice(&response.body).map_err(ApiError::Decode)?;
        decoded.check_status().map_err(ApiError::Decode)?;

        match decoded.status_code() {
            ERR_CODE_OK => Ok(Attempt::Done(decoded)),
            code if self.is_expired_code(code) => Ok(Attempt::Expired(decoded.to_error())),
            _ => Err(ApiError::Api(decoded.to_error())),
        }
    }
}

impl<T: HttpTransport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            credentials: self.credentials.clone(),
            family: self.family,
            expired_codes: self.expired_codes.clone(),
            buffers: self.buffers.clone(),
        }
    }
}

impl<T: HttpTransport> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("family", &self.family)
            .field("expired_codes", &self.expired_codes)
            .finish_non_exhaustive()
    }
}
