use crate::client::ApiClient;
use crate::errors::{ApiError, Result};
use serde::Serialize;
use serde_json::Value;
use wechat_core::ApiFamily;
use wechat_utils::credential_template;

/// Environment variable holding the access token
pub const ACCESS_TOKEN_ENV: &str = "WECHAT_ACCESS_TOKEN";

/// Environment variable selecting the API family
pub const API_FAMILY_ENV: &str = "WECHAT_API_FAMILY";

/// Main SDK struct for raw, untyped WeChat calls
pub struct Wechat {
    api_client: ApiClient,
}

impl Wechat {
    /// Create new instance with an access token for the official account platform
    pub fn new(access_token: String) -> Result<Self> {
        Self::with_family(access_token, ApiFamily::OfficialAccount)
    }

    pub fn with_family(access_token: String, family: ApiFamily) -> Result<Self> {
        let api_client = ApiClient::from_access_token(access_token, family)?;
        Ok(Self { api_client })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            ApiError::Config(format!("{} environment variable not set", ACCESS_TOKEN_ENV))
        })?;

        let family = match std::env::var(API_FAMILY_ENV) {
            Ok(name) => name
                .parse::<ApiFamily>()
                .map_err(|e| ApiError::Config(e.to_string()))?,
            Err(_) => ApiFamily::default(),
        };

        Self::with_family(access_token, family)
    }

    pub fn from_client(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.api_client
    }

    /// GET an endpoint; the credential parameter is added if missing
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        let template = credential_template(endpoint, self.api_client.family())?;
        self.api_client.get_json(&template).await
    }

    /// POST a JSON body to an endpoint; the credential parameter is added if missing
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let template = credential_template(endpoint, self.api_client.family())?;
        self.api_client.post_json(&template, body).await
    }
}
