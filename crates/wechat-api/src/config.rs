use crate::transport::TransportConfig;
use wechat_core::ApiFamily;

/// Trait for providing configuration to the API client
/// This allows the main application to implement config without circular dependencies
pub trait ApiConfig {
    type Error;

    /// Get the access token calls are authenticated with
    fn get_access_token(&self) -> std::result::Result<String, Self::Error>;

    /// Get the API family (optional, defaults to the official account platform)
    fn get_api_family(&self) -> std::result::Result<ApiFamily, Self::Error> {
        Ok(ApiFamily::default())
    }

    /// Get transport settings (optional, defaults to `TransportConfig::default()`)
    fn get_transport_config(&self) -> std::result::Result<TransportConfig, Self::Error> {
        Ok(TransportConfig::default())
    }
}
