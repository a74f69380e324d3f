pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;

// Re-export main public types
pub use config::Config;
pub use errors::{ConfigError, Result, WechatError};

// Re-export the SDK for library users
pub use wechat_api::{ApiClient, ApiFamily, Wechat};
