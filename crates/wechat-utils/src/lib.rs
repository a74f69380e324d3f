//! # WeChat Utils
//!
//! Infrastructure helpers for wechat-rs: the request body buffer pool,
//! credential URL completion and log-safe formatting of secrets.

pub mod buffer_pool;
pub mod errors;
pub mod formatters;
pub mod query;

// Re-export common types for convenience
pub use buffer_pool::*;
pub use errors::*;
pub use formatters::*;
pub use query::*;
