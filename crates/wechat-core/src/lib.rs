//! # WeChat Core
//!
//! Core types shared by every wechat-rs API family.
//!
//! This crate contains pure types with no I/O dependencies:
//! - The response envelope (`errcode` / `errmsg`) and the `Envelope` capability
//! - Status code constants
//! - API families and their "access token expired" sentinels
//! - Error definitions

pub mod codes;
pub mod envelope;
pub mod errors;

// Re-export commonly used types
pub use codes::{
    ApiFamily, ERR_CODE_ACCESS_TOKEN_EXPIRED, ERR_CODE_OK, ERR_CODE_SUITE_ACCESS_TOKEN_EXPIRED,
};
pub use envelope::{Envelope, ErrorEnvelope, StatusResult};
pub use errors::{CoreError, Result};
