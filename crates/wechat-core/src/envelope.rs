//! Response envelope shared by every endpoint.
//!
//! Every response body carries a status object made of a numeric `errcode`
//! and a human readable `errmsg`. It is either the whole body:
//!
//! ```json
//! {"errcode": 0, "errmsg": "ok"}
//! ```
//!
//! or one field of a richer body:
//!
//! ```json
//! {"base": {"errcode": 0, "errmsg": "ok"}, "data": {"count": 3}}
//! ```
//!
//! Response types declare where their status lives by implementing
//! [`Envelope`], usually through [`impl_envelope!`](crate::impl_envelope).

use crate::codes::ERR_CODE_OK;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The status object of a response. Doubles as the error returned for
/// application-level failures.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("errcode: {err_code}, errmsg: {err_msg}")]
pub struct ErrorEnvelope {
    #[serde(rename = "errcode", default)]
    pub err_code: i64,
    #[serde(rename = "errmsg", default)]
    pub err_msg: String,
}

impl ErrorEnvelope {
    pub fn new(err_code: i64, err_msg: impl Into<String>) -> Self {
        Self {
            err_code,
            err_msg: err_msg.into(),
        }
    }
}

/// Outcome of [`Envelope::check_status`]
pub type StatusResult = std::result::Result<(), serde_json::Error>;

/// Access to the status object of a decoded response
pub trait Envelope {
    /// Numeric status code, `0` on success
    fn status_code(&self) -> i64;

    /// Human readable status message
    fn status_message(&self) -> &str;

    fn is_ok(&self) -> bool {
        self.status_code() == ERR_CODE_OK
    }

    /// Fails when a status object is present but malformed. Typed responses
    /// already reject that while decoding, so only untyped ones need to check.
    fn check_status(&self) -> StatusResult {
        Ok(())
    }

    /// Copy the status object out of the response
    fn to_error(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code(), self.status_message())
    }
}

impl Envelope for ErrorEnvelope {
    fn status_code(&self) -> i64 {
        self.err_code
    }

    fn status_message(&self) -> &str {
        &self.err_msg
    }
}

impl<T: Envelope + ?Sized> Envelope for Box<T> {
    fn status_code(&self) -> i64 {
        (**self).status_code()
    }

    fn status_message(&self) -> &str {
        (**self).status_message()
    }

    fn check_status(&self) -> StatusResult {
        (**self).check_status()
    }
}

/// Untyped responses: the status is read from top-level `errcode`/`errmsg`,
/// otherwise from the first field when that field is an object. A body with
/// no `errcode` at all is treated as a success; one whose `errcode` is not an
/// `i64` is not.
impl Envelope for Value {
    fn status_code(&self) -> i64 {
        status_object(self)
            .and_then(|object| object.get("errcode"))
            .and_then(Value::as_i64)
            .unwrap_or(ERR_CODE_OK)
    }

    fn status_message(&self) -> &str {
        status_object(self)
            .and_then(|object| object.get("errmsg"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    fn is_ok(&self) -> bool {
        self.check_status().is_ok() && self.status_code() == ERR_CODE_OK
    }

    fn check_status(&self) -> StatusResult {
        match status_value(self) {
            Some(status) if status.get("errcode").is_some() => {
                ErrorEnvelope::deserialize(status).map(|_| ())
            }
            _ => Ok(()),
        }
    }
}

fn status_object(value: &Value) -> Option<&Map<String, Value>> {
    status_value(value).and_then(Value::as_object)
}

fn status_value(value: &Value) -> Option<&Value> {
    let object = value.as_object()?;
    if object.contains_key("errcode") {
        return Some(value);
    }

    // Relies on serde_json's preserve_order so "first" means document order
    match object.values().next() {
        Some(inner) if inner.is_object() => Some(inner),
        _ => None,
    }
}

/// Implement [`Envelope`] for a response struct by delegating to the field
/// that holds its status object.
///
/// ```
/// use serde::Deserialize;
/// use wechat_core::{impl_envelope, Envelope, ErrorEnvelope};
///
/// #[derive(Debug, Default, Deserialize)]
/// struct MenuResponse {
///     #[serde(flatten)]
///     error: ErrorEnvelope,
///     #[serde(default)]
///     menu_id: String,
/// }
///
/// impl_envelope!(MenuResponse, error);
///
/// let resp: MenuResponse =
///     serde_json::from_str(r#"{"errcode":0,"errmsg":"ok","menu_id":"208379533"}"#).unwrap();
/// assert!(resp.is_ok());
/// assert_eq!(resp.menu_id, "208379533");
/// ```
#[macro_export]
macro_rules! impl_envelope {
    ($ty:ty, $field:ident) => {
        impl $crate::Envelope for $ty {
            fn status_code(&self) -> i64 {
                $crate::Envelope::status_code(&self.$field)
            }

            fn status_message(&self) -> &str {
                $crate::Envelope::status_message(&self.$field)
            }

            fn check_status(&self) -> $crate::StatusResult {
                $crate::Envelope::check_status(&self.$field)
            }
        }
    };
}
