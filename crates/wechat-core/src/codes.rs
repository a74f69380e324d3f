use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request succeeded
pub const ERR_CODE_OK: i64 = 0;

/// access_token expired (official account and corp APIs)
pub const ERR_CODE_ACCESS_TOKEN_EXPIRED: i64 = 42001;

/// suite_access_token expired (third-party suite APIs)
pub const ERR_CODE_SUITE_ACCESS_TOKEN_EXPIRED: i64 = 42009;

/// The API family a client talks to.
///
/// Each family signals credential expiry with its own status code, so the
/// executor needs to know which one it is dealing with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiFamily {
    /// Official account platform (`mp`)
    #[default]
    #[serde(alias = "mp")]
    OfficialAccount,
    /// Enterprise account platform
    Corp,
    /// Third-party suite on the enterprise platform
    Suite,
}

impl ApiFamily {
    /// Status codes meaning "the credential in the URL has expired"
    pub fn expired_codes(&self) -> &'static [i64] {
        match self {
            ApiFamily::OfficialAccount | ApiFamily::Corp => &[ERR_CODE_ACCESS_TOKEN_EXPIRED],
            ApiFamily::Suite => &[ERR_CODE_SUITE_ACCESS_TOKEN_EXPIRED],
        }
    }

    pub fn is_expired_code(&self, code: i64) -> bool {
        self.expired_codes().contains(&code)
    }

    /// Name of the query parameter the credential is appended to
    pub fn credential_param(&self) -> &'static str {
        match self {
            ApiFamily::OfficialAccount | ApiFamily::Corp => "access_token",
            ApiFamily::Suite => "suite_access_token",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiFamily::OfficialAccount => "official-account",
            ApiFamily::Corp => "corp",
            ApiFamily::Suite => "suite",
        };
        f.write_str(name)
    }
}

impl FromStr for ApiFamily {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp" | "official-account" | "official_account" => Ok(ApiFamily::OfficialAccount),
            "corp" => Ok(ApiFamily::Corp),
            "suite" => Ok(ApiFamily::Suite),
            other => Err(CoreError::UnknownFamily(other.to_string())),
        }
    }
}
