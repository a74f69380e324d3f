use thiserror::Error;

/// Infrastructure errors for wechat-utils
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtilsError {
    #[error("URL template is empty")]
    EmptyUrlTemplate,

    #[error("URL template must end with the credential parameter (e.g. \"?access_token=\"): {0}")]
    MissingCredentialParam(String),

    #[error("URL already carries a value for {0}; pass the endpoint without it")]
    CredentialAlreadySet(String),
}

pub type Result<T> = std::result::Result<T, UtilsError>;
