use thiserror::Error;

/// Core errors - no I/O dependencies
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown API family: {0}")]
    UnknownFamily(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
