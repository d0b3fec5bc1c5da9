use thiserror::Error;

/// Canonical result for every mongo-aggro crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Raised when a builder is constructed with input MongoDB would reject.
/// Errors surface at construction, never while rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing required parameter: {0}")]
    Missing(String),

    #[error("Conflicting parameters: {0}")]
    Conflict(String),

    #[error("Malformed stage: {0}")]
    MalformedStage(String),

    #[error("Stage placement: {0}")]
    Placement(String),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Error::Missing(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Error::Conflict(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e.to_string())
    }
}
