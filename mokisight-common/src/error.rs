use thiserror::Error;

/// Common error type for MokiSight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the bearer token.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// No token is stored locally.
    #[error("No authentication token, please log in again")]
    MissingToken,

    /// Login succeeded but the response carried no token.
    #[error("Token missing from login response")]
    MissingTokenInResponse,
}

impl Error {
    /// Whether this error means the session is no longer usable.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::MissingToken)
    }
}

/// Result type alias using MokiSight's Error.
pub type Result<T> = std::result::Result<T, Error>;
