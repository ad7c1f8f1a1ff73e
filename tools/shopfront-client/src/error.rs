use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// The access token was rejected and the silent refresh failed too.
    /// Session state has been cleared; sign in again.
    #[error("session expired")]
    SessionExpired,

    /// Non-2xx response carrying the server's envelope message.
    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status for [`ClientError::Api`]; `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
