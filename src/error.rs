//! Error types for the backend client and the favorites store.

use thiserror::Error;

/// Errors talking to the search backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure…
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ApiError {
    /// Text for the user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Transport(_) | ApiError::MalformedBody(_) => {
                "Erro de conexão. Tente novamente.".to_string()
            }
        }
    }
}

/// Errors reading or writing persisted favorites.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorites I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("favorites file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("favorites store unavailable: {0}")]
    Unavailable(String),
}
