use thiserror::Error;

/// Failures surfaced by the remote access layer. Propagated to the caller
/// untouched; nothing here is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response payload: {0}")]
    InvalidResponse(String),

    #[error("could not read photo {path}: {source}")]
    Photo {
        path: String,
        source: std::io::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;
