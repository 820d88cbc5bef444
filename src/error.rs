use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid alternative: {0}")]
    InvalidAlternative(String),
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("malformed record: {0}")]
    Record(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("utf-8 decode error: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl AppError {
    /// Errors that will fail the same way on every attempt for a given record.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AppError::MissingField(_)
                | AppError::Record(_)
                | AppError::Base64(_)
                | AppError::Utf8(_)
                | AppError::InvalidInput(_)
                | AppError::InvalidAlternative(_)
        )
    }
}
