use std::io;
use std::result::Result as StdResult;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("API returned non-success status: {0}")]
    HttpStatus(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logging error: {0}")]
    Logging(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Short, stable label used for metrics and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Network(_) => "network",
            Error::Timeout(_) => "timeout",
            Error::HttpStatus(_) => "http_status",
            Error::MalformedResponse(_) => "malformed_response",
            Error::InvalidInput(_) => "invalid_input",
            Error::Config(_) => "config",
            Error::Logging(_) => "logging",
            Error::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Error::Config(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::Logging(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;
