use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload failed: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Upload cancelled")]
    Cancelled,
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
