use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to read source: {0}")]
    Read(#[from] std::io::Error),
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
