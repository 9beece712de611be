use thiserror::Error;

use crate::chunk::ChunkError;
use crate::client::ClientError;
use crate::encode::EncodeError;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Chunk {chunk}/{total} upload failed after {attempts} attempts: {source}")]
    ChunkFailed {
        chunk: u32,
        total: u32,
        attempts: u32,
        source: ClientError,
    },

    #[error("Combine failed: {0}")]
    Combine(ClientError),
}

pub type Result<T> = std::result::Result<T, UploadError>;
