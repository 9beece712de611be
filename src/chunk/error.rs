use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(u64),

    #[error("Slice [{offset}, {end}) is out of bounds for a {size}-byte source")]
    SliceOutOfBounds { offset: u64, end: u64, size: u64 },

    #[error("Chunk index {index} out of range (total {total})")]
    IndexOutOfRange { index: u32, total: u32 },
}

pub type Result<T> = std::result::Result<T, ChunkError>;
