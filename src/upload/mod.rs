mod chunked;
mod direct;

pub mod cancel;
pub mod combine;
pub mod error;
pub mod service;
pub mod types;

pub use cancel::CancelRegistry;
pub use combine::{ChunkCombiner, HttpCombiner};
pub use error::UploadError;
pub use service::UploadService;
pub use types::{
    ChunkCallback, Performance, UploadMetadata, UploadOptions, UploadResult, DEFAULT_CHUNK_SIZE,
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
};
