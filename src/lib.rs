//! docstream — document upload engine for the rental-application
//! platform.
//!
//! Splits files into fixed-size chunks, uploads them sequentially with
//! capped-exponential-backoff retries, asks the backend to reassemble
//! them, and tracks progress and timing telemetry for interactive
//! callers. Files at or below the chunk threshold skip chunking and go
//! up in a single request.

pub mod chunk;
pub mod client;
pub mod encode;
pub mod manager;
pub mod metrics;
pub mod progress;
pub mod retry;
pub mod upload;

pub use chunk::{ChunkPlan, FileSource};
pub use client::{ClientConfig, UploadClient};
pub use manager::{ManagerOptions, UploadManager};
pub use progress::{format_file_size, format_speed, UploadProgress};
pub use upload::{UploadMetadata, UploadOptions, UploadResult, UploadService};
