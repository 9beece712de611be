pub mod format;
pub mod types;

pub use format::{format_file_size, format_speed};
pub use types::{ProgressCallback, ProgressTracker, UploadProgress};
