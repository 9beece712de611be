mod events;
mod manager;
mod types;

pub use events::{LogEvents, UploadEvents};
pub use manager::UploadManager;
pub use types::{ManagerOptions, UploadPhase};
