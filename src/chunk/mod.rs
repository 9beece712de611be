pub mod error;
pub mod planner;
pub mod types;

pub use error::{ChunkError, Result};
pub use planner::ChunkPlan;
pub use types::{content_type_for, FileSlice, FileSource};
