use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of one file upload as seen by the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UploadPhase {
    Idle,
    Encoding { file: String },
    Uploading { file: String },
    Done,
    Failed { error: String },
}

impl UploadPhase {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            UploadPhase::Encoding { .. } | UploadPhase::Uploading { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Done | UploadPhase::Failed { .. })
    }
}

/// Manager-level settings; per-upload options are derived from these.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub chunk_size: Option<u64>,
    pub max_retries: Option<u32>,
    pub timeout: Option<Duration>,
    /// Log completion/failure notices (the UI-toast analog). Event
    /// sinks are invoked regardless.
    pub notify: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            chunk_size: None,
            max_retries: None,
            timeout: None,
            notify: true,
        }
    }
}
