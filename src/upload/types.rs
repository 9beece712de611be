use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::UploadError;
use crate::progress::ProgressCallback;

pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Callback invoked after each chunk completes, with
/// `(completed_chunks, total_chunks)`.
pub type ChunkCallback = Arc<dyn Fn(u32, u32) + Send + Sync>;

/// Per-call upload settings. Immutable once the upload starts.
#[derive(Clone)]
pub struct UploadOptions {
    /// Files above this size are chunked; at or below it, uploaded direct.
    pub chunk_size: u64,
    /// Total attempts per chunk, counted from 1.
    pub max_retries: u32,
    /// Lifetime bound for each individual request.
    pub timeout: Duration,
    pub on_progress: Option<ProgressCallback>,
    pub on_chunk_complete: Option<ChunkCallback>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            on_progress: None,
            on_chunk_complete: None,
        }
    }
}

impl UploadOptions {
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn on_chunk_complete(mut self, callback: ChunkCallback) -> Self {
        self.on_chunk_complete = Some(callback);
        self
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("chunk_size", &self.chunk_size)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_chunk_complete", &self.on_chunk_complete.is_some())
            .finish()
    }
}

/// Identifies where a document belongs: which application, which form
/// section, which named document slot, which tenant zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub reference_id: String,
    pub section_name: String,
    pub document_name: String,
    pub zone_id: String,
}

impl UploadMetadata {
    pub fn new(
        reference_id: impl Into<String>,
        section_name: impl Into<String>,
        document_name: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            reference_id: reference_id.into(),
            section_name: section_name.into(),
            document_name: document_name.into(),
            zone_id: zone_id.into(),
        }
    }

    /// All four fields are required; checked at the facade boundary
    /// before any I/O happens.
    pub(crate) fn validate(&self) -> Result<(), UploadError> {
        for (field, value) in [
            ("reference_id", &self.reference_id),
            ("section_name", &self.section_name),
            ("document_name", &self.document_name),
            ("zone_id", &self.zone_id),
        ] {
            if value.trim().is_empty() {
                return Err(UploadError::InvalidMetadata(format!("{field} is empty")));
            }
        }
        Ok(())
    }
}

/// Millisecond timings for one completed upload attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub total_time: u64,
    pub parse_time: u64,
    pub buffer_time: u64,
    pub upload_time: u64,
    pub url_time: u64,
}

impl Performance {
    /// Only the elapsed total is known; sub-timings zeroed.
    pub fn elapsed_only(total_time: u64) -> Self {
        Self {
            total_time,
            ..Default::default()
        }
    }
}

/// Outcome of one upload. The facade never returns `Err`; all failure
/// is communicated through `success` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub success: bool,
    pub url: Option<String>,
    pub key: Option<String>,
    pub error: Option<String>,
    pub performance: Performance,
}

impl UploadResult {
    pub fn ok(url: String, key: String, performance: Performance) -> Self {
        Self {
            success: true,
            url: Some(url),
            key: Some(key),
            error: None,
            performance,
        }
    }

    pub fn failed(error: impl Into<String>, performance: Performance) -> Self {
        Self {
            success: false,
            url: None,
            key: None,
            error: Some(error.into()),
            performance,
        }
    }
}
