use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// A single progress sample. Recomputed on every tick, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
    /// Rounded to a whole percent, 0-100.
    pub percentage: u8,
    /// Bytes per second, derived from the latest sample. Can be noisy.
    pub speed_bps: f64,
    /// Estimated seconds remaining. 0 before the first measurement.
    pub estimated_secs: f64,
}

impl UploadProgress {
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Callback invoked with each progress sample.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Derives speed and remaining-time estimates from elapsed wall time.
pub struct ProgressTracker {
    started: Instant,
    total: u64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            started: Instant::now(),
            total,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Build a progress sample for `loaded` bytes processed so far.
    ///
    /// `loaded` is clamped to the total so callers that count in whole
    /// chunks never report past the end of the file.
    pub fn sample(&self, loaded: u64) -> UploadProgress {
        let loaded = loaded.min(self.total);
        let elapsed = self.started.elapsed().as_secs_f64();

        let speed_bps = if elapsed > 0.0 {
            loaded as f64 / elapsed
        } else {
            0.0
        };

        let remaining = self.total - loaded;
        let estimated_secs = if speed_bps > 0.0 && remaining > 0 {
            remaining as f64 / speed_bps
        } else {
            0.0
        };

        let percentage = if self.total == 0 {
            100
        } else {
            ((loaded as f64 / self.total as f64) * 100.0).round() as u8
        };

        UploadProgress {
            loaded,
            total: self.total,
            percentage,
            speed_bps,
            estimated_secs,
        }
    }
}
