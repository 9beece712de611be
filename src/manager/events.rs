use crate::upload::UploadResult;

/// Notification sink for finished uploads — the seam where a UI hangs
/// its toasts and callbacks.
pub trait UploadEvents: Send + Sync {
    fn on_complete(&self, _result: &UploadResult) {}

    fn on_error(&self, _error: &str, _file_name: &str) {}
}

/// Sink that forwards both outcomes to tracing.
pub struct LogEvents;

impl UploadEvents for LogEvents {
    fn on_complete(&self, result: &UploadResult) {
        tracing::info!(
            key = result.key.as_deref().unwrap_or(""),
            total_ms = result.performance.total_time,
            "upload completed"
        );
    }

    fn on_error(&self, error: &str, file_name: &str) {
        tracing::error!(file = file_name, error, "upload failed");
    }
}
