use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use super::events::UploadEvents;
use super::types::{ManagerOptions, UploadPhase};
use crate::chunk::FileSource;
use crate::progress::UploadProgress;
use crate::upload::{UploadMetadata, UploadOptions, UploadResult, UploadService};

/// Pause between files in a batch, so a burst of documents does not
/// hammer the endpoint back to back.
const INTER_FILE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct ManagerState {
    uploading: bool,
    phase: Option<UploadPhase>,
    progress: Option<UploadProgress>,
    current_file: Option<String>,
}

/// Wraps the [`UploadService`] for interactive use: in-flight state,
/// accumulated results, derived metrics, and completion notifications.
///
/// Uploads run strictly one at a time; batches are processed in array
/// order with a short pause between files.
pub struct UploadManager {
    service: Arc<UploadService>,
    options: ManagerOptions,
    events: Option<Arc<dyn UploadEvents>>,
    state: Arc<RwLock<ManagerState>>,
    uploaded: Arc<RwLock<Vec<UploadResult>>>,
}

impl UploadManager {
    pub fn new(service: UploadService) -> Self {
        Self {
            service: Arc::new(service),
            options: ManagerOptions::default(),
            events: None,
            state: Arc::new(RwLock::new(ManagerState::default())),
            uploaded: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_options(mut self, options: ManagerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn UploadEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn service(&self) -> &UploadService {
        &self.service
    }

    /// Upload one file, tracking phase/progress and recording the
    /// result. Mirrors the facade contract: never fails, returns a
    /// result either way.
    pub async fn upload_file(
        &self,
        source: &FileSource,
        metadata: &UploadMetadata,
    ) -> UploadResult {
        let file_name = source.file_name().to_string();
        {
            let mut state = self.state.write();
            state.uploading = true;
            state.progress = None;
            state.current_file = Some(file_name.clone());
            state.phase = Some(UploadPhase::Encoding {
                file: file_name.clone(),
            });
        }

        let options = self.upload_options(&file_name);
        let result = self.service.upload_file(source, metadata, &options).await;

        let final_phase = if result.success {
            self.uploaded.write().push(result.clone());
            if self.options.notify {
                tracing::info!(
                    file = %file_name,
                    total_ms = result.performance.total_time,
                    "upload successful"
                );
            }
            if let Some(events) = &self.events {
                events.on_complete(&result);
            }
            UploadPhase::Done
        } else {
            let error = result
                .error
                .clone()
                .unwrap_or_else(|| "Upload failed".to_string());
            if self.options.notify {
                tracing::error!(file = %file_name, error = %error, "upload failed");
            }
            if let Some(events) = &self.events {
                events.on_error(&error, &file_name);
            }
            UploadPhase::Failed { error }
        };

        {
            let mut state = self.state.write();
            state.uploading = false;
            state.progress = None;
            state.current_file = None;
            state.phase = Some(final_phase);
        }

        result
    }

    /// Upload a batch sequentially, in array order. A failed file is
    /// recorded and the loop moves on — partial success at the batch
    /// level.
    pub async fn upload_files(
        &self,
        sources: &[FileSource],
        metadata: &UploadMetadata,
    ) -> Vec<UploadResult> {
        let mut results = Vec::with_capacity(sources.len());

        for (index, source) in sources.iter().enumerate() {
            results.push(self.upload_file(source, metadata).await);

            if sources.len() > 1 && index + 1 < sources.len() {
                tokio::time::sleep(INTER_FILE_PAUSE).await;
            }
        }

        results
    }

    // ---- reactive state ----

    pub fn is_uploading(&self) -> bool {
        self.state.read().uploading
    }

    pub fn phase(&self) -> UploadPhase {
        self.state.read().phase.clone().unwrap_or(UploadPhase::Idle)
    }

    pub fn progress(&self) -> Option<UploadProgress> {
        self.state.read().progress.clone()
    }

    pub fn current_file(&self) -> Option<String> {
        self.state.read().current_file.clone()
    }

    /// Successfully uploaded results accumulated over this manager's
    /// lifetime.
    pub fn uploaded_files(&self) -> Vec<UploadResult> {
        self.uploaded.read().clone()
    }

    pub fn reset_progress(&self) {
        let mut state = self.state.write();
        state.progress = None;
        state.current_file = None;
    }

    pub fn clear_uploaded(&self) {
        self.uploaded.write().clear();
    }

    // ---- derived metrics ----

    /// Mean wall-clock milliseconds across completed uploads.
    pub fn average_total_ms(&self) -> f64 {
        let uploaded = self.uploaded.read();
        if uploaded.is_empty() {
            return 0.0;
        }
        let sum: u64 = uploaded.iter().map(|r| r.performance.total_time).sum();
        sum as f64 / uploaded.len() as f64
    }

    /// Summed network time across completed uploads, in milliseconds.
    pub fn total_upload_ms(&self) -> u64 {
        self.uploaded
            .read()
            .iter()
            .map(|r| r.performance.upload_time)
            .sum()
    }

    /// Speed from the latest progress sample; 0 when nothing is in
    /// flight.
    pub fn current_speed_bps(&self) -> f64 {
        self.state
            .read()
            .progress
            .as_ref()
            .map(|p| p.speed_bps)
            .unwrap_or(0.0)
    }

    fn upload_options(&self, file_name: &str) -> UploadOptions {
        let mut options = UploadOptions::default();
        if let Some(chunk_size) = self.options.chunk_size {
            options.chunk_size = chunk_size;
        }
        if let Some(max_retries) = self.options.max_retries {
            options.max_retries = max_retries;
        }
        if let Some(timeout) = self.options.timeout {
            options.timeout = timeout;
        }

        let progress_state = self.state.clone();
        let progress_file = file_name.to_string();
        options.on_progress = Some(Arc::new(move |progress: UploadProgress| {
            let mut state = progress_state.write();
            // Encoding finished: the rest of this upload is network time.
            if progress.is_complete() && matches!(state.phase, Some(UploadPhase::Encoding { .. }))
            {
                state.phase = Some(UploadPhase::Uploading {
                    file: progress_file.clone(),
                });
            }
            state.progress = Some(progress);
        }));

        let chunk_state = self.state.clone();
        let chunk_file = file_name.to_string();
        options.on_chunk_complete = Some(Arc::new(move |completed, total| {
            tracing::debug!(chunk = completed, total, "chunk completed");
            let mut state = chunk_state.write();
            if matches!(state.phase, Some(UploadPhase::Encoding { .. })) {
                state.phase = Some(UploadPhase::Uploading {
                    file: chunk_file.clone(),
                });
            }
        }));

        options
    }

    #[cfg(test)]
    pub(crate) fn record_for_test(&self, result: UploadResult) {
        self.uploaded.write().push(result);
    }
}
