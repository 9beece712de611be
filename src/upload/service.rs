use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::cancel::CancelRegistry;
use super::chunked::chunked_upload;
use super::combine::{ChunkCombiner, HttpCombiner};
use super::direct::direct_upload;
use super::error::Result;
use super::types::{Performance, UploadMetadata, UploadOptions, UploadResult};
use crate::chunk::{ChunkError, FileSource};
use crate::client::UploadClient;
use crate::encode::Base64Encoder;

/// Single entry point for uploads.
///
/// Dispatches direct vs chunked on file size, owns the cancellation
/// registry and the combiner, and converts every internal error into a
/// failed [`UploadResult`] — `upload_file` never returns `Err`.
pub struct UploadService {
    client: Arc<UploadClient>,
    combiner: Arc<dyn ChunkCombiner>,
    encoder: Base64Encoder,
    cancellations: CancelRegistry,
}

impl UploadService {
    pub fn new(client: UploadClient) -> Self {
        let client = Arc::new(client);
        Self {
            combiner: Arc::new(HttpCombiner::new(client.clone())),
            client,
            encoder: Base64Encoder::new(),
            cancellations: CancelRegistry::new(),
        }
    }

    /// Substitute the reassembly dependency (tests, alternative backends).
    pub fn with_combiner(mut self, combiner: Arc<dyn ChunkCombiner>) -> Self {
        self.combiner = combiner;
        self
    }

    pub fn with_cancellations(mut self, cancellations: CancelRegistry) -> Self {
        self.cancellations = cancellations;
        self
    }

    pub fn cancellations(&self) -> &CancelRegistry {
        &self.cancellations
    }

    pub(super) fn client(&self) -> &UploadClient {
        &self.client
    }

    pub(super) fn combiner(&self) -> &dyn ChunkCombiner {
        self.combiner.as_ref()
    }

    pub(super) fn encoder(&self) -> &Base64Encoder {
        &self.encoder
    }

    /// Upload one file under a fresh upload id.
    pub async fn upload_file(
        &self,
        source: &FileSource,
        metadata: &UploadMetadata,
        options: &UploadOptions,
    ) -> UploadResult {
        let upload_id = uuid::Uuid::new_v4().to_string();
        self.upload_file_as(&upload_id, source, metadata, options)
            .await
    }

    /// Upload one file under a caller-chosen id, cancellable through
    /// the registry while in flight.
    pub async fn upload_file_as(
        &self,
        upload_id: &str,
        source: &FileSource,
        metadata: &UploadMetadata,
        options: &UploadOptions,
    ) -> UploadResult {
        let started = Instant::now();
        let cancel = self.cancellations.register(upload_id);
        crate::metrics::record_upload_started(source.size());

        let outcome = self.dispatch(source, metadata, options, &cancel).await;
        self.cancellations.remove(upload_id);

        match outcome {
            Ok(result) => {
                crate::metrics::record_upload_completed(started.elapsed(), source.size());
                result
            }
            Err(error) => {
                let total_time = started.elapsed().as_millis() as u64;
                tracing::error!(
                    file = source.file_name(),
                    error = %error,
                    total_ms = total_time,
                    "upload failed"
                );
                crate::metrics::record_upload_failed();
                UploadResult::failed(error.to_string(), Performance::elapsed_only(total_time))
            }
        }
    }

    async fn dispatch(
        &self,
        source: &FileSource,
        metadata: &UploadMetadata,
        options: &UploadOptions,
        cancel: &CancellationToken,
    ) -> Result<UploadResult> {
        metadata.validate()?;
        if options.chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize(0).into());
        }

        // Exactly one path per file: direct at or below the threshold,
        // chunked above it.
        if source.size() <= options.chunk_size {
            direct_upload(self, metadata, options, source, cancel).await
        } else {
            chunked_upload(self, metadata, options, source, cancel).await
        }
    }
}
