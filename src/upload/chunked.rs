use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{Result, UploadError};
use super::service::UploadService;
use super::types::{Performance, UploadMetadata, UploadOptions, UploadResult};
use crate::chunk::{ChunkPlan, FileSlice, FileSource};
use crate::client::{CombineRequest, UploadRequest, UploadResponse};
use crate::progress::ProgressTracker;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Sequential chunked path for files above the chunk threshold.
///
/// One chunk in flight at a time, strictly ascending index order; chunk
/// `i + 1` only starts after chunk `i`'s retry sequence terminates. Any
/// chunk exhausting its retries fails the whole file; nothing is kept
/// for resumption. On full success the ordered keys go to the combiner.
pub(super) async fn chunked_upload(
    service: &UploadService,
    metadata: &UploadMetadata,
    options: &UploadOptions,
    source: &FileSource,
    cancel: &CancellationToken,
) -> Result<UploadResult> {
    let started = Instant::now();
    let plan = ChunkPlan::new(source.size(), options.chunk_size)?;
    let total_chunks = plan.total_chunks();
    let session_id = format!(
        "{}-{}",
        metadata.reference_id,
        chrono::Utc::now().timestamp_millis()
    );
    let policy = RetryPolicy::new(options.max_retries);
    let tracker = ProgressTracker::new(source.size());

    tracing::info!(
        file = source.file_name(),
        size = source.size(),
        total_chunks,
        session_id = %session_id,
        "starting chunked upload"
    );

    let mut chunk_keys = Vec::with_capacity(total_chunks as usize);

    for index in 0..total_chunks {
        let (start, end) = plan.bounds(index)?;
        let slice = source.slice(start, end - start)?;

        let response = upload_chunk_with_retry(
            service, &slice, index, &session_id, metadata, &policy, options, cancel,
        )
        .await
        .map_err(|error| match error {
            // Exhausted retries on the network call; encode and other
            // failures pass through untouched.
            UploadError::Client(client_error) => UploadError::ChunkFailed {
                chunk: index + 1,
                total: total_chunks,
                attempts: policy.max_attempts(),
                source: client_error,
            },
            other => other,
        })?;

        crate::metrics::record_chunk_uploaded(slice.len());
        chunk_keys.push(response.key);

        if let Some(callback) = &options.on_chunk_complete {
            callback(index + 1, total_chunks);
        }
        if let Some(callback) = &options.on_progress {
            callback(tracker.sample(plan.bytes_through(index + 1)));
        }
    }

    let combine_request = CombineRequest {
        chunk_keys,
        session_id,
        reference_id: metadata.reference_id.clone(),
        section_name: metadata.section_name.clone(),
        document_name: metadata.document_name.clone(),
        zoneinfo: metadata.zone_id.clone(),
    };
    let combined = service
        .combiner()
        .combine(&combine_request, options.timeout, cancel)
        .await
        .map_err(UploadError::Combine)?;

    let total_time = started.elapsed().as_millis() as u64;
    tracing::info!(
        file = source.file_name(),
        total_chunks,
        total_ms = total_time,
        "chunked upload completed"
    );

    Ok(UploadResult::ok(
        combined.url,
        combined.key,
        Performance {
            total_time,
            parse_time: 0,
            buffer_time: 0,
            upload_time: total_time,
            url_time: 0,
        },
    ))
}

/// Encode once, then retry the network call under the policy. Encode
/// errors are fatal with no retry; network and non-2xx errors retry
/// until the policy is exhausted.
#[allow(clippy::too_many_arguments)]
async fn upload_chunk_with_retry(
    service: &UploadService,
    slice: &FileSlice<'_>,
    index: u32,
    session_id: &str,
    metadata: &UploadMetadata,
    policy: &RetryPolicy,
    options: &UploadOptions,
    cancel: &CancellationToken,
) -> Result<UploadResponse> {
    let file_data = service.encoder().encode_slice(slice, None).await?;

    let request = UploadRequest {
        file_data,
        file_name: format!("chunk_{index}"),
        file_type: "application/octet-stream".to_string(),
        reference_id: metadata.reference_id.clone(),
        section_name: metadata.section_name.clone(),
        document_name: metadata.document_name.clone(),
        zoneinfo: metadata.zone_id.clone(),
        session_id: Some(session_id.to_string()),
        chunk_index: Some(index),
        is_chunk: Some(true),
    };

    let client = service.client();
    let response = retry_with_backoff(policy, |attempt| {
        if attempt > 1 {
            crate::metrics::record_chunk_retry();
        }
        tracing::debug!(chunk = index + 1, attempt, "uploading chunk");
        let request = &request;
        async move { client.upload(request, options.timeout, cancel).await }
    })
    .await?;

    Ok(response)
}
