use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::Result;
use super::service::UploadService;
use super::types::{Performance, UploadMetadata, UploadOptions, UploadResult};
use crate::client::UploadRequest;

/// Single-request path for files at or below the chunk threshold.
///
/// The whole file is encoded once (progress tracked through the
/// encoder) and uploaded in one call. No retry is applied here.
pub(super) async fn direct_upload(
    service: &UploadService,
    metadata: &UploadMetadata,
    options: &UploadOptions,
    source: &crate::chunk::FileSource,
    cancel: &CancellationToken,
) -> Result<UploadResult> {
    let started = Instant::now();

    let encode_started = Instant::now();
    let file_data = service
        .encoder()
        .encode_slice(&source.whole(), options.on_progress.as_ref())
        .await?;
    let parse_time = encode_started.elapsed().as_millis() as u64;
    crate::metrics::record_encode_duration(encode_started.elapsed());

    let request = UploadRequest {
        file_data,
        file_name: source.file_name().to_string(),
        file_type: source.content_type().to_string(),
        reference_id: metadata.reference_id.clone(),
        section_name: metadata.section_name.clone(),
        document_name: metadata.document_name.clone(),
        zoneinfo: metadata.zone_id.clone(),
        session_id: None,
        chunk_index: None,
        is_chunk: None,
    };

    let upload_started = Instant::now();
    let response = service.client().upload(&request, options.timeout, cancel).await?;
    let upload_time = upload_started.elapsed().as_millis() as u64;

    // Server-side buffer/url timings pass through when reported.
    let (buffer_time, url_time) = response
        .performance
        .map(|p| (p.buffer_time, p.url_time))
        .unwrap_or((0, 0));

    let total_time = started.elapsed().as_millis() as u64;
    tracing::info!(
        file = source.file_name(),
        size = source.size(),
        total_ms = total_time,
        "direct upload completed"
    );

    Ok(UploadResult::ok(
        response.url,
        response.key,
        Performance {
            total_time,
            parse_time,
            buffer_time,
            upload_time,
            url_time,
        },
    ))
}
