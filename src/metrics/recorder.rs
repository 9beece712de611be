//! Metrics recorder for upload operations
//!
//! Records counters and timings about upload volume, retries, and
//! throughput.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        "docstream_uploads_started_total",
        "Total number of file uploads started"
    );
    describe_counter!(
        "docstream_uploads_completed_total",
        "Total number of file uploads completed successfully"
    );
    describe_counter!(
        "docstream_uploads_failed_total",
        "Total number of file uploads that failed"
    );
    describe_counter!(
        "docstream_chunks_uploaded_total",
        "Total number of chunks uploaded"
    );
    describe_counter!(
        "docstream_chunk_retries_total",
        "Total number of chunk upload retry attempts"
    );
    describe_counter!("docstream_bytes_uploaded_total", "Total bytes uploaded");

    describe_gauge!(
        "docstream_active_uploads",
        "Number of currently active uploads"
    );

    describe_histogram!(
        "docstream_upload_duration_seconds",
        "Wall-clock duration of a whole file upload"
    );
    describe_histogram!(
        "docstream_encode_duration_seconds",
        "Time to base64-encode a file or chunk"
    );
    describe_histogram!(
        "docstream_upload_throughput_bytes_per_second",
        "Upload throughput in bytes per second"
    );
}

/// Record a file upload starting
pub fn record_upload_started(file_size: u64) {
    counter!("docstream_uploads_started_total").increment(1);
    gauge!("docstream_active_uploads").increment(1.0);
    histogram!("docstream_upload_size_bytes").record(file_size as f64);
}

/// Record a file upload completing successfully
pub fn record_upload_completed(duration: Duration, bytes: u64) {
    counter!("docstream_uploads_completed_total").increment(1);
    counter!("docstream_bytes_uploaded_total").increment(bytes);
    gauge!("docstream_active_uploads").decrement(1.0);

    histogram!("docstream_upload_duration_seconds").record(duration.as_secs_f64());

    let throughput = if duration.as_secs_f64() > 0.0 {
        bytes as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    histogram!("docstream_upload_throughput_bytes_per_second").record(throughput);
}

/// Record a file upload failing
pub fn record_upload_failed() {
    counter!("docstream_uploads_failed_total").increment(1);
    gauge!("docstream_active_uploads").decrement(1.0);
}

/// Record a chunk being uploaded
pub fn record_chunk_uploaded(chunk_size: u64) {
    counter!("docstream_chunks_uploaded_total").increment(1);
    counter!("docstream_bytes_uploaded_total").increment(chunk_size);
}

/// Record a retry attempt for a chunk
pub fn record_chunk_retry() {
    counter!("docstream_chunk_retries_total").increment(1);
}

/// Record base64 encode time
pub fn record_encode_duration(duration: Duration) {
    histogram!("docstream_encode_duration_seconds").record(duration.as_secs_f64());
}
