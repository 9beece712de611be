//! Metrics and observability module
//!
//! Provides Prometheus-compatible metrics for monitoring uploads.
//!
//! Key metrics exposed:
//! - Upload lifecycle (started, completed, failed)
//! - Chunk operations (uploaded, retried)
//! - Encode and upload durations
//! - Upload throughput (bytes/second)

pub mod exporter;
pub mod recorder;

pub use exporter::{start_metrics_server, MetricsConfig};
pub use recorder::{
    init_metrics, record_chunk_retry, record_chunk_uploaded, record_encode_duration,
    record_upload_completed, record_upload_failed, record_upload_started,
};
