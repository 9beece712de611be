use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use docstream::chunk::FileSource;
use docstream::client::{
    ClientConfig, CombineRequest, CombineResponse, UploadClient, UploadRequest, UploadResponse,
};
use docstream::manager::{ManagerOptions, UploadManager, UploadPhase};
use docstream::progress::UploadProgress;
use docstream::upload::{UploadMetadata, UploadOptions, UploadService};

const MIB: u64 = 1024 * 1024;

/// In-process stand-in for the upload backend, with fault injection.
#[derive(Default)]
struct EndpointState {
    uploads: Vec<UploadRequest>,
    combines: Vec<CombineRequest>,
    /// Direct uploads of these file names always fail.
    fail_files: HashSet<String>,
    /// chunk_index -> number of times that chunk should still fail.
    chunk_failures: HashMap<u32, u32>,
    /// Hold every request open long enough to trip timeouts.
    stall: bool,
}

type Shared = Arc<Mutex<EndpointState>>;

async fn upload_handler(
    State(state): State<Shared>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let stall = state.lock().stall;
    if stall {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    let mut state = state.lock();
    let is_chunk = request.is_chunk.unwrap_or(false);
    let key = if is_chunk {
        format!(
            "{}/{}",
            request.session_id.as_deref().unwrap_or(""),
            request.file_name
        )
    } else {
        format!(
            "{}/{}/{}",
            request.reference_id, request.section_name, request.file_name
        )
    };
    state.uploads.push(request.clone());

    if !is_chunk && state.fail_files.contains(&request.file_name) {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "injected direct failure".to_string(),
        ));
    }
    if is_chunk {
        if let Some(remaining) = state
            .chunk_failures
            .get_mut(&request.chunk_index.unwrap_or(0))
        {
            if *remaining > 0 {
                *remaining -= 1;
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "injected chunk failure".to_string(),
                ));
            }
        }
    }

    Ok(Json(UploadResponse {
        url: format!("https://storage.test/{key}"),
        key,
        performance: None,
    }))
}

async fn combine_handler(
    State(state): State<Shared>,
    Json(request): Json<CombineRequest>,
) -> Json<CombineResponse> {
    let key = format!("{}/final", request.session_id);
    state.lock().combines.push(request);
    Json(CombineResponse {
        url: format!("https://storage.test/{key}"),
        key,
    })
}

async fn spawn_endpoint(state: Shared) -> String {
    let app = Router::new()
        .route("/api/s3-upload", post(upload_handler))
        .route("/api/s3-combine", post(combine_handler))
        // Base64-encoded 5 MiB chunks overflow axum's default 2 MB cap.
        .layer(axum::extract::DefaultBodyLimit::max(32 * 1024 * 1024))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn write_test_file(dir: &tempfile::TempDir, name: &str, size: u64) -> FileSource {
    let path = dir.path().join(name);
    let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
    tokio::fs::write(&path, &data).await.unwrap();
    FileSource::open(&path).await.unwrap()
}

fn test_metadata() -> UploadMetadata {
    UploadMetadata::new("app-42", "income", "payslip", "zone-9")
}

fn service_against(base_url: &str) -> UploadService {
    UploadService::new(UploadClient::new(ClientConfig::with_base_url(base_url)))
}

#[tokio::test]
async fn test_direct_upload_small_file() {
    let state = Shared::default();
    let base_url = spawn_endpoint(state.clone()).await;
    let service = service_against(&base_url);

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "lease.pdf", 1024).await;

    let samples: Arc<Mutex<Vec<UploadProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = samples.clone();
    let options = UploadOptions::default().on_progress(Arc::new(move |p| sink.lock().push(p)));

    let result = service
        .upload_file(&source, &test_metadata(), &options)
        .await;

    println!("✓ Direct upload result: {result:?}");
    assert!(result.success);
    assert_eq!(result.key.as_deref(), Some("app-42/income/lease.pdf"));

    let state = state.lock();
    assert_eq!(state.uploads.len(), 1);
    assert_eq!(state.combines.len(), 0);

    let request = &state.uploads[0];
    assert_eq!(request.file_name, "lease.pdf");
    assert_eq!(request.file_type, "application/pdf");
    assert_eq!(request.zoneinfo, "zone-9");
    assert!(request.is_chunk.is_none());
    assert!(request.session_id.is_none());

    let samples = samples.lock();
    assert!(!samples.is_empty());
    assert!(samples.last().unwrap().is_complete());
}

#[tokio::test]
async fn test_direct_path_at_exact_threshold() {
    let state = Shared::default();
    let base_url = spawn_endpoint(state.clone()).await;
    let service = service_against(&base_url);

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "id.png", 4096).await;

    // size == chunk_size routes direct, never chunked.
    let options = UploadOptions::default().with_chunk_size(4096);
    let result = service
        .upload_file(&source, &test_metadata(), &options)
        .await;

    assert!(result.success);
    let state = state.lock();
    assert_eq!(state.uploads.len(), 1);
    assert!(state.uploads[0].is_chunk.is_none());
    assert_eq!(state.combines.len(), 0);
}

#[tokio::test]
async fn test_chunked_upload_12mib_three_chunks() {
    let state = Shared::default();
    let base_url = spawn_endpoint(state.clone()).await;
    let service = service_against(&base_url);

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "bank-statements.pdf", 12 * MIB).await;

    let chunk_calls: Arc<Mutex<Vec<(u32, u32)>>> = Arc::new(Mutex::new(Vec::new()));
    let chunk_sink = chunk_calls.clone();
    let samples: Arc<Mutex<Vec<UploadProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let progress_sink = samples.clone();

    let options = UploadOptions::default()
        .with_chunk_size(5 * MIB)
        .on_chunk_complete(Arc::new(move |done, total| {
            chunk_sink.lock().push((done, total))
        }))
        .on_progress(Arc::new(move |p| progress_sink.lock().push(p)));

    let result = service
        .upload_file(&source, &test_metadata(), &options)
        .await;

    println!("✓ Chunked upload result: {result:?}");
    assert!(result.success);

    // ceil(12/5) = 3 chunk-complete calls, strictly increasing, no gaps.
    assert_eq!(*chunk_calls.lock(), vec![(1, 3), (2, 3), (3, 3)]);

    let state = state.lock();
    assert_eq!(state.uploads.len(), 3);
    for (i, request) in state.uploads.iter().enumerate() {
        assert_eq!(request.chunk_index, Some(i as u32));
        assert_eq!(request.file_name, format!("chunk_{i}"));
        assert_eq!(request.file_type, "application/octet-stream");
        assert_eq!(request.is_chunk, Some(true));
        assert_eq!(request.session_id, state.uploads[0].session_id);
    }

    // 5 MiB, 5 MiB, 2 MiB — base64 length is 4 * ceil(n / 3).
    let base64_len = |n: u64| 4 * n.div_ceil(3);
    assert_eq!(state.uploads[0].file_data.len() as u64, base64_len(5 * MIB));
    assert_eq!(state.uploads[2].file_data.len() as u64, base64_len(2 * MIB));

    // One combine call carrying the chunk keys in order.
    assert_eq!(state.combines.len(), 1);
    let combine = &state.combines[0];
    assert_eq!(combine.chunk_keys.len(), 3);
    assert!(combine.chunk_keys[0].ends_with("chunk_0"));
    assert!(combine.chunk_keys[2].ends_with("chunk_2"));
    assert_eq!(result.key.as_deref(), Some(&*format!("{}/final", combine.session_id)));

    // Cumulative progress never regresses and finishes at 100%.
    let samples = samples.lock();
    assert!(samples.windows(2).all(|w| w[0].loaded <= w[1].loaded));
    assert_eq!(samples.last().unwrap().percentage, 100);
}

#[tokio::test]
async fn test_chunk_retry_then_success() {
    let state = Shared::default();
    state.lock().chunk_failures.insert(1, 2);
    let base_url = spawn_endpoint(state.clone()).await;

    let manager = UploadManager::new(service_against(&base_url)).with_options(ManagerOptions {
        chunk_size: Some(256 * 1024),
        max_retries: Some(3),
        notify: false,
        ..Default::default()
    });

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "statement.pdf", 600 * 1024).await;

    let result = manager.upload_file(&source, &test_metadata()).await;

    println!("✓ Retry-then-success result: {result:?}");
    assert!(result.success);
    // One aggregated result for the whole file, retries notwithstanding.
    assert_eq!(manager.uploaded_files().len(), 1);

    let state = state.lock();
    let attempts_for = |index: u32| {
        state
            .uploads
            .iter()
            .filter(|r| r.chunk_index == Some(index))
            .count()
    };
    assert_eq!(attempts_for(0), 1);
    assert_eq!(attempts_for(1), 3); // failed twice, succeeded on the third
    assert_eq!(attempts_for(2), 1);
    assert_eq!(state.combines.len(), 1);

    // The chunk that retried still carried the right bytes.
    let retried = state
        .uploads
        .iter()
        .find(|r| r.chunk_index == Some(1))
        .unwrap();
    let decoded = STANDARD.decode(&retried.file_data).unwrap();
    let expected: Vec<u8> = (256 * 1024..512 * 1024u64).map(|i| (i % 256) as u8).collect();
    assert_eq!(decoded, expected);
}

#[tokio::test]
async fn test_chunk_retries_exhausted_aborts_file() {
    let state = Shared::default();
    state.lock().chunk_failures.insert(0, u32::MAX);
    let base_url = spawn_endpoint(state.clone()).await;
    let service = service_against(&base_url);

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "statement.pdf", 600 * 1024).await;

    let options = UploadOptions::default()
        .with_chunk_size(256 * 1024)
        .with_max_retries(2);

    let result = service
        .upload_file(&source, &test_metadata(), &options)
        .await;

    println!("✓ Exhausted-retries result: {result:?}");
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("Chunk 1/3"), "unexpected error: {error}");

    let state = state.lock();
    // Exactly max_retries attempts on chunk 0, nothing afterward.
    assert_eq!(state.uploads.len(), 2);
    assert!(state.uploads.iter().all(|r| r.chunk_index == Some(0)));
    assert_eq!(state.combines.len(), 0);
}

#[tokio::test]
async fn test_batch_partial_success() {
    let state = Shared::default();
    state.lock().fail_files.insert("fail.pdf".to_string());
    let base_url = spawn_endpoint(state.clone()).await;

    let manager = UploadManager::new(service_against(&base_url))
        .with_options(ManagerOptions {
            notify: false,
            ..Default::default()
        });

    let dir = tempfile::TempDir::new().unwrap();
    let file_a = write_test_file(&dir, "fail.pdf", 512).await;
    let file_b = write_test_file(&dir, "ok.pdf", 512).await;

    let results = manager
        .upload_files(&[file_a, file_b], &test_metadata())
        .await;

    println!("✓ Batch results: {results:?}");
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert!(results[1].success);

    // The batch keeps going past a failure; only the success is kept.
    assert!(!manager.is_uploading());
    assert_eq!(manager.uploaded_files().len(), 1);
    assert!(matches!(manager.phase(), UploadPhase::Done));
}

#[tokio::test]
async fn test_timeout_fails_direct_upload() {
    let state = Shared::default();
    state.lock().stall = true;
    let base_url = spawn_endpoint(state.clone()).await;
    let service = service_against(&base_url);

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "slow.pdf", 512).await;

    let options = UploadOptions::default().with_timeout(Duration::from_millis(200));
    let result = service
        .upload_file(&source, &test_metadata(), &options)
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Timeout"));
}

#[tokio::test]
async fn test_cancel_registry_aborts_in_flight_upload() {
    let state = Shared::default();
    state.lock().stall = true;
    let base_url = spawn_endpoint(state.clone()).await;
    let service = Arc::new(service_against(&base_url));
    let cancellations = service.cancellations().clone();

    let dir = tempfile::TempDir::new().unwrap();
    let source = write_test_file(&dir, "big.pdf", 512).await;
    let metadata = test_metadata();

    let task = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .upload_file_as("job-1", &source, &metadata, &UploadOptions::default())
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(cancellations.cancel("job-1"));

    let result = task.await.unwrap();
    println!("✓ Cancelled result: {result:?}");
    assert!(!result.success);
    assert!(result.error.unwrap().contains("cancelled"));
    assert_eq!(cancellations.in_flight(), 0);
}
