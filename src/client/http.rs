use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::error::{ClientError, ClientResult};
use super::types::{CombineRequest, CombineResponse, UploadRequest, UploadResponse};

/// Endpoint locations for the upload backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub upload_path: String,
    pub combine_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            upload_path: "/api/s3-upload".to_string(),
            combine_path: "/api/s3-combine".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// One POST per call to the upload backend, with a bounded lifetime: a
/// cancellation token is armed at call time and the request races it
/// against the timeout deadline. Timer state is dropped on every exit
/// path.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl UploadClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn upload(
        &self,
        request: &UploadRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<UploadResponse> {
        self.post_json(&self.endpoint(&self.config.upload_path), request, timeout, cancel)
            .await
    }

    pub async fn combine(
        &self,
        request: &CombineRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<CombineResponse> {
        self.post_json(&self.endpoint(&self.config.combine_path), request, timeout, cancel)
            .await
    }

    async fn post_json<B, R>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ClientResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let send = self.http.post(url).json(body).send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            outcome = tokio::time::timeout(timeout, send) => match outcome {
                Err(_) => return Err(ClientError::Timeout(timeout)),
                Ok(result) => result?,
            },
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus { status, body });
        }

        Ok(response.json::<R>().await?)
    }
}
