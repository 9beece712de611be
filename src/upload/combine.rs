use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientResult, CombineRequest, CombineResponse, UploadClient};

/// Server-side reassembly of uploaded chunk objects into the final
/// document: ordered chunk keys and a session id in, the final object's
/// `{url, key}` out. An external dependency with its own contract, not
/// something this crate fabricates.
pub trait ChunkCombiner: Send + Sync {
    fn combine<'a>(
        &'a self,
        request: &'a CombineRequest,
        timeout: Duration,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, ClientResult<CombineResponse>>;
}

/// Combiner backed by the backend's combine endpoint.
pub struct HttpCombiner {
    client: Arc<UploadClient>,
}

impl HttpCombiner {
    pub fn new(client: Arc<UploadClient>) -> Self {
        Self { client }
    }
}

impl ChunkCombiner for HttpCombiner {
    fn combine<'a>(
        &'a self,
        request: &'a CombineRequest,
        timeout: Duration,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, ClientResult<CombineResponse>> {
        Box::pin(async move { self.client.combine(request, timeout, cancel).await })
    }
}
