use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Explicit registry of in-flight cancellation tokens, keyed by upload
/// id. Constructor-injected into the service so concurrent-submission
/// tests stay deterministic; there is no module-level state.
#[derive(Debug, Clone, Default)]
pub struct CancelRegistry {
    tokens: Arc<DashMap<String, CancellationToken>>,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a token for `upload_id`. Replaces any stale entry.
    pub(crate) fn register(&self, upload_id: &str) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.insert(upload_id.to_string(), token.clone());
        token
    }

    pub(crate) fn remove(&self, upload_id: &str) {
        self.tokens.remove(upload_id);
    }

    /// Cancel one in-flight upload. Returns false if the id is unknown
    /// (already finished or never started).
    pub fn cancel(&self, upload_id: &str) -> bool {
        match self.tokens.get(upload_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything currently in flight.
    pub fn cancel_all(&self) {
        for entry in self.tokens.iter() {
            entry.value().cancel();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.tokens.len()
    }
}
