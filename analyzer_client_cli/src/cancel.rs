use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use futures::future::{abortable, AbortHandle};

use crate::error::ClientError;

/// Registry of in-flight requests keyed by logical name. Registering a new
/// request under a key aborts the previous holder, so at most one request per
/// name is ever in flight. Abortion is cooperative: the wrapped future stops
/// at its next await point.
#[derive(Debug, Default)]
pub struct AbortRegistry {
    handles: DashMap<String, (u64, AbortHandle)>,
    next_id: AtomicU64,
}

impl AbortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut` registered under `name`. Returns `ClientError::Cancelled`
    /// if another registration (or an explicit abort) displaced it.
    pub async fn run<F>(&self, name: &str, fut: F) -> Result<F::Output, ClientError>
    where
        F: Future,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (fut, handle) = abortable(fut);

        if let Some((_, previous)) = self.handles.insert(name.to_string(), (id, handle)) {
            previous.abort();
        }

        let result = fut.await;

        // Only clean up our own entry; a newer registration may own the slot.
        self.handles.remove_if(name, |_, (owner, _)| *owner == id);

        result.map_err(|_| ClientError::Cancelled(name.to_string()))
    }

    pub fn abort(&self, name: &str) {
        if let Some((_, (_, handle))) = self.handles.remove(name) {
            handle.abort();
        }
    }

    pub fn abort_all(&self) {
        for entry in self.handles.iter() {
            entry.value().1.abort();
        }
        self.handles.clear();
    }
}
