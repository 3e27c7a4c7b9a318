//! Server dependencies for domain actions (using traits for testability)
//!
//! Every action takes `&ServerDeps`; tests build one over a `MemoryStore`,
//! the binary over whichever store the configuration selects.

use std::sync::Arc;

use crate::domains::annotation::Markers;
use crate::kernel::{BaseAccountDirectory, BaseSocialStore, MemoryStore};

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseSocialStore>,
    /// Resolves `@handle` mentions to publishers
    pub directory: Arc<dyn BaseAccountDirectory>,
    pub markers: Markers,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseSocialStore>,
        directory: Arc<dyn BaseAccountDirectory>,
        markers: Markers,
    ) -> Self {
        Self {
            store,
            directory,
            markers,
        }
    }

    /// Store and directory backed by one fresh `MemoryStore`.
    pub fn in_memory(markers: Markers) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, markers)
    }
}

impl std::fmt::Debug for ServerDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDeps")
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}
