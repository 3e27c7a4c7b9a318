// Test doubles for the kernel traits
//
// A directory that can be injected into ServerDeps in place of the store's
// own handle lookup, so mention resolution can be exercised in isolation.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::BaseAccountDirectory;
use crate::domains::publishers::models::Publisher;

// =============================================================================
// Spy Account Directory
// =============================================================================

/// Resolves only the handles it was given and records every lookup.
#[derive(Clone, Default)]
pub struct SpyAccountDirectory {
    known: Arc<Mutex<HashMap<String, Publisher>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl SpyAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher(self, publisher: &Publisher) -> Self {
        self.known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(publisher.account_handle.clone(), publisher.clone());
        self
    }

    /// Handles looked up so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl BaseAccountDirectory for SpyAccountDirectory {
    async fn find_publisher_by_account_handle(&self, handle: &str) -> Result<Option<Publisher>> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).push(handle.to_string());
        Ok(self.known.lock().unwrap_or_else(PoisonError::into_inner).get(handle).cloned())
    }
}
