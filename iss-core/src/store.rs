//! Swappable in-memory ephemeris store

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EphemerisError, Result};
use crate::types::EphemerisSet;

/// Holds the currently loaded [`EphemerisSet`], if any.
///
/// Readers take an `Arc` snapshot and work on it without holding the
/// lock, writers install a whole new set. A reader therefore always sees
/// one complete set, never a mix of two fetches.
#[derive(Debug, Default)]
pub struct EphemerisStore {
    current: RwLock<Option<Arc<EphemerisSet>>>,
}

impl EphemerisStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `set`
    pub fn with_set(set: EphemerisSet) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(set))),
        }
    }

    /// Replace the contents wholesale.
    pub async fn load(&self, set: EphemerisSet) {
        let count = set.len();
        *self.current.write().await = Some(Arc::new(set));
        tracing::debug!("Ephemeris store loaded with {} state vectors", count);
    }

    pub async fn clear(&self) {
        *self.current.write().await = None;
        tracing::debug!("Ephemeris store cleared");
    }

    /// Current contents, or `None` when nothing is loaded.
    pub async fn snapshot(&self) -> Option<Arc<EphemerisSet>> {
        self.current.read().await.clone()
    }

    /// Like [`snapshot`](Self::snapshot) but reports an empty store as an error.
    pub async fn require(&self) -> Result<Arc<EphemerisSet>> {
        self.snapshot().await.ok_or(EphemerisError::EmptyStore)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}
