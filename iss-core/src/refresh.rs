//! Refresh orchestration: fetch → parse → swap

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::parser::parse_oem;
use crate::store::EphemerisStore;

/// Something that can produce the raw OEM XML document.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    /// Fetch the current document. Failures are reported as
    /// [`EphemerisError::Fetch`](crate::EphemerisError::Fetch).
    async fn fetch(&self) -> Result<String>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Drives the store between its two states, Empty and Loaded.
pub struct RefreshController {
    source: Arc<dyn EphemerisSource>,
    store: Arc<EphemerisStore>,
}

impl RefreshController {
    pub fn new(source: Arc<dyn EphemerisSource>, store: Arc<EphemerisStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<EphemerisStore> {
        &self.store
    }

    /// Fetch and parse a fresh set, then swap it in.
    ///
    /// Errors propagate unchanged and leave the store as it was.
    /// Returns the number of state vectors loaded.
    pub async fn refresh(&self) -> Result<usize> {
        tracing::info!("Refreshing ephemeris from {}", self.source.describe());

        let xml = self.source.fetch().await?;
        let set = parse_oem(&xml)?;
        let count = set.len();

        self.store.load(set).await;
        tracing::info!("Ephemeris refreshed: {} state vectors", count);

        Ok(count)
    }

    pub async fn wipe(&self) {
        self.store.clear().await;
        tracing::info!("Ephemeris data wiped");
    }
}
