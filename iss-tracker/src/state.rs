use iss_core::{EphemerisSource, EphemerisStore, RefreshController};
use std::sync::Arc;
use std::time::Duration;

use crate::geo::ReverseGeocoder;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EphemerisStore>,
    pub refresh: Arc<RefreshController>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    /// Upper bound on one reverse-geocoding call
    pub geocode_timeout: Duration,
}

impl AppState {
    pub fn new(
        source: Arc<dyn EphemerisSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
        geocode_timeout: Duration,
    ) -> Self {
        let store = Arc::new(EphemerisStore::new());
        let refresh = Arc::new(RefreshController::new(source, store.clone()));
        Self {
            store,
            refresh,
            geocoder,
            geocode_timeout,
        }
    }
}
