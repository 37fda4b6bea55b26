use iss_core::RefreshController;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{error, info, warn};

/// Startup attempts before giving up and serving an empty store
pub const STARTUP_ATTEMPTS: u32 = 3;
const RETRY_DELAY_SECONDS: u64 = 2;

/// Initial load with linear backoff. Returns whether data was loaded.
pub async fn initial_refresh(controller: &RefreshController, attempts: u32) -> bool {
    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = Duration::from_secs(RETRY_DELAY_SECONDS * attempt as u64);
            warn!(
                "Retrying ephemeris load after {:?} (attempt {}/{})",
                delay, attempt, attempts
            );
            tokio::time::sleep(delay).await;
        }

        match controller.refresh().await {
            Ok(count) => {
                info!("Initial ephemeris load: {} state vectors", count);
                return true;
            }
            Err(e) => error!("Initial ephemeris load failed (attempt {}/{}): {}", attempt, attempts, e),
        }
    }

    warn!("Starting with an empty data set; POST /post-data to retry");
    false
}

/// Background task re-fetching the ephemeris on a fixed interval
pub struct Refresher {
    controller: Arc<RefreshController>,
    interval_minutes: u64,
}

impl Refresher {
    pub fn new(controller: Arc<RefreshController>, interval_minutes: u64) -> Self {
        Self {
            controller,
            interval_minutes,
        }
    }

    /// Spawn the loop. The first tick is skipped since startup already loaded.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        info!(
            "Starting ephemeris refresher (interval: {} minutes)",
            self.interval_minutes
        );

        tokio::spawn(async move {
            let period = Duration::from_secs(self.interval_minutes.max(1) * 60);
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                info!("Triggering scheduled ephemeris refresh");

                if let Err(e) = self.controller.refresh().await {
                    error!("Scheduled refresh failed, keeping previous data: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use iss_core::{EphemerisError, EphemerisSource, EphemerisStore};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingSource {
        calls: AtomicU32,
    }

    #[async_trait]
    impl EphemerisSource for CountingSource {
        async fn fetch(&self) -> iss_core::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(EphemerisError::Fetch("offline".to_string()))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[tokio::test]
    async fn test_initial_refresh_gives_up_after_one_attempt() {
        let source = Arc::new(CountingSource { calls: AtomicU32::new(0) });
        let controller = RefreshController::new(source.clone(), Arc::new(EphemerisStore::new()));

        assert!(!initial_refresh(&controller, 1).await);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(!controller.store().is_loaded().await);
    }

    #[test]
    fn test_refresher_creation() {
        let source = Arc::new(CountingSource { calls: AtomicU32::new(0) });
        let controller = Arc::new(RefreshController::new(source, Arc::new(EphemerisStore::new())));

        let refresher = Refresher::new(controller, 30);
        assert_eq!(refresher.interval_minutes, 30);
    }
}
