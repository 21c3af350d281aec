//! Feed poller: fetches the latest reading on an interval or on demand.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Notify, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::AppState;
use crate::acquisition::fallback::fallback_observation;
use crate::acquisition::ReadingSource;
use crate::types::Observation;

/// Fetch once and store the result, substituting demo data on failure.
///
/// Never fails: the returned observation is whatever was stored.
pub async fn refresh_once(source: &dyn ReadingSource, state: &RwLock<AppState>) -> Observation {
    match source.latest().await {
        Ok(observation) => {
            debug!(
                source = source.source_name(),
                observed_at = %observation.observed_at,
                "Feed reading received"
            );
            state.write().await.record_live(observation.clone());
            observation
        }
        Err(e) => {
            let observation = fallback_observation(Utc::now());
            let mut guard = state.write().await;
            guard.record_fallback(observation.clone(), e.to_string());
            warn!(
                source = source.source_name(),
                error = %e,
                consecutive_failures = guard.consecutive_failures,
                "Feed fetch failed, showing demo reading"
            );
            observation
        }
    }
}

/// Poll `source` until `cancel` fires.
///
/// Fetches immediately, then every `interval`, and additionally whenever
/// `refresh` is notified. A manual refresh restarts the interval.
pub async fn run_feed_poller(
    source: Arc<dyn ReadingSource>,
    state: Arc<RwLock<AppState>>,
    interval: Duration,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
) -> u64 {
    info!(
        source = source.source_name(),
        interval_secs = interval.as_secs(),
        "Feed poller starting"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut polls = 0u64;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!(polls, "Feed poller received shutdown signal");
                return polls;
            }
            _ = ticker.tick() => {}
            () = refresh.notified() => {
                debug!("Manual refresh requested");
                ticker.reset();
            }
        }

        refresh_once(source.as_ref(), &state).await;
        polls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{demo_reading, FeedError, StaticSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakySource {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ReadingSource for FlakySource {
        async fn latest(&self) -> Result<Observation, FeedError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Err(FeedError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            } else {
                let mut r = demo_reading();
                r.nitrogen = 130.0;
                Ok(Observation::live(r, Utc::now()))
            }
        }
        async fn history(&self, _results: usize) -> Result<Vec<Observation>, FeedError> {
            Err(FeedError::EmptyFeed)
        }
        fn source_name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_refresh_once_alternates_fallback_and_live() {
        let source = FlakySource {
            calls: AtomicU32::new(0),
        };
        let state = RwLock::new(AppState::default());

        let first = refresh_once(&source, &state).await;
        assert!(first.is_fallback());
        {
            let s = state.read().await;
            assert!(!s.connected);
            assert!(s.last_error.as_deref().unwrap().contains("503"));
        }

        let second = refresh_once(&source, &state).await;
        assert!(!second.is_fallback());
        assert_eq!(second.reading.nitrogen, 130.0);
        let s = state.read().await;
        assert!(s.connected);
        assert_eq!(s.total_polls, 2);
        assert_eq!(s.failed_polls, 1);
    }

    #[tokio::test]
    async fn test_poller_fetches_immediately_and_stops_on_cancel() {
        let source: Arc<dyn ReadingSource> = Arc::new(StaticSource::new(vec![Observation::live(
            demo_reading(),
            Utc::now(),
        )]));
        let state = Arc::new(RwLock::new(AppState::default()));
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_feed_poller(
            Arc::clone(&source),
            Arc::clone(&state),
            Duration::from_secs(3600),
            Arc::clone(&refresh),
            cancel.clone(),
        ));

        // First tick fires immediately.
        for _ in 0..50 {
            if state.read().await.total_polls > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.read().await.total_polls, 1);

        refresh.notify_one();
        for _ in 0..50 {
            if state.read().await.total_polls > 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.read().await.total_polls, 2);

        cancel.cancel();
        let polls = handle.await.unwrap();
        assert_eq!(polls, 2);
    }
}
