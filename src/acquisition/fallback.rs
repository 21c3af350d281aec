//! Demo data substituted when the feed is unreachable

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::warn;

use super::ReadingSource;
use crate::config::defaults;
use crate::types::{Observation, SensorReading};

/// The fixed demo reading shown whenever live data is unavailable.
pub const fn demo_reading() -> SensorReading {
    SensorReading {
        nitrogen: 45.2,
        phosphorus: 23.8,
        potassium: 156.4,
        soil_ph: 6.5,
        soil_moisture: 68.5,
        temperature: 24.3,
        humidity: 72.1,
    }
}

/// The demo reading stamped at `now`, marked as fallback.
pub const fn fallback_observation(now: DateTime<Utc>) -> Observation {
    Observation::fallback(demo_reading(), now)
}

/// `results` hourly demo observations ending at `now`, oldest first.
pub fn demo_history(results: usize, now: DateTime<Utc>) -> Vec<Observation> {
    demo_history_with_rng(results, now, &mut rand::thread_rng())
}

/// [`demo_history`] with a caller-supplied RNG.
pub fn demo_history_with_rng<R: Rng + ?Sized>(
    results: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Observation> {
    let step = Duration::seconds(defaults::DEMO_HISTORY_STEP_SECS);
    (0..results)
        .map(|i| {
            let hours_back = i32::try_from(results - 1 - i).unwrap_or(i32::MAX);
            let reading = SensorReading {
                nitrogen: rng.gen_range(40.0..60.0),
                phosphorus: rng.gen_range(20.0..35.0),
                potassium: rng.gen_range(140.0..180.0),
                soil_ph: 6.5,
                soil_moisture: rng.gen_range(60.0..80.0),
                temperature: rng.gen_range(20.0..30.0),
                humidity: rng.gen_range(65.0..85.0),
            };
            Observation::fallback(reading, now - step * hours_back)
        })
        .collect()
}

/// Latest observation from `source`, or the demo reading if the fetch fails.
pub async fn latest_or_fallback(source: &dyn ReadingSource) -> Observation {
    match source.latest().await {
        Ok(obs) => obs,
        Err(e) => {
            warn!(source = source.source_name(), error = %e, "Feed unavailable, using demo reading");
            fallback_observation(Utc::now())
        }
    }
}

/// History from `source`, or demo history of the same length if the fetch fails.
pub async fn history_or_fallback(source: &dyn ReadingSource, results: usize) -> Vec<Observation> {
    match source.history(results).await {
        Ok(history) => history,
        Err(e) => {
            warn!(
                source = source.source_name(),
                results,
                error = %e,
                "Feed history unavailable, using demo history"
            );
            demo_history(results, Utc::now())
        }
    }
}
