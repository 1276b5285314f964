//! Single-slot forecast cache bounded by age and location

use crate::Result;
use crate::error::DroneWeatherError;
use crate::models::{Coordinates, ForecastPayload};
use crate::storage::SlotStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const CACHE_KEY: &str = "weather_data_cache";

/// Maximum age of a reusable entry
pub const FRESHNESS: Duration = Duration::minutes(60);

/// Maximum per-axis coordinate difference, in degrees
pub const LOCATION_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedForecast {
    pub payload: ForecastPayload,
    pub coordinates: Coordinates,
    pub fetched_at: DateTime<Utc>,
}

impl CachedForecast {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at > FRESHNESS
    }
}

/// Diagnostics for the cache slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub has_entry: bool,
    /// `None` when there is no entry to age
    pub is_expired: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Holds at most one fetched forecast; every store replaces it wholesale
pub struct ForecastCache<S> {
    store: S,
}

impl<S: SlotStore> ForecastCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, query: &Coordinates) -> Option<ForecastPayload> {
        self.get_at(query, Utc::now()).await
    }

    /// Cached payload when it is fresh at `now` and close enough to `query`.
    ///
    /// Storage failures are logged and reported as a miss.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get_at(&self, query: &Coordinates, now: DateTime<Utc>) -> Option<ForecastPayload> {
        let entry = match self.read_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::debug!("Cache empty");
                return None;
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable forecast cache: {e}");
                return None;
            }
        };

        if entry.is_expired_at(now) {
            tracing::debug!(fetched_at = %entry.fetched_at, "Cached forecast expired");
            None
        } else if !entry.coordinates.is_within(query, LOCATION_TOLERANCE) {
            tracing::debug!(
                cached = %entry.coordinates.format_coordinates(),
                distance_km = entry.coordinates.distance_km(query),
                "Cached forecast is for a different location"
            );
            None
        } else {
            tracing::debug!("Cached forecast still fresh");
            Some(entry.payload)
        }
    }

    pub async fn put(&self, coordinates: Coordinates, payload: &ForecastPayload) -> Result<()> {
        self.put_at(coordinates, payload, Utc::now()).await
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, payload))]
    pub async fn put_at(
        &self,
        coordinates: Coordinates,
        payload: &ForecastPayload,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        let entry = CachedForecast {
            payload: payload.clone(),
            coordinates,
            fetched_at,
        };
        let bytes = postcard::to_stdvec(&entry)
            .map_err(|e| DroneWeatherError::storage(format!("encode cache entry: {e}")))?;
        self.store.write(CACHE_KEY, bytes).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(CACHE_KEY).await?;
        tracing::info!("Forecast cache cleared");
        Ok(())
    }

    pub async fn status(&self) -> Result<CacheStatus> {
        self.status_at(Utc::now()).await
    }

    pub async fn status_at(&self, now: DateTime<Utc>) -> Result<CacheStatus> {
        let status = match self.read_entry().await? {
            Some(entry) => CacheStatus {
                has_entry: true,
                is_expired: Some(entry.is_expired_at(now)),
                timestamp: Some(entry.fetched_at),
            },
            None => CacheStatus {
                has_entry: false,
                is_expired: None,
                timestamp: None,
            },
        };
        Ok(status)
    }

    async fn read_entry(&self) -> Result<Option<CachedForecast>> {
        let Some(bytes) = self.store.read(CACHE_KEY).await? else {
            return Ok(None);
        };
        let entry = postcard::from_bytes(&bytes)
            .map_err(|e| DroneWeatherError::storage(format!("decode cache entry: {e}")))?;
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourlyForecastRecord;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn payload(coordinates: Coordinates) -> ForecastPayload {
        let hourly_data = (0..3)
            .map(|i| HourlyForecastRecord::calm(fetched_at() + Duration::hours(i)))
            .collect();
        ForecastPayload {
            coordinates,
            hourly_data,
            retrieved_at: fetched_at(),
        }
    }

    async fn filled_cache(coordinates: Coordinates) -> ForecastCache<MemoryStore> {
        let cache = ForecastCache::new(MemoryStore::new());
        cache
            .put_at(coordinates, &payload(coordinates), fetched_at())
            .await
            .unwrap();
        cache
    }

    #[rstest]
    #[case(Duration::minutes(59) + Duration::seconds(59), true)]
    #[case(Duration::minutes(60), true)]
    #[case(Duration::minutes(60) + Duration::seconds(1), false)]
    #[tokio::test]
    async fn test_freshness_boundary(#[case] age: Duration, #[case] hit: bool) {
        let here = Coordinates::new(46.8182, 8.2275);
        let cache = filled_cache(here).await;
        let result = cache.get_at(&here, fetched_at() + age).await;
        assert_eq!(result.is_some(), hit);
    }

    #[rstest]
    #[case(46.8182, 8.2275, true)]
    #[case(46.8187, 8.2275, true)]
    #[case(46.8182, 8.2266, true)]
    #[case(46.8200, 8.2275, false)]
    #[case(46.8182, 8.2290, false)]
    #[tokio::test]
    async fn test_location_tolerance(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] hit: bool,
        #[values(Duration::zero(), Duration::minutes(5))] age: Duration,
    ) {
        let cache = filled_cache(Coordinates::new(46.8182, 8.2275)).await;
        let result = cache
            .get_at(&Coordinates::new(lat, lon), fetched_at() + age)
            .await;
        assert_eq!(result.is_some(), hit);
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let first = Coordinates::new(46.8182, 8.2275);
        let second = Coordinates::new(47.3769, 8.5417);
        let cache = filled_cache(first).await;

        cache
            .put_at(second, &payload(second), fetched_at())
            .await
            .unwrap();

        let now = fetched_at() + Duration::minutes(1);
        assert!(cache.get_at(&first, now).await.is_none());
        let hit = cache.get_at(&second, now).await.unwrap();
        assert_eq!(hit.coordinates, second);
        assert_eq!(hit.hourly_data.len(), 3);
    }

    #[tokio::test]
    async fn test_status_and_clear() {
        let here = Coordinates::new(46.8182, 8.2275);
        let cache = filled_cache(here).await;

        let status = cache
            .status_at(fetched_at() + Duration::minutes(10))
            .await
            .unwrap();
        assert!(status.has_entry);
        assert_eq!(status.is_expired, Some(false));
        assert_eq!(status.timestamp, Some(fetched_at()));

        let later = cache
            .status_at(fetched_at() + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(later.is_expired, Some(true));

        cache.clear().await.unwrap();
        let empty = cache.status_at(fetched_at()).await.unwrap();
        assert!(!empty.has_entry);
        assert_eq!(empty.is_expired, None);
        assert_eq!(empty.timestamp, None);
        assert!(cache.get_at(&here, fetched_at()).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let store = MemoryStore::new();
        store.write(CACHE_KEY, vec![0xff; 4]).await.unwrap();
        let cache = ForecastCache::new(store);
        let here = Coordinates::new(46.8182, 8.2275);
        assert!(cache.get_at(&here, fetched_at()).await.is_none());
        assert!(cache.status_at(fetched_at()).await.is_err());
    }
}
