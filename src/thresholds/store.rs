//! Persistence of the active threshold configuration

use super::{
    DEFAULT_WEATHER_THRESHOLDS, PartialWeatherThresholds, WeatherThresholds, find_profile,
    normalize, validate,
};
use crate::Result;
use crate::error::DroneWeatherError;
use crate::storage::SlotStore;

pub const THRESHOLDS_KEY: &str = "weather_thresholds";

/// Reads and writes the active thresholds in a single JSON slot.
///
/// Reads never fail: a missing or unreadable slot yields the fallback
/// thresholds (the defaults unless configured otherwise).
pub struct ThresholdService<S> {
    store: S,
    fallback: WeatherThresholds,
}

impl<S: SlotStore> ThresholdService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            fallback: DEFAULT_WEATHER_THRESHOLDS,
        }
    }

    /// Use `thresholds` instead of the defaults when nothing is stored
    #[must_use]
    pub fn with_fallback(mut self, thresholds: WeatherThresholds) -> Self {
        self.fallback = thresholds;
        self
    }

    /// Active thresholds, always complete.
    ///
    /// When nothing is stored yet the fallback is persisted so later reads
    /// see the same values.
    #[tracing::instrument(name = "load_thresholds", level = "debug", skip(self))]
    pub async fn load(&self) -> WeatherThresholds {
        let bytes = match self.store.read(THRESHOLDS_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("No stored thresholds, using fallback");
                if let Err(e) = self.persist(&self.fallback).await {
                    tracing::warn!("Failed to persist fallback thresholds: {e:#}");
                }
                return self.fallback;
            }
            Err(e) => {
                tracing::warn!("Threshold store unreadable, using fallback: {e:#}");
                return self.fallback;
            }
        };

        match serde_json::from_slice::<PartialWeatherThresholds>(&bytes) {
            Ok(partial) => normalize(&partial),
            Err(e) => {
                tracing::warn!("Stored thresholds are corrupt, using fallback: {e}");
                self.fallback
            }
        }
    }

    /// Persist the normalized form of `thresholds`
    pub async fn save(&self, thresholds: &WeatherThresholds) -> Result<WeatherThresholds> {
        let normalized = normalize(&(*thresholds).into());
        self.persist(&normalized).await?;
        tracing::info!("Saved weather thresholds");
        Ok(normalized)
    }

    /// Like [`save`](Self::save) but refuses values that fail validation
    pub async fn save_validated(
        &self,
        thresholds: &WeatherThresholds,
    ) -> Result<WeatherThresholds> {
        let report = validate(thresholds);
        if !report.is_valid {
            return Err(DroneWeatherError::validation(report.errors));
        }
        self.save(thresholds).await
    }

    pub async fn reset_to_defaults(&self) -> Result<WeatherThresholds> {
        self.save(&DEFAULT_WEATHER_THRESHOLDS).await
    }

    /// Replace the active thresholds with a built-in drone profile's
    pub async fn select_profile(&self, id: &str) -> Result<WeatherThresholds> {
        let profile = find_profile(id).ok_or_else(|| DroneWeatherError::UnknownProfile {
            id: id.to_string(),
        })?;
        tracing::info!(profile = profile.id, "Selecting drone profile");
        self.save(&profile.thresholds).await
    }

    async fn persist(&self, thresholds: &WeatherThresholds) -> Result<()> {
        let bytes = serde_json::to_vec(thresholds)
            .map_err(|e| DroneWeatherError::storage(format!("serialize thresholds: {e}")))?;
        self.store.write(THRESHOLDS_KEY, bytes).await?;
        Ok(())
    }
}
