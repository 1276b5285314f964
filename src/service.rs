//! Weather orchestration: cache, supplier, thresholds and evaluation

use crate::Result;
use crate::cache::ForecastCache;
use crate::error::FetchError;
use crate::flyability::{
    DailySummary, EvaluationOptions, FlightConditions, ParameterAssessment, assess,
    check_flying_conditions_with, flight_windows,
};
use crate::models::{Coordinates, ForecastPayload};
use crate::storage::SlotStore;
use crate::supplier::ForecastSupplier;
use crate::thresholds::ThresholdService;

/// Single entry point for forecasts and flyability verdicts
pub struct WeatherService<F, S> {
    supplier: F,
    cache: ForecastCache<S>,
    thresholds: ThresholdService<S>,
    options: EvaluationOptions,
}

impl<F, S> WeatherService<F, S>
where
    F: ForecastSupplier,
    S: SlotStore + Clone,
{
    /// Cache and thresholds share `store`, each in its own slot
    pub fn new(supplier: F, store: S) -> Self {
        Self {
            supplier,
            cache: ForecastCache::new(store.clone()),
            thresholds: ThresholdService::new(store),
            options: EvaluationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ThresholdService<S>) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn thresholds(&self) -> &ThresholdService<S> {
        &self.thresholds
    }

    pub fn cache(&self) -> &ForecastCache<S> {
        &self.cache
    }

    /// Forecast for `coordinates`, from the cache when fresh.
    ///
    /// Fetch failures propagate unchanged; failing to cache a fetched
    /// forecast only logs a warning.
    #[tracing::instrument(name = "get_current_weather", skip(self))]
    pub async fn get_current_weather(
        &self,
        coordinates: Coordinates,
    ) -> std::result::Result<ForecastPayload, FetchError> {
        if let Some(cached) = self.cache.get(&coordinates).await {
            tracing::debug!("Using cached forecast");
            return Ok(cached);
        }

        let hourly_data = self.supplier.fetch(&coordinates).await?;
        let payload = ForecastPayload::new(coordinates, hourly_data);
        tracing::info!(hours = payload.hourly_data.len(), "Fetched fresh forecast");

        if let Err(e) = self.cache.put(coordinates, &payload).await {
            tracing::warn!("Failed to cache forecast: {e}");
        }

        Ok(payload)
    }

    /// Verdict for one hour of `payload` under the active thresholds.
    ///
    /// # Panics
    ///
    /// Panics if `hour_index` is out of bounds for `payload.hourly_data`.
    pub async fn is_drone_flyable(
        &self,
        payload: &ForecastPayload,
        hour_index: usize,
    ) -> FlightConditions {
        let thresholds = self.thresholds.load().await;
        let record = &payload.hourly_data[hour_index];
        check_flying_conditions_with(record, &thresholds, self.options)
    }

    /// Per-parameter classification for one hour.
    ///
    /// # Panics
    ///
    /// Panics if `hour_index` is out of bounds for `payload.hourly_data`.
    pub async fn assess_hour(
        &self,
        payload: &ForecastPayload,
        hour_index: usize,
    ) -> Vec<ParameterAssessment> {
        let thresholds = self.thresholds.load().await;
        assess(&payload.hourly_data[hour_index], &thresholds)
    }

    /// Daily flyable ranges under the active thresholds
    pub async fn flight_windows(
        &self,
        payload: &ForecastPayload,
        daylight_only: bool,
    ) -> Result<Vec<DailySummary>> {
        let thresholds = self.thresholds.load().await;
        flight_windows(payload, &thresholds, self.options, daylight_only)
    }
}
