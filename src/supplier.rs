//! Forecast suppliers
//!
//! The orchestrator only needs [`ForecastSupplier`]; [`OpenMeteoClient`] is
//! the concrete implementation backed by the Open-Meteo forecast API.

use crate::config::WeatherApiConfig;
use crate::error::FetchError;
use crate::models::{Coordinates, HourlyForecastRecord};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Source of hourly forecast records
#[async_trait]
pub trait ForecastSupplier: Send + Sync {
    /// Records for `coordinates`, ascending and hour-aligned
    async fn fetch(
        &self,
        coordinates: &Coordinates,
    ) -> Result<Vec<HourlyForecastRecord>, FetchError>;
}

#[async_trait]
impl<F: ForecastSupplier> ForecastSupplier for Arc<F> {
    async fn fetch(
        &self,
        coordinates: &Coordinates,
    ) -> Result<Vec<HourlyForecastRecord>, FetchError> {
        self.as_ref().fetch(coordinates).await
    }
}

pub const HOURLY_VARIABLES: [&str; 31] = [
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "precipitation_probability",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "snow_depth",
    "weather_code",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "visibility",
    "evapotranspiration",
    "et0_fao_evapotranspiration",
    "vapour_pressure_deficit",
    "wind_speed_10m",
    "wind_speed_80m",
    "wind_speed_120m",
    "wind_speed_180m",
    "wind_direction_10m",
    "wind_direction_80m",
    "wind_direction_120m",
    "wind_direction_180m",
    "wind_gusts_10m",
    "temperature_80m",
    "temperature_120m",
    "temperature_180m",
];

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    forecast_days: u8,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("drone-weather/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }

    fn forecast_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&wind_speed_unit=kmh&timezone=GMT&forecast_days={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            HOURLY_VARIABLES.join(","),
            self.forecast_days
        )
    }
}

#[async_trait]
impl ForecastSupplier for OpenMeteoClient {
    #[tracing::instrument(name = "fetch_forecast", skip(self))]
    async fn fetch(
        &self,
        coordinates: &Coordinates,
    ) -> Result<Vec<HourlyForecastRecord>, FetchError> {
        tracing::info!(
            "Fetching forecast for ({})",
            coordinates.format_coordinates()
        );

        let response = self
            .client
            .get(self.forecast_url(coordinates))
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response body: {e}")))?;

        let records = openmeteo::parse_forecast(&body)?;
        tracing::debug!(hours = records.len(), "Forecast parsed");
        Ok(records)
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use super::{FetchError, HourlyForecastRecord, NaiveDateTime};
    use serde::Deserialize;

    type Column = Option<Vec<Option<f64>>>;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub hourly: Option<HourlyData>,
    }

    /// Hourly columns; absent columns and null cells read as zero
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct HourlyData {
        pub time: Vec<String>,
        pub temperature_2m: Column,
        pub relative_humidity_2m: Column,
        pub dew_point_2m: Column,
        pub apparent_temperature: Column,
        pub precipitation_probability: Column,
        pub precipitation: Column,
        pub rain: Column,
        pub showers: Column,
        pub snowfall: Column,
        pub snow_depth: Column,
        pub weather_code: Column,
        pub cloud_cover: Column,
        pub cloud_cover_low: Column,
        pub cloud_cover_mid: Column,
        pub cloud_cover_high: Column,
        pub visibility: Column,
        pub evapotranspiration: Column,
        pub et0_fao_evapotranspiration: Column,
        pub vapour_pressure_deficit: Column,
        pub wind_speed_10m: Column,
        pub wind_speed_80m: Column,
        pub wind_speed_120m: Column,
        pub wind_speed_180m: Column,
        pub wind_direction_10m: Column,
        pub wind_direction_80m: Column,
        pub wind_direction_120m: Column,
        pub wind_direction_180m: Column,
        pub wind_gusts_10m: Column,
        pub temperature_80m: Column,
        pub temperature_120m: Column,
        pub temperature_180m: Column,
    }

    fn value(column: &Column, index: usize) -> f64 {
        column
            .as_ref()
            .and_then(|values| values.get(index).copied().flatten())
            .unwrap_or(0.0)
    }

    impl HourlyData {
        fn columns(&self) -> [(&'static str, &Column); 31] {
            [
                ("temperature_2m", &self.temperature_2m),
                ("relative_humidity_2m", &self.relative_humidity_2m),
                ("dew_point_2m", &self.dew_point_2m),
                ("apparent_temperature", &self.apparent_temperature),
                ("precipitation_probability", &self.precipitation_probability),
                ("precipitation", &self.precipitation),
                ("rain", &self.rain),
                ("showers", &self.showers),
                ("snowfall", &self.snowfall),
                ("snow_depth", &self.snow_depth),
                ("weather_code", &self.weather_code),
                ("cloud_cover", &self.cloud_cover),
                ("cloud_cover_low", &self.cloud_cover_low),
                ("cloud_cover_mid", &self.cloud_cover_mid),
                ("cloud_cover_high", &self.cloud_cover_high),
                ("visibility", &self.visibility),
                ("evapotranspiration", &self.evapotranspiration),
                ("et0_fao_evapotranspiration", &self.et0_fao_evapotranspiration),
                ("vapour_pressure_deficit", &self.vapour_pressure_deficit),
                ("wind_speed_10m", &self.wind_speed_10m),
                ("wind_speed_80m", &self.wind_speed_80m),
                ("wind_speed_120m", &self.wind_speed_120m),
                ("wind_speed_180m", &self.wind_speed_180m),
                ("wind_direction_10m", &self.wind_direction_10m),
                ("wind_direction_80m", &self.wind_direction_80m),
                ("wind_direction_120m", &self.wind_direction_120m),
                ("wind_direction_180m", &self.wind_direction_180m),
                ("wind_gusts_10m", &self.wind_gusts_10m),
                ("temperature_80m", &self.temperature_80m),
                ("temperature_120m", &self.temperature_120m),
                ("temperature_180m", &self.temperature_180m),
            ]
        }

        fn record(&self, index: usize, time: &str) -> Result<HourlyForecastRecord, FetchError> {
            let time = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
                .map_err(|e| FetchError::MalformedPayload(format!("bad timestamp {time:?}: {e}")))?
                .and_utc();

            Ok(HourlyForecastRecord {
                time,
                temperature_2m: value(&self.temperature_2m, index),
                relative_humidity_2m: value(&self.relative_humidity_2m, index),
                dew_point_2m: value(&self.dew_point_2m, index),
                apparent_temperature: value(&self.apparent_temperature, index),
                precipitation_probability: value(&self.precipitation_probability, index),
                precipitation: value(&self.precipitation, index),
                rain: value(&self.rain, index),
                showers: value(&self.showers, index),
                snowfall: value(&self.snowfall, index),
                snow_depth: value(&self.snow_depth, index),
                weather_code: value(&self.weather_code, index) as u8,
                cloud_cover: value(&self.cloud_cover, index),
                cloud_cover_low: value(&self.cloud_cover_low, index),
                cloud_cover_mid: value(&self.cloud_cover_mid, index),
                cloud_cover_high: value(&self.cloud_cover_high, index),
                visibility: value(&self.visibility, index),
                evapotranspiration: value(&self.evapotranspiration, index),
                et0_fao_evapotranspiration: value(&self.et0_fao_evapotranspiration, index),
                vapour_pressure_deficit: value(&self.vapour_pressure_deficit, index),
                wind_speed_10m: value(&self.wind_speed_10m, index),
                wind_speed_80m: value(&self.wind_speed_80m, index),
                wind_speed_120m: value(&self.wind_speed_120m, index),
                wind_speed_180m: value(&self.wind_speed_180m, index),
                wind_direction_10m: value(&self.wind_direction_10m, index),
                wind_direction_80m: value(&self.wind_direction_80m, index),
                wind_direction_120m: value(&self.wind_direction_120m, index),
                wind_direction_180m: value(&self.wind_direction_180m, index),
                wind_gusts_10m: value(&self.wind_gusts_10m, index),
                temperature_80m: value(&self.temperature_80m, index),
                temperature_120m: value(&self.temperature_120m, index),
                temperature_180m: value(&self.temperature_180m, index),
            })
        }
    }

    pub fn parse_forecast(body: &[u8]) -> Result<Vec<HourlyForecastRecord>, FetchError> {
        let response: ForecastResponse = serde_json::from_slice(body)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

        let hourly = response
            .hourly
            .ok_or_else(|| FetchError::MalformedPayload("No hourly data available".to_string()))?;

        let hours = hourly.time.len();
        for (name, column) in hourly.columns() {
            if let Some(values) = column
                && values.len() != hours
            {
                return Err(FetchError::MalformedPayload(format!(
                    "column {name} has {} values for {hours} timestamps",
                    values.len()
                )));
            }
        }

        let mut records = hourly
            .time
            .iter()
            .enumerate()
            .map(|(index, time)| hourly.record(index, time))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|record| record.time);
        Ok(records)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_url() {
        let config = WeatherApiConfig {
            base_url: "https://api.open-meteo.com/v1/".to_string(),
            timeout_seconds: 10,
            forecast_days: 3,
        };
        let client = OpenMeteoClient::new(&config).unwrap();
        let url = client.forecast_url(&Coordinates::new(46.8182, 8.2275));

        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=46.8182&longitude=8.2275"));
        assert!(url.contains("wind_speed_unit=kmh"));
        assert!(url.contains("timezone=GMT"));
        assert!(url.contains("forecast_days=3"));
        assert!(url.contains("wind_gusts_10m"));
        assert_eq!(HOURLY_VARIABLES.len(), 31);
    }
}
