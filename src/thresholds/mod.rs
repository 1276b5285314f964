//! Safety threshold configuration
//!
//! `WeatherThresholds` is the single canonical schema the evaluator consumes.
//! Anything read from storage goes through [`normalize`], which merges every
//! field individually against [`DEFAULT_WEATHER_THRESHOLDS`], so partial and
//! legacy values always produce a complete configuration.

use crate::units::{DistanceUnit, SpeedUnit, TemperatureUnit};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub mod profiles;
pub mod store;

pub use profiles::{DRONE_PROFILES, DroneProfile, find_profile};
pub use store::ThresholdService;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureThreshold {
    pub unit: TemperatureUnit,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSpeedThreshold {
    pub unit: SpeedUnit,
    pub max: f64,
}

/// Gust limit, always in km/h
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindGustThreshold {
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityThreshold {
    pub unit: DistanceUnit,
    pub min: f64,
}

/// Percentage limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherLimits {
    pub max_cloud_cover: f64,
    pub max_precipitation_probability: f64,
}

/// Complete safety configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherThresholds {
    pub temperature: TemperatureThreshold,
    pub wind_speed: WindSpeedThreshold,
    pub wind_gust: WindGustThreshold,
    pub visibility: VisibilityThreshold,
    pub weather: WeatherLimits,
}

pub const DEFAULT_WEATHER_THRESHOLDS: WeatherThresholds = WeatherThresholds {
    temperature: TemperatureThreshold {
        unit: TemperatureUnit::Celsius,
        min: 0.0,
        max: 40.0,
    },
    wind_speed: WindSpeedThreshold {
        unit: SpeedUnit::Kmh,
        max: 20.0,
    },
    wind_gust: WindGustThreshold { max: 40.0 },
    visibility: VisibilityThreshold {
        unit: DistanceUnit::Kilometers,
        min: 5.0,
    },
    weather: WeatherLimits {
        max_cloud_cover: 100.0,
        max_precipitation_probability: 50.0,
    },
};

impl Default for WeatherThresholds {
    fn default() -> Self {
        DEFAULT_WEATHER_THRESHOLDS
    }
}

impl WeatherThresholds {
    /// Every numeric field, in declaration order
    #[must_use]
    pub fn numeric_fields(&self) -> [f64; 7] {
        [
            self.temperature.min,
            self.temperature.max,
            self.wind_speed.max,
            self.wind_gust.max,
            self.visibility.min,
            self.weather.max_cloud_cover,
            self.weather.max_precipitation_probability,
        ]
    }

    /// False when any numeric field is NaN or infinite
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.numeric_fields().iter().all(|value| value.is_finite())
    }
}

/// Reads a field of the expected shape, anything else as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable threshold field: {e}");
            Ok(None)
        }
    }
}

/// Stored thresholds with any subset of fields present.
///
/// Also accepts the older `{safe, warning}` layout (`windSpeed.safe`,
/// `windGusts.safe`, `visibility.safe`, `rainChance.safe`); only the `safe`
/// value has a counterpart in the current schema. A field of the wrong
/// type reads as absent so the rest of the value still applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWeatherThresholds {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<PartialTemperature>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<PartialWindSpeed>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<PartialWindGust>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub visibility: Option<PartialVisibility>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub weather: Option<PartialWeatherLimits>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub wind_gusts: Option<LegacyLimit>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rain_chance: Option<LegacyLimit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTemperature {
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<TemperatureUnit>,
    #[serde(default, deserialize_with = "lenient")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialWindSpeed {
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<SpeedUnit>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub safe: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialWindGust {
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialVisibility {
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<DistanceUnit>,
    #[serde(default, deserialize_with = "lenient")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub safe: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWeatherLimits {
    #[serde(default, deserialize_with = "lenient")]
    pub max_cloud_cover: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_precipitation_probability: Option<f64>,
}

/// `{safe, warning}` pair from the older threshold layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyLimit {
    #[serde(default, deserialize_with = "lenient")]
    pub safe: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub warning: Option<f64>,
}

impl From<WeatherThresholds> for PartialWeatherThresholds {
    fn from(value: WeatherThresholds) -> Self {
        Self {
            temperature: Some(PartialTemperature {
                unit: Some(value.temperature.unit),
                min: Some(value.temperature.min),
                max: Some(value.temperature.max),
            }),
            wind_speed: Some(PartialWindSpeed {
                unit: Some(value.wind_speed.unit),
                max: Some(value.wind_speed.max),
                safe: None,
            }),
            wind_gust: Some(PartialWindGust {
                max: Some(value.wind_gust.max),
            }),
            visibility: Some(PartialVisibility {
                unit: Some(value.visibility.unit),
                min: Some(value.visibility.min),
                safe: None,
            }),
            weather: Some(PartialWeatherLimits {
                max_cloud_cover: Some(value.weather.max_cloud_cover),
                max_precipitation_probability: Some(value.weather.max_precipitation_probability),
            }),
            wind_gusts: None,
            rain_chance: None,
        }
    }
}

/// Merge `partial` field by field against the defaults.
///
/// Current-layout fields take precedence over legacy `safe` values.
#[must_use]
pub fn normalize(partial: &PartialWeatherThresholds) -> WeatherThresholds {
    let defaults = DEFAULT_WEATHER_THRESHOLDS;
    let temperature = partial.temperature.clone().unwrap_or_default();
    let wind_speed = partial.wind_speed.clone().unwrap_or_default();
    let wind_gust = partial.wind_gust.clone().unwrap_or_default();
    let visibility = partial.visibility.clone().unwrap_or_default();
    let weather = partial.weather.clone().unwrap_or_default();
    let legacy_gust = partial.wind_gusts.as_ref().and_then(|limit| limit.safe);
    let legacy_rain = partial.rain_chance.as_ref().and_then(|limit| limit.safe);

    WeatherThresholds {
        temperature: TemperatureThreshold {
            unit: temperature.unit.unwrap_or(defaults.temperature.unit),
            min: temperature.min.unwrap_or(defaults.temperature.min),
            max: temperature.max.unwrap_or(defaults.temperature.max),
        },
        wind_speed: WindSpeedThreshold {
            unit: wind_speed.unit.unwrap_or(defaults.wind_speed.unit),
            max: wind_speed
                .max
                .or(wind_speed.safe)
                .unwrap_or(defaults.wind_speed.max),
        },
        wind_gust: WindGustThreshold {
            max: wind_gust
                .max
                .or(legacy_gust)
                .unwrap_or(defaults.wind_gust.max),
        },
        visibility: VisibilityThreshold {
            unit: visibility.unit.unwrap_or(defaults.visibility.unit),
            min: visibility
                .min
                .or(visibility.safe)
                .unwrap_or(defaults.visibility.min),
        },
        weather: WeatherLimits {
            max_cloud_cover: weather
                .max_cloud_cover
                .unwrap_or(defaults.weather.max_cloud_cover),
            max_precipitation_probability: weather
                .max_precipitation_probability
                .or(legacy_rain)
                .unwrap_or(defaults.weather.max_precipitation_probability),
        },
    }
}

/// Outcome of [`validate`]; lists every violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check sanity rules without modifying anything
#[must_use]
pub fn validate(thresholds: &WeatherThresholds) -> ValidationReport {
    let mut errors = Vec::new();

    if !thresholds.is_complete() {
        errors.push("All threshold values must be finite numbers".to_string());
    }

    if thresholds.temperature.min > thresholds.temperature.max {
        errors.push(
            "Minimum temperature cannot be greater than maximum temperature".to_string(),
        );
    }

    if thresholds.wind_speed.max < 0.0 {
        errors.push("Wind speed maximum must be positive".to_string());
    }

    if thresholds.visibility.min < 0.0 {
        errors.push("Visibility minimum must be positive".to_string());
    }

    if !(0.0..=100.0).contains(&thresholds.weather.max_cloud_cover) {
        errors.push("Cloud cover must be between 0 and 100".to_string());
    }

    if !(0.0..=100.0).contains(&thresholds.weather.max_precipitation_probability) {
        errors.push("Precipitation probability must be between 0 and 100".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
