//! Per-parameter safety classification for detail views

use super::evaluator::{evaluate_rules, observed_values};
use crate::models::HourlyForecastRecord;
use crate::thresholds::WeatherThresholds;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    Safe,
    Warning,
    Unsafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    WindSpeed,
    WindGusts,
    Visibility,
    CloudCover,
    Precipitation,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Parameter::Temperature => "Temperature",
            Parameter::WindSpeed => "Wind Speed",
            Parameter::WindGusts => "Wind Gusts",
            Parameter::Visibility => "Visibility",
            Parameter::Precipitation => "Precipitation",
            Parameter::CloudCover => "Cloud Cover",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterAssessment {
    pub parameter: Parameter,
    /// Observed value in canonical units
    pub value: f64,
    pub safety: Safety,
}

/// Classify each parameter of `record`, in rule order.
///
/// Cloud cover over its limit is only a warning; every other violation is
/// unsafe. Incomplete thresholds mark every parameter unsafe.
#[must_use]
pub fn assess(
    record: &HourlyForecastRecord,
    thresholds: &WeatherThresholds,
) -> Vec<ParameterAssessment> {
    let Some(outcomes) = evaluate_rules(record, thresholds) else {
        return observed_values(record)
            .into_iter()
            .map(|(parameter, value)| ParameterAssessment {
                parameter,
                value,
                safety: Safety::Unsafe,
            })
            .collect();
    };

    outcomes
        .into_iter()
        .map(|outcome| {
            let safety = match (outcome.passed(), outcome.parameter) {
                (true, _) => Safety::Safe,
                (false, Parameter::CloudCover) => Safety::Warning,
                (false, _) => Safety::Unsafe,
            };
            ParameterAssessment {
                parameter: outcome.parameter,
                value: outcome.value,
                safety,
            }
        })
        .collect()
}

/// Worst classification across all parameters
#[must_use]
pub fn overall(assessments: &[ParameterAssessment]) -> Safety {
    assessments
        .iter()
        .map(|assessment| assessment.safety)
        .fold(Safety::Safe, |worst, safety| match (worst, safety) {
            (Safety::Unsafe, _) | (_, Safety::Unsafe) => Safety::Unsafe,
            (Safety::Warning, _) | (_, Safety::Warning) => Safety::Warning,
            _ => Safety::Safe,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::DEFAULT_WEATHER_THRESHOLDS;
    use chrono::{TimeZone, Utc};

    fn hour() -> HourlyForecastRecord {
        HourlyForecastRecord::calm(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn safety_of(assessments: &[ParameterAssessment], parameter: Parameter) -> Safety {
        assessments
            .iter()
            .find(|assessment| assessment.parameter == parameter)
            .map(|assessment| assessment.safety)
            .unwrap()
    }

    #[test]
    fn test_calm_hour_is_all_safe() {
        let assessments = assess(&hour(), &DEFAULT_WEATHER_THRESHOLDS);
        assert_eq!(assessments.len(), 6);
        assert_eq!(overall(&assessments), Safety::Safe);
    }

    #[test]
    fn test_cloud_cover_only_warns() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.weather.max_cloud_cover = 50.0;
        let mut overcast = hour();
        overcast.cloud_cover = 95.0;

        let assessments = assess(&overcast, &thresholds);
        assert_eq!(safety_of(&assessments, Parameter::CloudCover), Safety::Warning);
        assert_eq!(overall(&assessments), Safety::Warning);
    }

    #[test]
    fn test_gusts_are_unsafe() {
        let mut gusty = hour();
        gusty.wind_gusts_10m = 55.0;
        gusty.cloud_cover = 100.5;

        let assessments = assess(&gusty, &DEFAULT_WEATHER_THRESHOLDS);
        assert_eq!(safety_of(&assessments, Parameter::WindGusts), Safety::Unsafe);
        assert_eq!(safety_of(&assessments, Parameter::WindSpeed), Safety::Safe);
        assert_eq!(overall(&assessments), Safety::Unsafe);
    }

    #[test]
    fn test_parameter_labels() {
        assert_eq!(Parameter::WindGusts.to_string(), "Wind Gusts");
        assert_eq!(Parameter::CloudCover.to_string(), "Cloud Cover");
    }

    #[test]
    fn test_incomplete_thresholds_are_unsafe() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.wind_gust.max = f64::NAN;

        let assessments = assess(&hour(), &thresholds);
        assert_eq!(assessments.len(), 6);
        assert!(
            assessments
                .iter()
                .all(|assessment| assessment.safety == Safety::Unsafe)
        );
        assert_eq!(assessments[0].value, hour().temperature_2m);
    }
}
