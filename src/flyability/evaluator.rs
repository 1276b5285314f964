use super::assessment::Parameter;
use crate::models::HourlyForecastRecord;
use crate::thresholds::WeatherThresholds;
use crate::units::{
    DistanceUnit, SpeedUnit, TemperatureUnit, convert_distance, convert_speed,
    convert_temperature,
};
use serde::Serialize;

pub const CONFIGURATION_ERROR_REASON: &str =
    "Unable to determine flight conditions due to configuration error";

/// Wind speed at one altitude band, km/h
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindDetail {
    pub height: &'static str,
    pub speed: f64,
}

/// Verdict for one forecast hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightConditions {
    pub is_suitable: bool,
    /// Failure reasons in rule order
    pub reasons: Vec<String>,
    pub wind_speed_details: Vec<WindDetail>,
    pub wind_gust_details: Vec<WindDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// When false a cloud cover violation no longer makes the hour unsuitable
    pub cloud_cover_blocking: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            cloud_cover_blocking: true,
        }
    }
}

/// Threshold limits expressed in the record's canonical units
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanonicalLimits {
    min_temperature_c: f64,
    max_temperature_c: f64,
    max_wind_speed_kmh: f64,
    max_wind_gust_kmh: f64,
    min_visibility_m: f64,
    max_cloud_cover: f64,
    max_precipitation_probability: f64,
}

impl From<&WeatherThresholds> for CanonicalLimits {
    fn from(thresholds: &WeatherThresholds) -> Self {
        let temperature = thresholds.temperature;
        let visibility_km = convert_distance(
            thresholds.visibility.min,
            thresholds.visibility.unit,
            DistanceUnit::Kilometers,
        );

        Self {
            min_temperature_c: convert_temperature(
                temperature.min,
                temperature.unit,
                TemperatureUnit::Celsius,
            ),
            max_temperature_c: convert_temperature(
                temperature.max,
                temperature.unit,
                TemperatureUnit::Celsius,
            ),
            max_wind_speed_kmh: convert_speed(
                thresholds.wind_speed.max,
                thresholds.wind_speed.unit,
                SpeedUnit::Kmh,
            ),
            max_wind_gust_kmh: thresholds.wind_gust.max,
            min_visibility_m: visibility_km * 1000.0,
            max_cloud_cover: thresholds.weather.max_cloud_cover,
            max_precipitation_probability: thresholds.weather.max_precipitation_probability,
        }
    }
}

/// Result of one rule for one hour
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub parameter: Parameter,
    /// Observed value in the record's units
    pub value: f64,
    /// Reason text when the rule failed
    pub violation: Option<String>,
}

impl RuleOutcome {
    fn new(parameter: Parameter, value: f64, within: bool, reason: impl FnOnce() -> String) -> Self {
        Self {
            parameter,
            value,
            violation: (!within).then(reason),
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.violation.is_none()
    }
}

/// Observed value of each rule's parameter, in rule order
#[must_use]
pub fn observed_values(record: &HourlyForecastRecord) -> [(Parameter, f64); 6] {
    [
        (Parameter::Temperature, record.temperature_2m),
        (Parameter::WindSpeed, record.wind_speed_10m),
        (Parameter::WindGusts, record.wind_gusts_10m),
        (Parameter::Visibility, record.visibility),
        (Parameter::CloudCover, record.cloud_cover),
        (Parameter::Precipitation, record.precipitation_probability),
    ]
}

/// Run every rule in order: temperature, wind speed, wind gusts,
/// visibility, cloud cover, precipitation probability.
///
/// Thresholds are converted into the record's units, never the other way
/// round. Returns `None` when the thresholds are not complete.
#[must_use]
pub fn evaluate_rules(
    record: &HourlyForecastRecord,
    thresholds: &WeatherThresholds,
) -> Option<[RuleOutcome; 6]> {
    if !thresholds.is_complete() {
        return None;
    }

    let limits = CanonicalLimits::from(thresholds);
    let temperature = record.temperature_2m;

    Some([
        RuleOutcome::new(
            Parameter::Temperature,
            temperature,
            temperature >= limits.min_temperature_c && temperature <= limits.max_temperature_c,
            || {
                format!(
                    "Temperature ({}°C) is outside safe range ({}°C - {}°C)",
                    temperature, limits.min_temperature_c, limits.max_temperature_c
                )
            },
        ),
        RuleOutcome::new(
            Parameter::WindSpeed,
            record.wind_speed_10m,
            record.wind_speed_10m <= limits.max_wind_speed_kmh,
            || "Wind speed is too high".to_string(),
        ),
        RuleOutcome::new(
            Parameter::WindGusts,
            record.wind_gusts_10m,
            record.wind_gusts_10m <= limits.max_wind_gust_kmh,
            || "Wind gusts are too strong".to_string(),
        ),
        RuleOutcome::new(
            Parameter::Visibility,
            record.visibility,
            record.visibility >= limits.min_visibility_m,
            || "Visibility is too low".to_string(),
        ),
        RuleOutcome::new(
            Parameter::CloudCover,
            record.cloud_cover,
            record.cloud_cover <= limits.max_cloud_cover,
            || "Cloud cover is too high".to_string(),
        ),
        RuleOutcome::new(
            Parameter::Precipitation,
            record.precipitation_probability,
            record.precipitation_probability <= limits.max_precipitation_probability,
            || "High chance of precipitation".to_string(),
        ),
    ])
}

fn wind_speed_details(record: &HourlyForecastRecord) -> Vec<WindDetail> {
    vec![
        WindDetail {
            height: "10m",
            speed: record.wind_speed_10m,
        },
        WindDetail {
            height: "80m",
            speed: record.wind_speed_80m,
        },
        WindDetail {
            height: "120m",
            speed: record.wind_speed_120m,
        },
        WindDetail {
            height: "180m",
            speed: record.wind_speed_180m,
        },
    ]
}

fn wind_gust_details(record: &HourlyForecastRecord) -> Vec<WindDetail> {
    vec![WindDetail {
        height: "10m",
        speed: record.wind_gusts_10m,
    }]
}

/// Evaluate one hour against `thresholds` with cloud cover blocking
#[must_use]
pub fn check_flying_conditions(
    record: &HourlyForecastRecord,
    thresholds: &WeatherThresholds,
) -> FlightConditions {
    check_flying_conditions_with(record, thresholds, EvaluationOptions::default())
}

/// Evaluate one hour against `thresholds`.
///
/// Reasons follow the rule order of [`evaluate_rules`]. Incomplete
/// thresholds give a single configuration reason and no wind details.
#[must_use]
pub fn check_flying_conditions_with(
    record: &HourlyForecastRecord,
    thresholds: &WeatherThresholds,
    options: EvaluationOptions,
) -> FlightConditions {
    let Some(outcomes) = evaluate_rules(record, thresholds) else {
        return FlightConditions {
            is_suitable: false,
            reasons: vec![CONFIGURATION_ERROR_REASON.to_string()],
            wind_speed_details: Vec::new(),
            wind_gust_details: Vec::new(),
        };
    };

    let mut is_suitable = true;
    let mut reasons = Vec::new();
    for outcome in outcomes {
        let Some(reason) = outcome.violation else {
            continue;
        };
        // an advisory cloud reason alone keeps the hour suitable
        if outcome.parameter != Parameter::CloudCover || options.cloud_cover_blocking {
            is_suitable = false;
        }
        reasons.push(reason);
    }

    FlightConditions {
        is_suitable,
        reasons,
        wind_speed_details: wind_speed_details(record),
        wind_gust_details: wind_gust_details(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::DEFAULT_WEATHER_THRESHOLDS;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(
        temperature: f64,
        wind_speed: f64,
        gusts: f64,
        visibility: f64,
        cloud_cover: f64,
        precipitation_probability: f64,
    ) -> HourlyForecastRecord {
        let mut record =
            HourlyForecastRecord::calm(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        record.temperature_2m = temperature;
        record.wind_speed_10m = wind_speed;
        record.wind_gusts_10m = gusts;
        record.visibility = visibility;
        record.cloud_cover = cloud_cover;
        record.precipitation_probability = precipitation_probability;
        record
    }

    fn pleasant() -> HourlyForecastRecord {
        record(25.0, 15.0, 20.0, 8000.0, 50.0, 10.0)
    }

    #[test]
    fn test_pleasant_hour_is_suitable() {
        let conditions = check_flying_conditions(&pleasant(), &DEFAULT_WEATHER_THRESHOLDS);
        assert!(conditions.is_suitable);
        assert!(conditions.reasons.is_empty());
        assert_eq!(conditions.wind_speed_details.len(), 4);
        assert_eq!(conditions.wind_gust_details.len(), 1);
        assert_eq!(conditions.wind_gust_details[0].height, "10m");
    }

    #[test]
    fn test_high_wind_keeps_details() {
        let mut hour = pleasant();
        hour.wind_speed_10m = 25.0;

        let conditions = check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS);
        assert!(!conditions.is_suitable);
        assert_eq!(conditions.reasons, vec!["Wind speed is too high"]);
        let heights: Vec<_> = conditions
            .wind_speed_details
            .iter()
            .map(|detail| detail.height)
            .collect();
        assert_eq!(heights, ["10m", "80m", "120m", "180m"]);
        assert_eq!(conditions.wind_speed_details[0].speed, 25.0);
    }

    #[test]
    fn test_fahrenheit_range_is_converted() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.temperature.unit = TemperatureUnit::Fahrenheit;
        thresholds.temperature.min = 32.0;
        thresholds.temperature.max = 104.0;

        assert!(check_flying_conditions(&pleasant(), &thresholds).is_suitable);

        let mut freezing = pleasant();
        freezing.temperature_2m = -1.0;
        let conditions = check_flying_conditions(&freezing, &thresholds);
        assert_eq!(
            conditions.reasons,
            vec!["Temperature (-1°C) is outside safe range (0°C - 40°C)"]
        );
    }

    #[test]
    fn test_visibility_in_miles() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.visibility.unit = DistanceUnit::Miles;
        thresholds.visibility.min = 3.0;

        let mut hazy = pleasant();
        hazy.visibility = 4000.0;
        let conditions = check_flying_conditions(&hazy, &thresholds);
        assert!(!conditions.is_suitable);
        assert_eq!(conditions.reasons, vec!["Visibility is too low"]);

        hazy.visibility = 4829.0;
        assert!(check_flying_conditions(&hazy, &thresholds).is_suitable);
    }

    #[test]
    fn test_wind_in_mph() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.wind_speed.unit = SpeedUnit::Mph;
        thresholds.wind_speed.max = 10.0;

        let mut hour = pleasant();
        hour.wind_speed_10m = 16.0;
        assert!(check_flying_conditions(&hour, &thresholds).is_suitable);

        hour.wind_speed_10m = 16.2;
        assert!(!check_flying_conditions(&hour, &thresholds).is_suitable);
    }

    #[rstest]
    #[case(20.0, true)]
    #[case(20.01, false)]
    fn test_wind_boundary_is_inclusive(#[case] wind: f64, #[case] suitable: bool) {
        let mut hour = pleasant();
        hour.wind_speed_10m = wind;
        assert_eq!(
            check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS).is_suitable,
            suitable
        );
    }

    #[test]
    fn test_gusts_are_checked_separately() {
        let mut hour = pleasant();
        hour.wind_gusts_10m = 41.0;
        let conditions = check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS);
        assert_eq!(conditions.reasons, vec!["Wind gusts are too strong"]);
    }

    #[test]
    fn test_reasons_follow_rule_order() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.weather.max_cloud_cover = 50.0;
        let stormy = record(45.0, 30.0, 60.0, 1000.0, 90.0, 80.0);

        let conditions = check_flying_conditions(&stormy, &thresholds);
        assert_eq!(
            conditions.reasons,
            vec![
                "Temperature (45°C) is outside safe range (0°C - 40°C)",
                "Wind speed is too high",
                "Wind gusts are too strong",
                "Visibility is too low",
                "Cloud cover is too high",
                "High chance of precipitation",
            ]
        );
    }

    #[test]
    fn test_cloud_cover_can_be_advisory() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.weather.max_cloud_cover = 40.0;
        let hour = pleasant();

        let blocking = check_flying_conditions(&hour, &thresholds);
        assert!(!blocking.is_suitable);

        let options = EvaluationOptions {
            cloud_cover_blocking: false,
        };
        let advisory = check_flying_conditions_with(&hour, &thresholds, options);
        assert!(advisory.is_suitable);
        assert_eq!(advisory.reasons, vec!["Cloud cover is too high"]);

        let mut rainy = hour.clone();
        rainy.precipitation_probability = 90.0;
        assert!(!check_flying_conditions_with(&rainy, &thresholds, options).is_suitable);
    }

    #[test]
    fn test_incomplete_thresholds_degrade() {
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.visibility.min = f64::NAN;

        let conditions = check_flying_conditions(&pleasant(), &thresholds);
        assert!(!conditions.is_suitable);
        assert_eq!(conditions.reasons, vec![CONFIGURATION_ERROR_REASON]);
        assert!(conditions.wind_speed_details.is_empty());
        assert!(conditions.wind_gust_details.is_empty());
    }

    #[test]
    fn test_nan_record_value_is_unsafe_temperature() {
        let mut hour = pleasant();
        hour.temperature_2m = f64::NAN;
        assert!(!check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS).is_suitable);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let hour = record(-5.0, 22.0, 35.0, 3000.0, 100.0, 60.0);
        let first = check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS);
        let second = check_flying_conditions(&hour, &DEFAULT_WEATHER_THRESHOLDS);
        assert_eq!(first, second);
    }

    #[test]
    fn test_worse_values_never_improve_the_verdict() {
        let thresholds = DEFAULT_WEATHER_THRESHOLDS;
        for step in 0..50 {
            let wind = f64::from(step);
            let calmer = record(20.0, wind, 10.0, 10_000.0, 10.0, 5.0);
            let windier = record(20.0, wind + 1.0, 10.0, 10_000.0, 10.0, 5.0);
            let calm_ok = check_flying_conditions(&calmer, &thresholds).is_suitable;
            let windy_ok = check_flying_conditions(&windier, &thresholds).is_suitable;
            assert!(calm_ok || !windy_ok, "verdict improved at wind {wind}");
        }
    }

    #[test]
    fn test_raising_a_limit_never_worsens_the_verdict() {
        let hour = record(25.0, 18.0, 30.0, 8000.0, 50.0, 10.0);
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        let mut was_suitable = false;
        for step in 0..40 {
            thresholds.wind_speed.max = f64::from(step);
            let suitable = check_flying_conditions(&hour, &thresholds).is_suitable;
            assert!(suitable || !was_suitable, "verdict worsened at max {step}");
            was_suitable = suitable;
        }
        assert!(was_suitable);
    }

    #[test]
    fn test_rule_outcomes_carry_observed_values() {
        let mut hour = pleasant();
        hour.cloud_cover = 95.0;
        let mut thresholds = DEFAULT_WEATHER_THRESHOLDS;
        thresholds.weather.max_cloud_cover = 80.0;

        let outcomes = evaluate_rules(&hour, &thresholds).unwrap();
        let parameters: Vec<_> = outcomes.iter().map(|outcome| outcome.parameter).collect();
        let expected: Vec<_> = observed_values(&hour).iter().map(|(p, _)| *p).collect();
        assert_eq!(parameters, expected);

        let cloud = &outcomes[4];
        assert_eq!(cloud.value, 95.0);
        assert_eq!(cloud.violation.as_deref(), Some("Cloud cover is too high"));
        assert!(outcomes.iter().filter(|outcome| outcome.passed()).count() == 5);

        thresholds.temperature.max = f64::INFINITY;
        assert!(evaluate_rules(&hour, &thresholds).is_none());
    }
}
