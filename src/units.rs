//! Unit conversion between display units and canonical storage units
//!
//! Forecast values are always held in Celsius, km/h and kilometers (meters
//! for visibility). Thresholds carry their own display unit and are converted
//! into the canonical unit right before comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// km/h -> mph and kilometers -> miles
const KM_TO_MILES: f64 = 0.621371;
/// mph -> km/h and miles -> kilometers. Not the exact reciprocal of
/// `KM_TO_MILES`; both values are what persisted and displayed data was
/// produced with.
const MILES_TO_KM: f64 = 1.60934;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

#[must_use]
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

#[must_use]
pub fn convert_speed(value: f64, from: SpeedUnit, to: SpeedUnit) -> f64 {
    match (from, to) {
        (SpeedUnit::Kmh, SpeedUnit::Mph) => value * KM_TO_MILES,
        (SpeedUnit::Mph, SpeedUnit::Kmh) => value * MILES_TO_KM,
        _ => value,
    }
}

#[must_use]
pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    match (from, to) {
        (DistanceUnit::Kilometers, DistanceUnit::Miles) => value * KM_TO_MILES,
        (DistanceUnit::Miles, DistanceUnit::Kilometers) => value * MILES_TO_KM,
        _ => value,
    }
}

impl TemperatureUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl SpeedUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "km/h",
            SpeedUnit::Mph => "mph",
        }
    }
}

impl DistanceUnit {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Format a canonical Celsius value in the requested display unit
#[must_use]
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    let value = convert_temperature(celsius, TemperatureUnit::Celsius, unit);
    format!("{value:.0}{unit}")
}

/// Format a canonical km/h value in the requested display unit
#[must_use]
pub fn format_speed(kmh: f64, unit: SpeedUnit) -> String {
    let value = convert_speed(kmh, SpeedUnit::Kmh, unit);
    format!("{value:.0} {unit}")
}

/// Format a visibility given in meters in the requested display unit
#[must_use]
pub fn format_visibility(meters: f64, unit: DistanceUnit) -> String {
    let value = convert_distance(meters / 1000.0, DistanceUnit::Kilometers, unit);
    format!("{value:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    #[rstest]
    #[case(0.0, 32.0)]
    #[case(100.0, 212.0)]
    #[case(-40.0, -40.0)]
    #[case(25.0, 77.0)]
    fn test_celsius_to_fahrenheit(#[case] celsius: f64, #[case] fahrenheit: f64) {
        let converted =
            convert_temperature(celsius, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit);
        assert!((converted - fahrenheit).abs() < EPSILON);
    }

    #[test]
    fn test_identity_conversions() {
        assert_eq!(
            convert_temperature(12.5, TemperatureUnit::Fahrenheit, TemperatureUnit::Fahrenheit),
            12.5
        );
        assert_eq!(convert_speed(12.5, SpeedUnit::Mph, SpeedUnit::Mph), 12.5);
        assert_eq!(
            convert_distance(12.5, DistanceUnit::Kilometers, DistanceUnit::Kilometers),
            12.5
        );
    }

    #[test]
    fn test_speed_uses_fixed_constants() {
        assert_eq!(convert_speed(10.0, SpeedUnit::Kmh, SpeedUnit::Mph), 10.0 * 0.621371);
        assert_eq!(convert_speed(10.0, SpeedUnit::Mph, SpeedUnit::Kmh), 10.0 * 1.60934);
        assert_eq!(
            convert_distance(3.0, DistanceUnit::Miles, DistanceUnit::Kilometers),
            3.0 * 1.60934
        );
    }

    #[rstest]
    #[case(-17.3)]
    #[case(0.0)]
    #[case(36.6)]
    #[case(104.0)]
    fn test_round_trips(#[case] value: f64) {
        let temperature = convert_temperature(
            convert_temperature(value, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit),
            TemperatureUnit::Fahrenheit,
            TemperatureUnit::Celsius,
        );
        assert!((temperature - value).abs() < EPSILON);

        // the two speed factors multiply to 0.99999... so allow for that drift
        let tolerance = value.abs() * 1e-5 + EPSILON;
        let speed = convert_speed(
            convert_speed(value, SpeedUnit::Kmh, SpeedUnit::Mph),
            SpeedUnit::Mph,
            SpeedUnit::Kmh,
        );
        assert!((speed - value).abs() < tolerance);

        let distance = convert_distance(
            convert_distance(value, DistanceUnit::Miles, DistanceUnit::Kilometers),
            DistanceUnit::Kilometers,
            DistanceUnit::Miles,
        );
        assert!((distance - value).abs() < tolerance);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(format_temperature(25.0, TemperatureUnit::Fahrenheit), "77°F");
        assert_eq!(format_speed(20.0, SpeedUnit::Kmh), "20 km/h");
        assert_eq!(format_speed(100.0, SpeedUnit::Mph), "62 mph");
        assert_eq!(format_visibility(8000.0, DistanceUnit::Kilometers), "8.0 km");
    }

    #[test]
    fn test_unit_serde_names() {
        assert_eq!(serde_json::to_string(&SpeedUnit::Kmh).unwrap(), "\"kmh\"");
        assert_eq!(
            serde_json::from_str::<DistanceUnit>("\"miles\"").unwrap(),
            DistanceUnit::Miles
        );
        assert_eq!(
            serde_json::from_str::<TemperatureUnit>("\"fahrenheit\"").unwrap(),
            TemperatureUnit::Fahrenheit
        );
    }
}
