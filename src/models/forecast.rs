//! Hourly forecast records and the multi-hour forecast payload

use super::Coordinates;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One hour of meteorological data for a location.
///
/// Values are in canonical units: Celsius, km/h, meters (visibility),
/// millimeters (precipitation) and percent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyForecastRecord {
    /// Start of the hour this record covers
    pub time: DateTime<Utc>,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub dew_point_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation_probability: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub snowfall: f64,
    pub snow_depth: f64,
    /// WMO weather interpretation code
    pub weather_code: u8,
    pub cloud_cover: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
    /// Visibility in meters
    pub visibility: f64,
    /// Millimeters
    pub evapotranspiration: f64,
    pub et0_fao_evapotranspiration: f64,
    /// Kilopascal
    pub vapour_pressure_deficit: f64,
    pub wind_speed_10m: f64,
    pub wind_speed_80m: f64,
    pub wind_speed_120m: f64,
    pub wind_speed_180m: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction_10m: f64,
    pub wind_direction_80m: f64,
    pub wind_direction_120m: f64,
    pub wind_direction_180m: f64,
    pub wind_gusts_10m: f64,
    pub temperature_80m: f64,
    pub temperature_120m: f64,
    pub temperature_180m: f64,
}

impl HourlyForecastRecord {
    /// A calm, clear hour at 15°C. Suppliers and tests override what they need.
    #[must_use]
    pub fn calm(time: DateTime<Utc>) -> Self {
        Self {
            time,
            temperature_2m: 15.0,
            relative_humidity_2m: 60.0,
            dew_point_2m: 7.0,
            apparent_temperature: 15.0,
            precipitation_probability: 0.0,
            precipitation: 0.0,
            rain: 0.0,
            showers: 0.0,
            snowfall: 0.0,
            snow_depth: 0.0,
            weather_code: 0,
            cloud_cover: 0.0,
            cloud_cover_low: 0.0,
            cloud_cover_mid: 0.0,
            cloud_cover_high: 0.0,
            visibility: 20_000.0,
            evapotranspiration: 0.1,
            et0_fao_evapotranspiration: 0.1,
            vapour_pressure_deficit: 0.7,
            wind_speed_10m: 5.0,
            wind_speed_80m: 8.0,
            wind_speed_120m: 10.0,
            wind_speed_180m: 12.0,
            wind_direction_10m: 270.0,
            wind_direction_80m: 270.0,
            wind_direction_120m: 270.0,
            wind_direction_180m: 270.0,
            wind_gusts_10m: 9.0,
            temperature_80m: 14.5,
            temperature_120m: 14.0,
            temperature_180m: 13.5,
        }
    }

    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: f64) -> &'static str {
        const POINTS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W",
            "WNW", "NW", "NNW",
        ];
        if !degrees.is_finite() {
            return "Unknown";
        }
        let sector = (degrees.rem_euclid(360.0) / 22.5).round() as usize % POINTS.len();
        POINTS[sector]
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{:.1} km/h {} (gusts {:.1} km/h)",
            self.wind_speed_10m,
            Self::wind_direction_to_cardinal(self.wind_direction_10m),
            self.wind_gusts_10m
        )
    }
}

/// A multi-hour forecast for one location, as returned by the supplier
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPayload {
    /// Coordinates the forecast was requested for
    pub coordinates: Coordinates,
    /// Records sorted by ascending timestamp
    pub hourly_data: Vec<HourlyForecastRecord>,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl ForecastPayload {
    #[must_use]
    pub fn new(coordinates: Coordinates, hourly_data: Vec<HourlyForecastRecord>) -> Self {
        Self {
            coordinates,
            hourly_data,
            retrieved_at: Utc::now(),
        }
    }

    /// Index of the record whose hour contains `instant`
    #[must_use]
    pub fn hour_index_at(&self, instant: DateTime<Utc>) -> Option<usize> {
        self.hourly_data
            .iter()
            .position(|hour| instant >= hour.time && instant < hour.time + Duration::hours(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload_over_two_days() -> ForecastPayload {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
        let hourly_data = (0..4)
            .map(|i| HourlyForecastRecord::calm(start + Duration::hours(i)))
            .collect();
        ForecastPayload::new(Coordinates::new(46.8182, 8.2275), hourly_data)
    }

    #[test]
    fn test_hour_index_at() {
        let forecast = payload_over_two_days();
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 23, 42, 0).unwrap();
        assert_eq!(forecast.hour_index_at(instant), Some(1));

        let before = Utc.with_ymd_and_hms(2024, 6, 1, 21, 59, 0).unwrap();
        assert_eq!(forecast.hour_index_at(before), None);
    }

    #[test]
    fn test_wind_direction_to_cardinal() {
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(0.0), "N");
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(90.0), "E");
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(180.0), "S");
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(270.0), "W");
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(45.0), "NE");
        assert_eq!(HourlyForecastRecord::wind_direction_to_cardinal(355.0), "N");
    }
}
