//! Daily flight windows over a multi-hour forecast

use super::evaluator::{EvaluationOptions, check_flying_conditions_with};
use crate::Result;
use crate::error::DroneWeatherError;
use crate::models::{Coordinates, ForecastPayload, HourlyForecastRecord};
use crate::thresholds::WeatherThresholds;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use sunrise::{SolarDay, SolarEvent};

#[derive(Debug, Clone, Serialize)]
pub struct HourlyScore {
    pub timestamp: DateTime<Utc>,
    pub is_flyable: bool,
    pub reasons: Vec<String>,
}

/// Contiguous flyable hours; `end` is the end of the last hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlyableRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FlyableRange {
    #[must_use]
    pub fn hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub hourly_scores: Vec<HourlyScore>,
    pub ranges: Vec<FlyableRange>,
    pub total_flyable_hours: usize,
}

impl DailySummary {
    fn new(date: NaiveDate, mut hourly_scores: Vec<HourlyScore>) -> Self {
        hourly_scores.sort_by_key(|h| h.timestamp);
        let total_flyable_hours = hourly_scores.iter().filter(|h| h.is_flyable).count();

        let mut summary = DailySummary {
            date,
            hourly_scores,
            ranges: Vec::new(),
            total_flyable_hours,
        };
        summary.calculate_flyable_time_ranges();
        summary
    }

    pub fn calculate_flyable_time_ranges(&mut self) {
        let mut ranges: Vec<FlyableRange> = Vec::new();

        for score in self.hourly_scores.iter().filter(|h| h.is_flyable) {
            let hour_end = score.timestamp + Duration::hours(1);
            match ranges.last_mut() {
                // Consecutive hour extends the open range
                Some(range) if range.end == score.timestamp => range.end = hour_end,
                _ => ranges.push(FlyableRange {
                    start: score.timestamp,
                    end: hour_end,
                }),
            }
        }

        self.ranges = ranges;
    }

    /// Longest contiguous flyable range of the day
    #[must_use]
    pub fn best_range(&self) -> Option<&FlyableRange> {
        self.ranges.iter().max_by_key(|range| range.end - range.start)
    }
}

/// Sunrise and sunset in UTC.
///
/// Polar days and nights have no events; 06:00 and 19:00 UTC stand in.
pub fn get_sunrise_sunset(
    coordinates: &Coordinates,
    date: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let solar_coordinates = sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
        .ok_or(DroneWeatherError::InvalidCoordinates {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })?;

    let solar_day = SolarDay::new(solar_coordinates, date);

    let sunrise = solar_day.event_time(SolarEvent::Sunrise).unwrap_or(
        date.and_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default())
            .and_utc(),
    );

    let sunset = solar_day.event_time(SolarEvent::Sunset).unwrap_or(
        date.and_time(NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default())
            .and_utc(),
    );

    Ok((sunrise, sunset))
}

fn split_forecast_by_days(
    payload: &ForecastPayload,
    daylight_only: bool,
) -> Result<BTreeMap<NaiveDate, Vec<&HourlyForecastRecord>>> {
    let mut daily_forecasts: BTreeMap<NaiveDate, Vec<&HourlyForecastRecord>> = BTreeMap::new();

    for hour in &payload.hourly_data {
        daily_forecasts
            .entry(hour.time.date_naive())
            .or_default()
            .push(hour);
    }

    if !daylight_only {
        return Ok(daily_forecasts);
    }

    let mut daylight = BTreeMap::new();
    for (date, hours) in daily_forecasts {
        let (sunrise, sunset) = get_sunrise_sunset(&payload.coordinates, date)?;
        let filtered: Vec<_> = hours
            .into_iter()
            .filter(|hour| hour.time >= sunrise && hour.time <= sunset)
            .collect();

        if !filtered.is_empty() {
            daylight.insert(date, filtered);
        }
    }
    Ok(daylight)
}

/// Evaluate every hour of `payload` and summarise flyable time per UTC day
pub fn flight_windows(
    payload: &ForecastPayload,
    thresholds: &WeatherThresholds,
    options: EvaluationOptions,
    daylight_only: bool,
) -> Result<Vec<DailySummary>> {
    let days = split_forecast_by_days(payload, daylight_only)?;

    let summaries = days
        .into_iter()
        .map(|(date, hours)| {
            let hourly_scores = hours
                .into_iter()
                .map(|hour| {
                    let conditions = check_flying_conditions_with(hour, thresholds, options);
                    HourlyScore {
                        timestamp: hour.time,
                        is_flyable: conditions.is_suitable,
                        reasons: conditions.reasons,
                    }
                })
                .collect();
            DailySummary::new(date, hourly_scores)
        })
        .collect();

    Ok(summaries)
}
