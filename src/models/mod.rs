//! Data models for the drone weather library
//!
//! - Location: query coordinates and proximity checks
//! - Forecast: hourly forecast records and the multi-hour payload

pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use forecast::{ForecastPayload, HourlyForecastRecord};
pub use location::Coordinates;
