//! `drone-weather` - Drone flyability from hourly weather forecasts
//!
//! This library provides unit conversion, configurable safety thresholds
//! with built-in drone profiles, the flyability rule set, a location-bound
//! forecast cache and the orchestrator that ties them together.

pub mod cache;
pub mod config;
pub mod error;
pub mod flyability;
pub mod logging;
pub mod models;
pub mod service;
pub mod storage;
pub mod supplier;
pub mod thresholds;
pub mod units;

// Re-export core types for public API
pub use cache::{CacheStatus, ForecastCache};
pub use config::AppConfig;
pub use error::{DroneWeatherError, FetchError};
pub use flyability::{
    DailySummary, EvaluationOptions, FlightConditions, Safety, check_flying_conditions,
};
pub use models::{Coordinates, ForecastPayload, HourlyForecastRecord};
pub use service::WeatherService;
pub use storage::{FjallStore, MemoryStore, SlotStore};
pub use supplier::{ForecastSupplier, OpenMeteoClient};
pub use thresholds::{
    DEFAULT_WEATHER_THRESHOLDS, DRONE_PROFILES, DroneProfile, ThresholdService, WeatherThresholds,
};
pub use units::{DistanceUnit, SpeedUnit, TemperatureUnit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DroneWeatherError>;
