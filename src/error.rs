//! Error types and handling for the drone weather library

use thiserror::Error;

/// Failures of the remote forecast supplier
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The supplier answered with a non-success status
    #[error("Forecast service returned HTTP {status}")]
    Status { status: u16 },

    /// The response could not be turned into forecast records
    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),
}

/// Main error type for the drone weather library
#[derive(Error, Debug)]
pub enum DroneWeatherError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Forecast could not be fetched
    #[error("Forecast fetch failed: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },

    /// Threshold values failed one or more sanity checks
    #[error("Invalid thresholds: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// Key-value storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Coordinates outside the valid latitude/longitude range
    #[error("Invalid coordinates: lat={latitude}, lng={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Unknown drone profile id
    #[error("Unknown drone profile: {id}")]
    UnknownProfile { id: String },
}

impl DroneWeatherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DroneWeatherError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            DroneWeatherError::Fetch { .. } => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            DroneWeatherError::Validation { errors } => {
                format!("Invalid thresholds:\n  - {}", errors.join("\n  - "))
            }
            DroneWeatherError::Storage { .. } => {
                "Storage operation failed. You may need to clear your cache.".to_string()
            }
            DroneWeatherError::InvalidCoordinates { .. } => {
                "Latitude must be within ±90° and longitude within ±180°.".to_string()
            }
            DroneWeatherError::UnknownProfile { id } => {
                format!("No drone profile named '{id}'")
            }
        }
    }
}

impl From<anyhow::Error> for DroneWeatherError {
    fn from(err: anyhow::Error) -> Self {
        DroneWeatherError::storage(format!("{err:#}"))
    }
}
