use std::io;
use thiserror::Error;

/// Custom error type for the thermwatch application
#[derive(Error, Debug)]
pub enum ThermalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    #[error("Monitor runtime error: {0}")]
    Runtime(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the thermwatch application
pub type Result<T> = std::result::Result<T, ThermalError>;

impl ThermalError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ThermalError::Config(msg.into())
    }

    /// Create a sensor-unavailable error
    pub fn sensor_unavailable<S: Into<String>>(msg: S) -> Self {
        ThermalError::SensorUnavailable(msg.into())
    }

    /// Create a notification delivery error
    pub fn notification<S: Into<String>>(msg: S) -> Self {
        ThermalError::Notification(msg.into())
    }

    /// Create a runtime error
    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        ThermalError::Runtime(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ThermalError::Other(msg.into())
    }
}
