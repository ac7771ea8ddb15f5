// thermwatch Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, ThermalError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;

// Re-export commonly used types
pub use core::thermal::{
    decide, downsample, sample_at_fraction, temperature_range, time_in_each_state, FanReading,
    FanSource, MonitorConfig, MonitorRuntime, MonitorSnapshot, MonitorSources, NotificationEvent,
    NotificationKind, NotificationSink, NotificationToggles, PressureLevel, PressureSource,
    Sample, TemperatureReading, TemperatureSource, ThermalMonitor,
};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
