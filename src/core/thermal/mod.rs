//! Thermal monitoring core functionality.
//!
//! This module provides the business logic for sampling thermal pressure,
//! CPU temperature and fan speed, maintaining a bounded rolling history,
//! and deciding when pressure transitions warrant a notification.

pub mod history;
mod monitor;
mod policy;
mod runtime;
mod sources;
mod types;

pub use history::{
    downsample, sample_at_fraction, temperature_range, time_in_each_state, DEFAULT_DISPLAY_CAP,
};
pub use monitor::{MonitorConfig, MonitorSources, ThermalMonitor, DEFAULT_RETENTION_SECS};
pub use policy::{decide, render, LogSink, NotificationSink};
pub use runtime::{MonitorRuntime, DEFAULT_TICK_MS};
pub use sources::{is_plausible_temperature, FanSource, PressureSource, TemperatureSource};
pub use types::{
    FanReading, MonitorSnapshot, NotificationEvent, NotificationKind, NotificationToggles,
    PressureLevel, Sample, TemperatureReading,
};
