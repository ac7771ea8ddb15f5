//! The sampler: orchestrates sensor reads, transition detection and the
//! bounded history buffer.
//!
//! All mutation happens inside [`ThermalMonitor::tick`]; readers get
//! consistent state either through the accessors (single-threaded use) or
//! through published [`MonitorSnapshot`] copies (see `runtime`).

use chrono::{DateTime, Duration, Utc};

use super::policy::decide;
use super::sources::{FanSource, PressureSource, TemperatureSource};
use super::types::{
    FanReading, MonitorSnapshot, NotificationEvent, NotificationToggles, PressureLevel, Sample,
    TemperatureReading,
};

/// Default sliding retention window for history samples.
pub const DEFAULT_RETENTION_SECS: i64 = 3600;

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Samples older than this are evicted after every append.
    pub retention: Duration,
    pub toggles: NotificationToggles,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            retention: Duration::seconds(DEFAULT_RETENTION_SECS),
            toggles: NotificationToggles::default(),
        }
    }
}

/// The sensor backends a monitor samples from.
///
/// Absent entries degrade the corresponding reading to "absent"; the
/// monitor itself never cares which platform the boxes came from.
pub struct MonitorSources {
    pub pressure: Box<dyn PressureSource>,
    pub temperature_primary: Option<Box<dyn TemperatureSource>>,
    pub temperature_fallback: Option<Box<dyn TemperatureSource>>,
    pub fan: Option<Box<dyn FanSource>>,
}

/// Process-resident thermal monitor state.
pub struct ThermalMonitor {
    sources: MonitorSources,
    config: MonitorConfig,
    pressure: PressureLevel,
    previous_pressure: PressureLevel,
    temperature: Option<TemperatureReading>,
    fan: Option<FanReading>,
    history: Vec<Sample>,
}

impl ThermalMonitor {
    pub fn new(sources: MonitorSources, config: MonitorConfig) -> Self {
        Self {
            sources,
            config,
            pressure: PressureLevel::Unknown,
            previous_pressure: PressureLevel::Unknown,
            temperature: None,
            fan: None,
            history: Vec::new(),
        }
    }

    /// Run one sampling tick at `now`.
    ///
    /// Always appends exactly one [`Sample`], no matter how many sources
    /// miss; a sensor failure only degrades its own reading to absent.
    /// Returns the notification event for this tick's transition, if any.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<NotificationEvent> {
        let new_pressure = self
            .sources
            .pressure
            .read_pressure()
            .unwrap_or(PressureLevel::Unknown);

        let mut event = None;
        if new_pressure != self.previous_pressure {
            // Policy sees the transition before previous is overwritten.
            event = decide(self.previous_pressure, new_pressure, &self.config.toggles);
            self.previous_pressure = new_pressure;
        }
        self.pressure = new_pressure;

        // Primary backend first, generic fallback second. A miss on both
        // records absence for this tick; stale values are never carried
        // forward.
        self.temperature = self
            .sources
            .temperature_primary
            .as_mut()
            .and_then(|s| s.read_cpu_temperature())
            .or_else(|| {
                self.sources
                    .temperature_fallback
                    .as_mut()
                    .and_then(|s| s.read_cpu_temperature())
            });

        self.fan = self.sources.fan.as_mut().and_then(|s| s.read_fan());

        self.history.push(Sample {
            pressure: new_pressure,
            temperature_celsius: self.temperature.as_ref().map(|r| r.celsius),
            fan_percent: self.fan.map(|f| f.percent),
            timestamp: now,
        });
        self.evict(now);

        event
    }

    /// Drop every sample older than the retention window.
    fn evict(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.config.retention;
        // Timestamps are non-decreasing, so the stale prefix is contiguous.
        let keep_from = self.history.partition_point(|s| s.timestamp < cutoff);
        if keep_from > 0 {
            self.history.drain(..keep_from);
        }
    }

    pub fn current_pressure(&self) -> PressureLevel {
        self.pressure
    }

    pub fn current_temperature(&self) -> Option<f32> {
        self.temperature.as_ref().map(|r| r.celsius)
    }

    /// Sensor key or backend label behind the current temperature.
    pub fn temperature_source(&self) -> Option<&str> {
        self.temperature.as_ref().map(|r| r.source.as_str())
    }

    pub fn current_fan_percent(&self) -> Option<f32> {
        self.fan.map(|f| f.percent)
    }

    pub fn current_fan_rpm(&self) -> Option<f32> {
        self.fan.map(|f| f.rpm)
    }

    /// Read-only view of the retained history, oldest first.
    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    pub fn toggles(&self) -> &NotificationToggles {
        &self.config.toggles
    }

    pub fn set_toggles(&mut self, toggles: NotificationToggles) {
        self.config.toggles = toggles;
    }

    /// Owned, consistent copy for concurrent readers.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            pressure: (self.pressure != PressureLevel::Unknown).then_some(self.pressure),
            temperature_celsius: self.current_temperature(),
            fan_percent: self.current_fan_percent(),
            history: self.history.clone(),
            timestamp: Utc::now().timestamp(),
        }
    }
}
