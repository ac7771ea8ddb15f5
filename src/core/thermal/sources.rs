//! Sensor source traits.
//!
//! Platform backends live under `crate::platform`; the monitor only ever
//! talks to these traits. Every read is a soft operation: `None` means "no
//! reading this tick", never an error that could abort sampling.

use super::types::{FanReading, PressureLevel, TemperatureReading};

/// Yields the discrete thermal-pressure level.
///
/// Registration with the OS publication mechanism happens at construction;
/// a failed registration is sticky and every later read returns `None`.
pub trait PressureSource: Send {
    fn read_pressure(&mut self) -> Option<PressureLevel>;
}

/// Yields a continuous CPU die temperature.
///
/// Implementations connect lazily on first use and must keep a failed
/// connection sticky for the process lifetime (no reconnect storms).
/// Readings outside the plausible range are discarded, not reported.
pub trait TemperatureSource: Send {
    fn read_cpu_temperature(&mut self) -> Option<TemperatureReading>;
}

/// Yields aggregate fan speed. Absent on fanless machines.
pub trait FanSource: Send {
    fn read_fan(&mut self) -> Option<FanReading>;
}

/// Physically plausible CPU die temperature bounds in Celsius (exclusive).
pub const PLAUSIBLE_TEMP_MIN: f32 = 20.0;
pub const PLAUSIBLE_TEMP_MAX: f32 = 150.0;

/// Range check rejecting sensor noise and garbage register contents.
pub fn is_plausible_temperature(celsius: f32) -> bool {
    celsius > PLAUSIBLE_TEMP_MIN && celsius < PLAUSIBLE_TEMP_MAX
}
