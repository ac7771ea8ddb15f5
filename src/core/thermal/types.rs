use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse OS-classified thermal severity tier.
///
/// Trapping and Sleeping both mean severe throttling; neither outranks the
/// other, so severity comparisons go through [`PressureLevel::severity`]
/// rather than a derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureLevel {
    Nominal,
    Moderate,
    Heavy,
    Trapping,
    Sleeping,
    Unknown,
}

impl PressureLevel {
    /// All real (non-Unknown) levels, lowest severity first.
    pub const ALL: [PressureLevel; 5] = [
        PressureLevel::Nominal,
        PressureLevel::Moderate,
        PressureLevel::Heavy,
        PressureLevel::Trapping,
        PressureLevel::Sleeping,
    ];

    /// Numeric severity rank. Trapping and Sleeping share the top rank.
    pub fn severity(self) -> u8 {
        match self {
            PressureLevel::Unknown => 0,
            PressureLevel::Nominal => 1,
            PressureLevel::Moderate => 2,
            PressureLevel::Heavy => 3,
            PressureLevel::Trapping | PressureLevel::Sleeping => 4,
        }
    }

    /// True at levels where the OS is actively reducing CPU/GPU performance.
    pub fn is_throttling(self) -> bool {
        matches!(
            self,
            PressureLevel::Heavy | PressureLevel::Trapping | PressureLevel::Sleeping
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PressureLevel::Nominal => "Nominal",
            PressureLevel::Moderate => "Moderate",
            PressureLevel::Heavy => "Heavy",
            PressureLevel::Trapping => "Trapping",
            PressureLevel::Sleeping => "Sleeping",
            PressureLevel::Unknown => "Unknown",
        }
    }

    /// Map the OS state code published by the pressure mechanism.
    pub fn from_state_code(code: u64) -> PressureLevel {
        match code {
            0 => PressureLevel::Nominal,
            1 => PressureLevel::Moderate,
            2 => PressureLevel::Heavy,
            3 => PressureLevel::Trapping,
            4 => PressureLevel::Sleeping,
            _ => PressureLevel::Unknown,
        }
    }
}

/// One observation, created exactly once per sampling tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub pressure: PressureLevel,
    pub temperature_celsius: Option<f32>,
    pub fan_percent: Option<f32>,
    pub timestamp: DateTime<Utc>,
}

/// A CPU die temperature with the sensor that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub celsius: f32,
    /// Hardware key or backend label, e.g. "Tp01" or "hwmon".
    pub source: String,
}

/// Aggregate fan speed across all enumerated fans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanReading {
    pub rpm: f32,
    /// Mean of per-fan (actual/max)*100, clamped to 100.
    pub percent: f32,
}

/// User-toggleable notification flags.
///
/// Persistence of these flags lives outside the core; the monitor only reads
/// them. Defaults match the shipped behavior: throttle alerts on, recovery
/// and sound off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationToggles {
    pub notify_on_heavy: bool,
    pub notify_on_critical: bool,
    pub notify_on_recovery: bool,
    pub sound_enabled: bool,
}

impl Default for NotificationToggles {
    fn default() -> Self {
        Self {
            notify_on_heavy: true,
            notify_on_critical: true,
            notify_on_recovery: false,
            sound_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    ThrottleHeavy,
    ThrottleCritical,
    Recovery,
}

/// Emitted on a meaningful pressure transition; consumed immediately by the
/// delivery sink, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    /// The pressure level that triggered the event.
    pub level: PressureLevel,
}

/// Immutable published copy of the monitor state, safe for concurrent readers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub pressure: Option<PressureLevel>,
    pub temperature_celsius: Option<f32>,
    pub fan_percent: Option<f32>,
    pub history: Vec<Sample>,
    pub timestamp: i64, // Unix timestamp
}
