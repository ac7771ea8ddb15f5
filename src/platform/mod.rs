//! Platform-specific sensor backends.
//!
//! Each backend implements one of the source traits from the core; this
//! module wires up whatever the current platform supports. Missing
//! capabilities degrade to absent readings, never to errors.

pub mod components;
#[cfg(target_os = "macos")]
mod darwin_pressure;
#[cfg(target_os = "linux")]
pub mod psi;
pub mod smc;

use once_cell::sync::OnceCell;

use crate::core::thermal::{MonitorSources, PressureSource};

use components::ComponentsTemperatureSource;

// Runtime toggles (read once)
fn temp_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::env::var("THERMWATCH_TEMP")
            .map(|v| v != "0")
            .unwrap_or(true)
    })
}

fn fan_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::env::var("THERMWATCH_FAN")
            .map(|v| v != "0")
            .unwrap_or(true)
    })
}

/// Pressure source for platforms without a publication mechanism.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
struct UnavailablePressureSource;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl PressureSource for UnavailablePressureSource {
    fn read_pressure(&mut self) -> Option<crate::core::thermal::PressureLevel> {
        None
    }
}

/// The best pressure backend this platform offers.
pub fn default_pressure_source() -> Box<dyn PressureSource> {
    #[cfg(target_os = "macos")]
    return Box::new(darwin_pressure::NotifyPressureSource::new());
    #[cfg(target_os = "linux")]
    return Box::new(psi::PsiPressureSource::new());
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    Box::new(UnavailablePressureSource)
}

/// Assemble the full source set for this platform.
///
/// macOS gets the SMC as the primary temperature backend plus fans; every
/// platform gets the generic hardware-sensor fallback. The SMC connection is
/// shared between the temperature and fan sources.
pub fn default_sources() -> MonitorSources {
    let pressure = default_pressure_source();

    #[cfg(target_os = "macos")]
    {
        use std::sync::Arc;
        let client = Arc::new(smc::SmcClient::new());
        MonitorSources {
            pressure,
            temperature_primary: temp_enabled()
                .then(|| {
                    Box::new(smc::SmcTemperatureSource::new(Arc::clone(&client)))
                        as Box<dyn crate::core::thermal::TemperatureSource>
                }),
            temperature_fallback: temp_enabled()
                .then(|| {
                    Box::new(ComponentsTemperatureSource::new())
                        as Box<dyn crate::core::thermal::TemperatureSource>
                }),
            fan: fan_enabled().then(|| {
                Box::new(smc::SmcFanSource::new(client)) as Box<dyn crate::core::thermal::FanSource>
            }),
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        MonitorSources {
            pressure,
            temperature_primary: None,
            temperature_fallback: temp_enabled().then(|| {
                Box::new(ComponentsTemperatureSource::new())
                    as Box<dyn crate::core::thermal::TemperatureSource>
            }),
            fan: {
                // No fan telemetry without the SMC; treat as fanless.
                let _ = fan_enabled();
                None
            },
        }
    }
}
