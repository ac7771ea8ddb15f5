//! Fallback CPU temperature via the generic hardware-sensor service.
//!
//! Queries every temperature component the OS exposes (hwmon on Linux,
//! the sensor services sysinfo wraps elsewhere), keeps the ones whose label
//! looks like a CPU die sensor, and reports the maximum plausible reading.
//! The component list is resolved lazily once and then kept for the process
//! lifetime; the handles are deliberately never released (cheap for a
//! peripheral fallback path).

use sysinfo::Components;

use crate::core::thermal::{is_plausible_temperature, TemperatureReading, TemperatureSource};

const CPU_LABELS: [&str; 5] = ["cpu", "package", "core", "tctl", "tdie"];

#[derive(Default)]
pub struct ComponentsTemperatureSource {
    components: Option<Components>,
}

impl ComponentsTemperatureSource {
    pub fn new() -> Self {
        Self { components: None }
    }

    fn looks_like_cpu(label: &str) -> bool {
        let lower = label.to_ascii_lowercase();
        CPU_LABELS.iter().any(|pat| lower.contains(pat))
    }
}

impl TemperatureSource for ComponentsTemperatureSource {
    fn read_cpu_temperature(&mut self) -> Option<TemperatureReading> {
        let components = self
            .components
            .get_or_insert_with(Components::new_with_refreshed_list);
        components.refresh(false);

        let mut best: Option<TemperatureReading> = None;
        for comp in components.iter() {
            if !Self::looks_like_cpu(comp.label()) {
                continue;
            }
            let Some(value) = comp.temperature() else {
                continue;
            };
            if !is_plausible_temperature(value) {
                continue;
            }
            if best.as_ref().is_none_or(|b| value > b.celsius) {
                best = Some(TemperatureReading {
                    celsius: value,
                    source: comp.label().to_string(),
                });
            }
        }
        best
    }
}
