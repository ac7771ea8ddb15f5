//! Linux pressure backend: kernel PSI (pressure stall information).
//!
//! `/proc/pressure/cpu` publishes how much wall time tasks stall waiting for
//! CPU. The `some avg10` figure (percent of the last 10 s with at least one
//! stalled task) is classified into the discrete pressure tiers. PSI never
//! reports a forced-sleep condition, so Sleeping is never synthesized here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::thermal::{PressureLevel, PressureSource};

const PSI_CPU_PATH: &str = "/proc/pressure/cpu";

// avg10 classification thresholds (percent).
const MODERATE_AT: f32 = 10.0;
const HEAVY_AT: f32 = 40.0;
const TRAPPING_AT: f32 = 75.0;

pub struct PsiPressureSource {
    /// None when the psi file was absent at construction (sticky).
    path: Option<PathBuf>,
}

impl PsiPressureSource {
    pub fn new() -> Self {
        Self::at(Path::new(PSI_CPU_PATH))
    }

    /// Probe the given psi file once; absence is permanent for this source.
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.exists().then(|| path.to_path_buf()),
        }
    }

    /// Map a `some avg10` stall percentage to a pressure tier.
    pub fn classify(avg10: f32) -> PressureLevel {
        if avg10 >= TRAPPING_AT {
            PressureLevel::Trapping
        } else if avg10 >= HEAVY_AT {
            PressureLevel::Heavy
        } else if avg10 >= MODERATE_AT {
            PressureLevel::Moderate
        } else {
            PressureLevel::Nominal
        }
    }

    /// Pull `avg10=` out of the `some` line of a psi file.
    ///
    /// Format: `some avg10=0.00 avg60=0.00 avg300=0.00 total=0`
    pub fn parse_some_avg10(text: &str) -> Option<f32> {
        let line = text.lines().find(|l| l.starts_with("some"))?;
        let field = line
            .split_whitespace()
            .find_map(|tok| tok.strip_prefix("avg10="))?;
        field.parse().ok()
    }
}

impl Default for PsiPressureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PressureSource for PsiPressureSource {
    fn read_pressure(&mut self) -> Option<PressureLevel> {
        let path = self.path.as_ref()?;
        let text = fs::read_to_string(path).ok()?;
        let avg10 = Self::parse_some_avg10(&text)?;
        Some(Self::classify(avg10))
    }
}
