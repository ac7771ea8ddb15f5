//! Status command handler.
//!
//! Samples the thermal state once and prints it.

use anyhow::Result;
use chrono::Utc;
use clap::ArgMatches;
use colored::{ColoredString, Colorize};

use crate::core::thermal::{MonitorConfig, PressureLevel, ThermalMonitor};
use crate::platform;

/// Execute the status command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut monitor = ThermalMonitor::new(platform::default_sources(), MonitorConfig::default());
    monitor.tick(Utc::now());

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string(&monitor.snapshot())?);
        return Ok(());
    }

    println!("Pressure:  {}", colorize_level(monitor.current_pressure()));

    match monitor.current_temperature() {
        Some(temp) => println!(
            "CPU temp:  {:.1}°C  ({})",
            temp,
            monitor.temperature_source().unwrap_or("unknown sensor")
        ),
        None => println!("CPU temp:  unavailable"),
    }

    match (monitor.current_fan_percent(), monitor.current_fan_rpm()) {
        (Some(percent), Some(rpm)) => println!("Fans:      {percent:.0}%  ({rpm:.0} rpm)"),
        _ => println!("Fans:      none detected"),
    }

    Ok(())
}

/// Severity color mapping shared by the human-facing commands.
pub(crate) fn colorize_level(level: PressureLevel) -> ColoredString {
    let name = level.display_name();
    match level {
        PressureLevel::Nominal => name.green(),
        PressureLevel::Moderate => name.yellow(),
        PressureLevel::Heavy => name.red(),
        PressureLevel::Trapping | PressureLevel::Sleeping => name.bright_red().bold(),
        PressureLevel::Unknown => name.dimmed(),
    }
}
