//! Watch command handler.
//!
//! Runs the sampling runtime until Ctrl-C, printing each published snapshot,
//! then a time-in-state breakdown for the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::thermal::{
    time_in_each_state, LogSink, MonitorConfig, MonitorSnapshot, NotificationToggles,
    PressureLevel, ThermalMonitor,
};
use crate::platform;

use super::status::colorize_level;

/// Execute the watch command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let interval_ms = matches.get_one::<u64>("interval").copied().unwrap_or(2000);
    let retention_secs = matches.get_one::<i64>("retention").copied().unwrap_or(3600);
    let json = matches.get_flag("json");

    let mut toggles = NotificationToggles::default();
    if matches.get_flag("no-notify") {
        toggles.notify_on_heavy = false;
        toggles.notify_on_critical = false;
        toggles.notify_on_recovery = false;
    }
    if matches.get_flag("notify-recovery") {
        toggles.notify_on_recovery = true;
    }

    let config = MonitorConfig {
        retention: Duration::seconds(retention_secs.max(1)),
        toggles,
    };
    let monitor = ThermalMonitor::new(platform::default_sources(), config);

    let runtime = crate::core::thermal::MonitorRuntime::new(
        monitor,
        Box::new(LogSink),
        StdDuration::from_millis(interval_ms.max(100)),
    )
    .context("Failed to start monitor runtime")?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    let mut snapshot_rx = runtime.snapshot_rx.clone();
    let mut last_seen: Option<Arc<MonitorSnapshot>> = None;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(StdDuration::from_millis(interval_ms.min(500)));
        match snapshot_rx.has_changed() {
            Ok(true) => {
                let snap = Arc::clone(&snapshot_rx.borrow_and_update());
                if json {
                    println!("{}", serde_json::to_string(&*snap)?);
                } else {
                    print_snapshot(&snap);
                }
                last_seen = Some(snap);
            }
            Ok(false) => {}
            Err(_) => break, // sampler gone
        }
    }

    runtime.shutdown();

    if !json {
        if let Some(snap) = last_seen {
            print_breakdown(&snap);
        }
    }

    Ok(())
}

fn print_snapshot(snap: &MonitorSnapshot) {
    let clock = DateTime::<Utc>::from_timestamp(snap.timestamp, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    let pressure = colorize_level(snap.pressure.unwrap_or(PressureLevel::Unknown));
    let temp = snap
        .temperature_celsius
        .map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| "--".to_string());
    let fan = snap
        .fan_percent
        .map(|p| format!("fan {p:.0}%"))
        .unwrap_or_else(|| "no fan".to_string());

    println!(
        "{clock}  {pressure:<10}  {temp:>7}  {fan:>8}  ({} samples)",
        snap.history.len()
    );
}

fn print_breakdown(snap: &MonitorSnapshot) {
    let now = Utc::now();
    let breakdown = time_in_each_state(&snap.history, now);
    if breakdown.is_empty() {
        return;
    }

    let total: Duration = breakdown
        .iter()
        .fold(Duration::zero(), |acc, (_, d)| acc + *d);

    println!();
    println!("{}", "Time in each state:".bold());
    for (level, duration) in &breakdown {
        let percent = if total > Duration::zero() {
            (duration.num_seconds() as f64 / total.num_seconds().max(1) as f64 * 100.0).round()
        } else {
            0.0
        };
        println!(
            "  {:<10} {:>8}  ({percent:.0}%)",
            colorize_level(*level),
            format_duration(*duration)
        );
    }
}

/// Compact duration rendering: "1h 4m", "3m 12s", "45s".
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::seconds(45)), "45s");
        assert_eq!(format_duration(Duration::seconds(192)), "3m 12s");
        assert_eq!(format_duration(Duration::seconds(3840)), "1h 4m");
        assert_eq!(format_duration(Duration::seconds(0)), "0s");
    }
}
