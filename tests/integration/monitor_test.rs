//! End-to-end monitor behavior with scripted sensor backends.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, TimeZone, Utc};
use thermwatch::{
    downsample, sample_at_fraction, time_in_each_state, FanReading, FanSource, MonitorConfig,
    MonitorSources, NotificationKind, NotificationToggles, PressureLevel, PressureSource,
    TemperatureReading, TemperatureSource, ThermalMonitor,
};

struct ScriptedPressure(VecDeque<Option<PressureLevel>>);

impl PressureSource for ScriptedPressure {
    fn read_pressure(&mut self) -> Option<PressureLevel> {
        self.0.pop_front().flatten()
    }
}

struct ScriptedTemperature(VecDeque<Option<f32>>);

impl TemperatureSource for ScriptedTemperature {
    fn read_cpu_temperature(&mut self) -> Option<TemperatureReading> {
        self.0.pop_front().flatten().map(|celsius| TemperatureReading {
            celsius,
            source: "scripted".to_string(),
        })
    }
}

struct ScriptedFan(VecDeque<Option<f32>>);

impl FanSource for ScriptedFan {
    fn read_fan(&mut self) -> Option<FanReading> {
        self.0.pop_front().flatten().map(|percent| FanReading {
            rpm: percent * 50.0,
            percent,
        })
    }
}

struct DeadPressure;

impl PressureSource for DeadPressure {
    fn read_pressure(&mut self) -> Option<PressureLevel> {
        None
    }
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 15, 10, 0, 0).unwrap()
}

#[test]
fn total_sensor_failure_still_samples() {
    let sources = MonitorSources {
        pressure: Box::new(DeadPressure),
        temperature_primary: None,
        temperature_fallback: None,
        fan: None,
    };
    let mut monitor = ThermalMonitor::new(sources, MonitorConfig::default());

    for i in 0..5 {
        let event = monitor.tick(base() + Duration::seconds(i * 2));
        assert!(event.is_none());
    }

    assert_eq!(monitor.history().len(), 5);
    assert_eq!(monitor.current_pressure(), PressureLevel::Unknown);
    for sample in monitor.history() {
        assert_eq!(sample.pressure, PressureLevel::Unknown);
        assert_eq!(sample.temperature_celsius, None);
        assert_eq!(sample.fan_percent, None);
    }
}

#[test]
fn long_session_history_stays_bounded_and_aggregates() {
    let ticks: usize = 3000; // 100 minutes at 2s, past the 1h retention
    let pressures: Vec<Option<PressureLevel>> = (0..ticks)
        .map(|i| {
            Some(if i % 600 < 450 {
                PressureLevel::Nominal
            } else {
                PressureLevel::Heavy
            })
        })
        .collect();
    let temps: Vec<Option<f32>> = (0..ticks).map(|i| Some(55.0 + (i % 20) as f32)).collect();
    let fans: Vec<Option<f32>> = (0..ticks).map(|i| Some((i % 100) as f32)).collect();

    let sources = MonitorSources {
        pressure: Box::new(ScriptedPressure(pressures.into())),
        temperature_primary: Some(Box::new(ScriptedTemperature(temps.into()))),
        temperature_fallback: None,
        fan: Some(Box::new(ScriptedFan(fans.into()))),
    };
    let mut monitor = ThermalMonitor::new(sources, MonitorConfig::default());

    let mut now = base();
    for i in 0..ticks {
        now = base() + Duration::seconds(i as i64 * 2);
        monitor.tick(now);
    }

    // Retention keeps exactly the last hour: 1800 ticks at 2s, plus the
    // boundary sample exactly retention old.
    assert_eq!(monitor.history().len(), 1801);
    let oldest = monitor.history().first().unwrap().timestamp;
    assert_eq!(now - oldest, Duration::seconds(3600));

    // Display decimation.
    let shown = downsample(monitor.history(), 300);
    assert_eq!(shown.len(), 300);
    assert_eq!(shown.last(), monitor.history().last());

    // Lossless accounting over the full buffer.
    let later = now + Duration::seconds(1);
    let breakdown = time_in_each_state(monitor.history(), later);
    let total: Duration = breakdown
        .iter()
        .fold(Duration::zero(), |acc, (_, d)| acc + *d);
    assert_eq!(total, later - oldest);

    // Step lookup endpoints.
    assert_eq!(
        sample_at_fraction(monitor.history(), later, 0.0),
        monitor.history().first().copied()
    );
    assert_eq!(
        sample_at_fraction(monitor.history(), later, 1.0),
        monitor.history().last().copied()
    );
}

#[test]
fn throttle_and_recovery_events_end_to_end() {
    let pressures = vec![
        Some(PressureLevel::Nominal),
        Some(PressureLevel::Heavy),
        Some(PressureLevel::Trapping),
        Some(PressureLevel::Trapping),
        Some(PressureLevel::Nominal),
    ];
    let sources = MonitorSources {
        pressure: Box::new(ScriptedPressure(pressures.into())),
        temperature_primary: None,
        temperature_fallback: None,
        fan: None,
    };
    let config = MonitorConfig {
        retention: Duration::seconds(3600),
        toggles: NotificationToggles {
            notify_on_heavy: true,
            notify_on_critical: true,
            notify_on_recovery: true,
            sound_enabled: false,
        },
    };
    let mut monitor = ThermalMonitor::new(sources, config);

    let kinds: Vec<Option<NotificationKind>> = (0..5)
        .map(|i| {
            monitor
                .tick(base() + Duration::seconds(i * 2))
                .map(|e| e.kind)
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            None,
            Some(NotificationKind::ThrottleHeavy),
            Some(NotificationKind::ThrottleCritical),
            None,
            Some(NotificationKind::Recovery),
        ]
    );
}

#[test]
fn snapshot_round_trips_through_json() {
    let sources = MonitorSources {
        pressure: Box::new(ScriptedPressure(
            vec![Some(PressureLevel::Moderate)].into(),
        )),
        temperature_primary: Some(Box::new(ScriptedTemperature(vec![Some(61.5)].into()))),
        temperature_fallback: None,
        fan: Some(Box::new(ScriptedFan(vec![Some(42.0)].into()))),
    };
    let mut monitor = ThermalMonitor::new(sources, MonitorConfig::default());
    monitor.tick(base());

    let snapshot = monitor.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: thermwatch::MonitorSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.pressure, Some(PressureLevel::Moderate));
    assert_eq!(parsed.temperature_celsius, Some(61.5));
    assert_eq!(parsed.fan_percent, Some(42.0));
    assert_eq!(parsed.history.len(), 1);
}
