//! Notification policy behavior across transition sequences.

use thermwatch::{decide, NotificationKind, NotificationToggles, PressureLevel};

fn all_on() -> NotificationToggles {
    NotificationToggles {
        notify_on_heavy: true,
        notify_on_critical: true,
        notify_on_recovery: true,
        sound_enabled: false,
    }
}

/// Replays a pressure trace through the policy the way the monitor does:
/// decide on change, then advance previous.
fn replay(trace: &[PressureLevel], toggles: &NotificationToggles) -> Vec<NotificationKind> {
    let mut previous = PressureLevel::Unknown;
    let mut fired = Vec::new();
    for &current in trace {
        if current != previous {
            if let Some(event) = decide(previous, current, toggles) {
                fired.push(event.kind);
            }
            previous = current;
        }
    }
    fired
}

#[test]
fn heat_spike_fires_heavy_then_critical_then_recovery() {
    let trace = [
        PressureLevel::Nominal,
        PressureLevel::Moderate,
        PressureLevel::Heavy,
        PressureLevel::Heavy,
        PressureLevel::Trapping,
        PressureLevel::Heavy,
        PressureLevel::Nominal,
    ];
    assert_eq!(
        replay(&trace, &all_on()),
        vec![
            NotificationKind::ThrottleHeavy,
            NotificationKind::ThrottleCritical,
            NotificationKind::Recovery,
        ]
    );
}

#[test]
fn flapping_at_heavy_fires_each_entry_not_each_tick() {
    let trace = [
        PressureLevel::Nominal,
        PressureLevel::Heavy,
        PressureLevel::Heavy,
        PressureLevel::Heavy,
        PressureLevel::Nominal,
        PressureLevel::Heavy,
    ];
    assert_eq!(
        replay(&trace, &all_on()),
        vec![
            NotificationKind::ThrottleHeavy,
            NotificationKind::Recovery,
            NotificationKind::ThrottleHeavy,
        ]
    );
}

#[test]
fn defaults_suppress_recovery() {
    let trace = [
        PressureLevel::Nominal,
        PressureLevel::Heavy,
        PressureLevel::Nominal,
    ];
    assert_eq!(
        replay(&trace, &NotificationToggles::default()),
        vec![NotificationKind::ThrottleHeavy]
    );
}

#[test]
fn all_toggles_off_is_silent() {
    let toggles = NotificationToggles {
        notify_on_heavy: false,
        notify_on_critical: false,
        notify_on_recovery: false,
        sound_enabled: false,
    };
    let trace = [
        PressureLevel::Nominal,
        PressureLevel::Heavy,
        PressureLevel::Sleeping,
        PressureLevel::Nominal,
    ];
    assert!(replay(&trace, &toggles).is_empty());
}

#[test]
fn sensor_dropout_during_throttling_is_not_recovery() {
    // Heavy -> Unknown (pressure source died) must not read as recovery,
    // and Unknown -> Heavy re-fires since previous was not throttling.
    let trace = [
        PressureLevel::Nominal,
        PressureLevel::Heavy,
        PressureLevel::Unknown,
        PressureLevel::Heavy,
    ];
    assert_eq!(
        replay(&trace, &all_on()),
        vec![NotificationKind::ThrottleHeavy, NotificationKind::ThrottleHeavy]
    );
}

#[test]
fn critical_tier_is_one_tier() {
    let t = all_on();
    // Moving between Trapping and Sleeping is not a new event.
    assert!(decide(PressureLevel::Trapping, PressureLevel::Sleeping, &t).is_none());
    assert!(decide(PressureLevel::Sleeping, PressureLevel::Trapping, &t).is_none());
}
