//! Notification policy for pressure transitions.
//!
//! Maps a (previous, current) pressure transition plus the user's toggles to
//! at most one notification event. Delivery mechanics live behind
//! [`NotificationSink`]; the policy only decides when and what.

use log::info;

use crate::error::Result;

use super::types::{NotificationEvent, NotificationKind, NotificationToggles, PressureLevel};

/// Decide whether a pressure transition warrants a notification.
///
/// Rules are evaluated in order; at most one event fires per transition and
/// nothing fires when the level did not change.
pub fn decide(
    previous: PressureLevel,
    current: PressureLevel,
    toggles: &NotificationToggles,
) -> Option<NotificationEvent> {
    if previous == current {
        return None;
    }

    // Entering Heavy from a non-throttling level.
    if current == PressureLevel::Heavy && toggles.notify_on_heavy && !previous.is_throttling() {
        return Some(NotificationEvent {
            kind: NotificationKind::ThrottleHeavy,
            level: current,
        });
    }

    // Entering the critical tier, including escalation from Heavy.
    let critical = matches!(current, PressureLevel::Trapping | PressureLevel::Sleeping);
    let was_critical = matches!(previous, PressureLevel::Trapping | PressureLevel::Sleeping);
    if critical && toggles.notify_on_critical && !was_critical {
        return Some(NotificationEvent {
            kind: NotificationKind::ThrottleCritical,
            level: current,
        });
    }

    // Any drop out of throttling counts as recovery, but never into Unknown.
    if previous.is_throttling()
        && !current.is_throttling()
        && current != PressureLevel::Unknown
        && toggles.notify_on_recovery
    {
        return Some(NotificationEvent {
            kind: NotificationKind::Recovery,
            level: current,
        });
    }

    None
}

/// Human-facing title and body for an event.
pub fn render(event: &NotificationEvent) -> (String, String) {
    match event.kind {
        NotificationKind::ThrottleHeavy => (
            "Thermal Throttling".to_string(),
            "Your machine is being throttled (Heavy pressure)".to_string(),
        ),
        NotificationKind::ThrottleCritical => (
            "Thermal Throttling".to_string(),
            "Your machine is severely throttled!".to_string(),
        ),
        NotificationKind::Recovery => (
            "Thermal Pressure Recovered".to_string(),
            "Your machine is no longer being throttled".to_string(),
        ),
    }
}

/// Notification delivery seam.
///
/// Implementations render to the desktop, a terminal, or anywhere else.
/// Delivery failures are surfaced once by the runtime, never retried per
/// tick.
pub trait NotificationSink: Send {
    fn deliver(&mut self, title: &str, body: &str, play_sound: bool) -> Result<()>;
}

/// Default sink: writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&mut self, title: &str, body: &str, _play_sound: bool) -> Result<()> {
        info!("{title}: {body}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on() -> NotificationToggles {
        NotificationToggles {
            notify_on_heavy: true,
            notify_on_critical: true,
            notify_on_recovery: true,
            sound_enabled: false,
        }
    }

    #[test]
    fn heavy_fires_once_from_nominal() {
        let t = all_on();
        let event = decide(PressureLevel::Nominal, PressureLevel::Heavy, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::ThrottleHeavy);
        assert_eq!(event.level, PressureLevel::Heavy);
    }

    #[test]
    fn holding_at_heavy_fires_nothing() {
        let t = all_on();
        assert_eq!(decide(PressureLevel::Heavy, PressureLevel::Heavy, &t), None);
        assert_eq!(
            decide(PressureLevel::Nominal, PressureLevel::Nominal, &t),
            None
        );
    }

    #[test]
    fn escalation_to_critical_still_notifies() {
        let t = all_on();
        let event = decide(PressureLevel::Heavy, PressureLevel::Trapping, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::ThrottleCritical);

        // But critical-to-critical does not.
        assert_eq!(
            decide(PressureLevel::Trapping, PressureLevel::Sleeping, &t),
            None
        );
    }

    #[test]
    fn recovery_on_any_drop_out_of_throttling() {
        let t = all_on();
        let event = decide(PressureLevel::Heavy, PressureLevel::Nominal, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::Recovery);

        // Trapping straight to Nominal, bypassing Moderate, is still recovery.
        let event = decide(PressureLevel::Trapping, PressureLevel::Nominal, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::Recovery);

        let event = decide(PressureLevel::Sleeping, PressureLevel::Moderate, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::Recovery);
    }

    #[test]
    fn recovery_never_fires_into_unknown() {
        let t = all_on();
        assert_eq!(
            decide(PressureLevel::Heavy, PressureLevel::Unknown, &t),
            None
        );
    }

    #[test]
    fn toggles_gate_each_rule() {
        let mut t = all_on();
        t.notify_on_heavy = false;
        assert_eq!(decide(PressureLevel::Nominal, PressureLevel::Heavy, &t), None);

        let mut t = all_on();
        t.notify_on_critical = false;
        assert_eq!(
            decide(PressureLevel::Heavy, PressureLevel::Trapping, &t),
            None
        );

        let mut t = all_on();
        t.notify_on_recovery = false;
        assert_eq!(
            decide(PressureLevel::Heavy, PressureLevel::Nominal, &t),
            None
        );
    }

    #[test]
    fn heavy_from_within_throttling_is_silent() {
        let t = all_on();
        // Trapping -> Heavy is a de-escalation inside throttling, not an alert.
        assert_eq!(
            decide(PressureLevel::Trapping, PressureLevel::Heavy, &t),
            None
        );
    }

    #[test]
    fn moderate_transitions_are_silent() {
        let t = all_on();
        assert_eq!(
            decide(PressureLevel::Nominal, PressureLevel::Moderate, &t),
            None
        );
        assert_eq!(
            decide(PressureLevel::Moderate, PressureLevel::Nominal, &t),
            None
        );
    }

    #[test]
    fn critical_from_unknown_fires() {
        let t = all_on();
        let event = decide(PressureLevel::Unknown, PressureLevel::Sleeping, &t).unwrap();
        assert_eq!(event.kind, NotificationKind::ThrottleCritical);
    }
}
