//! macOS pressure backend: Darwin notification state.
//!
//! The kernel publishes the current thermal pressure tier on
//! `com.apple.system.thermalpressurelevel`, the same 5-level signal
//! `powermetrics -s thermal` reports, readable without root or a helper
//! daemon. Registration happens once at construction; if it fails, every
//! read reports unavailable without re-attempting the syscall.

use std::ffi::CString;

use libc::c_char;
use log::warn;

use crate::core::thermal::{PressureLevel, PressureSource};

const PRESSURE_NOTIFY_NAME: &str = "com.apple.system.thermalpressurelevel";
const NOTIFY_STATUS_OK: u32 = 0;

extern "C" {
    fn notify_register_check(name: *const c_char, out_token: *mut i32) -> u32;
    fn notify_get_state(token: i32, state: *mut u64) -> u32;
    fn notify_cancel(token: i32) -> u32;
}

pub struct NotifyPressureSource {
    /// None when registration failed (sticky for the process lifetime).
    token: Option<i32>,
}

impl NotifyPressureSource {
    pub fn new() -> Self {
        let Ok(name) = CString::new(PRESSURE_NOTIFY_NAME) else {
            return Self { token: None };
        };

        let mut token: i32 = 0;
        let status = unsafe { notify_register_check(name.as_ptr(), &mut token) };
        if status != NOTIFY_STATUS_OK {
            warn!("thermal pressure notification registration failed (status {status})");
            return Self { token: None };
        }
        Self { token: Some(token) }
    }
}

impl Default for NotifyPressureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PressureSource for NotifyPressureSource {
    fn read_pressure(&mut self) -> Option<PressureLevel> {
        let token = self.token?;
        let mut state: u64 = 0;
        let status = unsafe { notify_get_state(token, &mut state) };
        if status != NOTIFY_STATUS_OK {
            return None;
        }
        Some(PressureLevel::from_state_code(state))
    }
}

impl Drop for NotifyPressureSource {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            unsafe {
                notify_cancel(token);
            }
        }
    }
}
