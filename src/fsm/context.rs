//! Shared device state read and written by the controller.
//!
//! `DeviceState` is the single blackboard for the talkback controller:
//! the console's last reported mute states, the button snapshot, the
//! boot gate and the LED write guard. One instance exists for the life of
//! the process, owned by [`DeviceController`](crate::app::service::DeviceController).

use crate::drivers::status_led::StatusLed;

/// Console-side state as last reported by notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSnapshot {
    /// Host mic channel is unmuted on the main mix.
    pub host_mic_on: bool,
    /// Talkback aux-in is unmuted on the main mix.
    pub host_talkback_on: bool,
}

impl ConsoleSnapshot {
    /// The console has the host mic muted while talkback is live. This is
    /// the condition the status LED shows.
    pub fn alarm(&self) -> bool {
        !self.host_mic_on && self.host_talkback_on
    }
}

pub struct DeviceState {
    // -- Mode --
    pub test_mode: bool,
    /// Boot decision (and, in test mode, the start-up burst) finished.
    /// Gates every button-triggered side effect.
    pub initialized: bool,

    // -- Console --
    pub console: ConsoleSnapshot,
    /// Snapshot of `!host_mic_on` taken at the last press.
    pub host_mic_already_muted: bool,

    // -- Button --
    pub button_pressed: bool,

    // -- LED --
    pub led: StatusLed,
    /// A policy check was skipped because a write was in flight.
    pub led_check_pending: bool,
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            test_mode: false,
            initialized: false,
            console: ConsoleSnapshot::default(),
            host_mic_already_muted: false,
            button_pressed: false,
            led: StatusLed::new(),
            led_check_pending: false,
        }
    }

    pub fn led_on(&self) -> bool {
        self.led.is_on()
    }

    pub fn writing_to_led(&self) -> bool {
        self.led.is_writing()
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}
