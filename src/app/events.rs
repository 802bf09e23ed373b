//! Outbound application events.
//!
//! The [`DeviceController`](super::service::DeviceController) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them (serial log, test recorder).

use crate::drivers::button::ButtonEvent;
use crate::fsm::DeviceMode;
use crate::fsm::context::ConsoleSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller started; the boot decision is pending.
    Started,

    /// The boot decision was taken.
    ModeEntered(DeviceMode),

    /// Test mode finished its start-up blinks; the button is live.
    TestPatternDone,

    /// A debounced button event was received.
    Button(ButtonEvent),

    /// Talkback engaged on press. `mic_already_muted` records whether the
    /// release will leave the mic alone.
    TalkbackEngaged { mic_already_muted: bool },

    /// Talkback released. `mic_restored` is false when the mic was left muted.
    TalkbackReleased { mic_restored: bool },

    /// The console reported a new mic/talkback state.
    ConsoleState(ConsoleSnapshot),

    /// The LED output confirmed a new level.
    LedChanged { on: bool },

    /// The console session opened and subscribed.
    SessionOpened,

    /// The session could not be opened; another attempt is scheduled.
    SessionFailed,

    /// Subscriptions were renewed.
    SubscriptionsRenewed,
}
