//! Inbound inputs to the device controller.
//!
//! Everything that happens outside the controller (button edges, LED
//! write completions, transport state, console datagrams) arrives as one
//! of these. The runtime delivers them one at a time; each is handled to
//! completion before the next.

use rosc::OscMessage;

use crate::drivers::button::{ButtonEvent, Level};
use crate::error::{GpioError, NetError};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Debounced button event.
    Button(ButtonEvent),

    /// The outstanding LED write finished.
    LedWritten {
        level: Level,
        result: Result<(), GpioError>,
    },

    /// The console transport is bound and ready to send.
    SessionOpened,

    /// Network bring-up or socket bind failed.
    SessionFailed(NetError),

    /// A decoded datagram from the console.
    Inbound(OscMessage),
}
