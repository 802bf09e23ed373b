//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceController (domain)
//! ```
//!
//! Two families live here. The controller-facing ports (`LedPort`,
//! `ConsolePort`, `EventSink`) are synchronous requests the controller
//! issues while handling an input; the runtime executes them afterwards.
//! The device-facing ports (`ButtonInput`, `LedOutput`, `NetworkPort`)
//! are what hardware adapters implement for the runtime's tasks.

use rosc::OscMessage;

use crate::drivers::button::{Edge, Level};
use crate::error::{GpioError, NetError};

// ───────────────────────────────────────────────────────────────
// Controller-facing ports
// ───────────────────────────────────────────────────────────────

/// Write-side LED port. At most one request is outstanding at a time;
/// its outcome comes back as [`Input::LedWritten`](super::commands::Input).
pub trait LedPort {
    fn request_led(&mut self, level: Level);
}

/// Console transport port.
pub trait ConsolePort {
    /// Bring the network up and bind the session socket. The outcome comes
    /// back as `Input::SessionOpened` or `Input::SessionFailed`.
    fn open_session(&mut self);

    /// Queue one message for the console.
    fn send(&mut self, msg: OscMessage);
}

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Device-facing ports
// ───────────────────────────────────────────────────────────────

/// Edge-capable digital input.
#[allow(async_fn_in_trait)]
pub trait ButtonInput {
    /// Resolve on the next transition of the line. Inputs without
    /// interrupt support never resolve.
    async fn next_edge(&mut self) -> Result<Edge, GpioError>;

    /// Read the current level.
    fn read_level(&mut self) -> Result<Level, GpioError>;
}

/// Digital output driving the status LED.
pub trait LedOutput {
    fn write(&mut self, level: Level) -> Result<(), GpioError>;
}

/// Network link the console session rides on.
pub trait NetworkPort {
    /// Make the network usable. Called when normal mode opens the session
    /// and again before each reopen attempt.
    fn bring_up(&mut self) -> Result<(), NetError>;
}
