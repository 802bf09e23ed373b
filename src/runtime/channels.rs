//! Inter-task channels for the runtime.
//!
//! Everything runs on one thread, so the channels use `NoopRawMutex` and
//! live on the `serve` stack frame rather than in statics.
//!
//! ```text
//! ┌─────────────┐   Input    ┌──────────────┐   Level   ┌──────────┐
//! │ button task │──────────▶│              │─────────▶│ led task │
//! │ rx task     │──────────▶│ control loop │◀─────────│          │
//! └─────────────┘           └──────────────┘ LedWritten └──────────┘
//!        ▲                         │
//!        └──── LinkSignal ─────────┘
//! ```

use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::app::commands::Input;
use crate::console::link::UdpLink;
use crate::drivers::button::Level;

/// Channel depth for inputs to the control loop.
pub const INBOX_DEPTH: usize = 16;

/// Every task's inputs to the control loop.
pub type Inbox = Channel<NoopRawMutex, Input, INBOX_DEPTH>;

/// LED write requests. Depth 1: at most one write is ever outstanding.
pub type LedRequests = Channel<NoopRawMutex, Level, 1>;

/// Fired once when the console link opens.
pub type LinkSignal = Signal<NoopRawMutex, Rc<UdpLink>>;
