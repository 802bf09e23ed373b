//! Single-pin status LED write guard.
//!
//! The LED pin is the one shared, single-writer output. `StatusLed` keeps
//! the last confirmed level and a busy flag that is set from the moment a
//! write is requested until its completion is reported back.
//!
//! - `on()` / `off()` are idempotent: already in that state, no write.
//! - While busy, further requests are refused. Nothing is queued.
//! - A failed write clears the busy flag but leaves the remembered level
//!   untouched, so the next request retries naturally.

use log::{debug, warn};

use crate::drivers::button::Level;
use crate::error::GpioError;

pub struct StatusLed {
    on: bool,
    writing: bool,
}

impl StatusLed {
    /// Starts believing the LED is lit so that the first `off()` always
    /// reaches the pin.
    pub fn new() -> Self {
        Self {
            on: true,
            writing: false,
        }
    }

    /// Request the LED lit. Returns the level to write, if a write is due.
    pub fn on(&mut self) -> Option<Level> {
        self.request(true)
    }

    /// Request the LED dark. Returns the level to write, if a write is due.
    pub fn off(&mut self) -> Option<Level> {
        self.request(false)
    }

    /// Report the outcome of the outstanding write.
    pub fn complete(&mut self, level: Level, result: Result<(), GpioError>) {
        self.writing = false;
        match result {
            Ok(()) => self.on = level.is_high(),
            Err(e) => warn!("led: turning {} failed: {}", label(level.is_high()), e),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// A write is outstanding.
    pub fn is_writing(&self) -> bool {
        self.writing
    }

    fn request(&mut self, on: bool) -> Option<Level> {
        if self.on == on {
            return None;
        }
        if self.writing {
            debug!("led: write in flight, dropping request to turn {}", label(on));
            return None;
        }
        self.writing = true;
        Some(Level::from(on))
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

fn label(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
