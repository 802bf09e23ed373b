//! Device mode state machine.
//!
//! ```text
//!            ┌──[button held at boot decision]──▶ TEST_MODE
//!  BOOTING ──┤
//!            └──[button released]───────────────▶ NORMAL_MODE
//! ```
//!
//! The branch is chosen exactly once; both targets are terminal. The
//! machine only tracks identity and enforces that single decision. The
//! entry actions (blink pattern, session open) belong to the controller.

pub mod context;

use log::{info, warn};

/// Enumeration of all device modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceMode {
    Booting = 0,
    TestMode = 1,
    NormalMode = 2,
}

impl DeviceMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Booting => "BOOTING",
            Self::TestMode => "TEST_MODE",
            Self::NormalMode => "NORMAL_MODE",
        }
    }

    /// Modes that are never left once entered.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Booting)
    }
}

pub struct ModeMachine {
    current: DeviceMode,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            current: DeviceMode::Booting,
        }
    }

    pub fn current(&self) -> DeviceMode {
        self.current
    }

    /// Leave `Booting` for `next`. Returns `false` (and changes nothing)
    /// once a terminal mode has been chosen.
    pub fn decide(&mut self, next: DeviceMode) -> bool {
        if self.current.is_terminal() || !next.is_terminal() {
            warn!(
                "mode: refusing {} -> {}",
                self.current.name(),
                next.name()
            );
            return false;
        }
        info!("mode transition: {} -> {}", self.current.name(), next.name());
        self.current = next;
        true
    }
}
