//! Edge-plus-poll button debouncer.
//!
//! ## Hardware
//!
//! Momentary switch, active-low by default (external or internal pull-up).
//! Two sources feed the debouncer:
//!
//! - **Edges**: falling edge means pressed, rising edge means released.
//! - **Level poll**: a fixed-cadence read that catches edges the
//!   interrupt path missed. A read error is logged and that poll cycle is
//!   dropped.
//!
//! Both sources funnel into one `pressed` flag; an event is emitted only
//! when the flag actually flips, so a held level never produces repeats.

use log::warn;

use crate::error::GpioError;

/// Logical level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Direction of an observed transition on the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Fell,
    Rose,
}

/// Clean events emitted by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Setup finished; consumers may attach.
    Ready,
    Press,
    Release,
}

pub struct Debouncer {
    pressed: bool,
    ready: bool,
    active_low: bool,
}

impl Debouncer {
    pub fn new(active_low: bool) -> Self {
        Self {
            pressed: false,
            ready: false,
            active_low,
        }
    }

    /// Mark setup complete. Yields `Ready` the first time only.
    pub fn ready(&mut self) -> Option<ButtonEvent> {
        if self.ready {
            return None;
        }
        self.ready = true;
        Some(ButtonEvent::Ready)
    }

    /// Feed an interrupt-reported edge.
    pub fn on_edge(&mut self, edge: Edge) -> Option<ButtonEvent> {
        let active = match edge {
            Edge::Fell => self.active_low,
            Edge::Rose => !self.active_low,
        };
        self.apply(active)
    }

    /// Feed the result of a periodic level read.
    pub fn on_poll(&mut self, read: Result<Level, GpioError>) -> Option<ButtonEvent> {
        match read {
            Ok(level) => {
                let active = level.is_high() != self.active_low;
                self.apply(active)
            }
            Err(e) => {
                warn!("button: {}, skipping poll", e);
                None
            }
        }
    }

    /// Current debounced state.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn apply(&mut self, active: bool) -> Option<ButtonEvent> {
        if active == self.pressed {
            return None;
        }
        self.pressed = active;
        // Transitions before `ready` are tracked but not reported.
        if !self.ready {
            return None;
        }
        Some(if active {
            ButtonEvent::Press
        } else {
            ButtonEvent::Release
        })
    }
}
