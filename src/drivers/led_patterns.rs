//! Test-mode blink pattern.
//!
//! Entering test mode announces itself with a burst of short blinks, then
//! keeps reminding with one blink per reminder period for as long as the
//! device runs.
//!
//! ```text
//!  start-up burst (count = 4)                reminders
//!  ┌─┐ ┌─┐ ┌─┐ ┌─┐                           ┌─┐                ┌─┐
//!  │ │ │ │ │ │ │ │                           │ │                │ │
//! ─┘ └─┘ └─┘ └─┘ └───────── reminder ────────┘ └──── reminder ──┘ └──
//!   on gap
//! ```
//!
//! Every blink is guarded by the button: if it is held when a blink is
//! due, the blink is skipped; if it is held when the LED is due to go dark,
//! the LED is left as it is. The pattern must not fight a human who is
//! holding the button down.
//!
//! The pattern is deadline-driven: the caller polls it with the current
//! time and applies the returned step through the LED write guard.

/// Blink timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    pub on_ms: u64,
    pub gap_ms: u64,
    pub reminder_ms: u64,
}

/// LED action requested by the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkStep {
    Light,
    Darken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Dark { next_on_ms: u64 },
    Lit { cycle_start_ms: u64 },
}

pub struct TestPattern {
    timing: BlinkTiming,
    startup_left: u8,
    phase: Phase,
}

impl TestPattern {
    /// Begin the start-up burst at `now_ms`.
    pub fn start(now_ms: u64, timing: BlinkTiming, startup_blinks: u8) -> Self {
        let first = if startup_blinks == 0 {
            now_ms + timing.reminder_ms
        } else {
            now_ms
        };
        Self {
            timing,
            startup_left: startup_blinks,
            phase: Phase::Dark { next_on_ms: first },
        }
    }

    /// The start-up burst has finished.
    pub fn startup_done(&self) -> bool {
        self.startup_left == 0
    }

    /// When the pattern next needs attention.
    pub fn next_deadline(&self) -> u64 {
        match self.phase {
            Phase::Dark { next_on_ms } => next_on_ms,
            Phase::Lit { cycle_start_ms } => cycle_start_ms + self.timing.on_ms,
        }
    }

    /// Advance one step if it is due.
    pub fn poll(&mut self, now_ms: u64, button_held: bool) -> Option<BlinkStep> {
        if now_ms < self.next_deadline() {
            return None;
        }
        match self.phase {
            Phase::Dark { next_on_ms } => {
                if button_held {
                    self.finish_cycle(next_on_ms);
                    None
                } else {
                    self.phase = Phase::Lit {
                        cycle_start_ms: next_on_ms,
                    };
                    Some(BlinkStep::Light)
                }
            }
            Phase::Lit { cycle_start_ms } => {
                self.finish_cycle(cycle_start_ms);
                if button_held {
                    None
                } else {
                    Some(BlinkStep::Darken)
                }
            }
        }
    }

    fn finish_cycle(&mut self, cycle_start_ms: u64) {
        let t = self.timing;
        let next_on_ms = if self.startup_left > 0 {
            self.startup_left -= 1;
            if self.startup_left > 0 {
                cycle_start_ms + t.on_ms + t.gap_ms
            } else {
                cycle_start_ms + t.on_ms + t.reminder_ms
            }
        } else {
            cycle_start_ms + t.reminder_ms
        };
        self.phase = Phase::Dark { next_on_ms };
    }
}
