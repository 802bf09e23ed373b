//! Device controller: the hexagonal core.
//!
//! [`DeviceController`] owns the mode machine, the shared device state, the
//! console session and (in test mode) the blink pattern. It is synchronous
//! and clocked by the caller: every entry point takes `now_ms`, and all I/O
//! leaves through port traits injected at call sites, so the whole
//! controller is testable with recording mocks.
//!
//! ```text
//!  Input ──▶ ┌──────────────────────────────┐ ──▶ LedPort
//!            │       DeviceController       │ ──▶ ConsolePort
//!  poll  ──▶ │ Mode · State · Session · Blink│ ──▶ EventSink
//!            └──────────────────────────────┘
//! ```

use log::{debug, info, warn};
use rosc::OscMessage;

use crate::config::TalkbackConfig;
use crate::console::session::{ConsoleSession, ConsoleUpdate};
use crate::drivers::button::ButtonEvent;
use crate::drivers::led_patterns::{BlinkStep, BlinkTiming, TestPattern};
use crate::error::{NetError, Result};
use crate::fsm::context::DeviceState;
use crate::fsm::{DeviceMode, ModeMachine};

use super::commands::Input;
use super::events::AppEvent;
use super::ports::{ConsolePort, EventSink, LedPort};

// ───────────────────────────────────────────────────────────────
// DeviceController
// ───────────────────────────────────────────────────────────────

pub struct DeviceController {
    mode: ModeMachine,
    state: DeviceState,
    session: ConsoleSession,
    pattern: Option<TestPattern>,

    timing: BlinkTiming,
    test_blink_count: u8,
    boot_decision_ms: u64,
    reopen_delay_ms: u64,

    boot_deadline_ms: Option<u64>,
    reopen_at_ms: Option<u64>,
}

impl DeviceController {
    /// Construct the controller from a validated configuration.
    ///
    /// Does **not** start it; call [`start`](Self::start) next.
    pub fn new(config: &TalkbackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: ModeMachine::new(),
            state: DeviceState::new(),
            session: ConsoleSession::new(config),
            pattern: None,
            timing: BlinkTiming {
                on_ms: u64::from(config.blink_on_ms),
                gap_ms: u64::from(config.blink_gap_ms),
                reminder_ms: u64::from(config.test_reminder_ms),
            },
            test_blink_count: config.test_blink_count,
            boot_decision_ms: u64::from(config.boot_decision_ms),
            reopen_delay_ms: u64::from(config.subscription_renew_ms),
            boot_deadline_ms: None,
            reopen_at_ms: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force the LED dark and arm the boot decision.
    pub fn start(&mut self, now_ms: u64, io: &mut impl LedPort, sink: &mut impl EventSink) {
        self.mode = ModeMachine::new();
        if let Some(level) = self.state.led.off() {
            io.request_led(level);
        }
        self.boot_deadline_ms = Some(now_ms + self.boot_decision_ms);
        sink.emit(&AppEvent::Started);
        info!(
            "controller started, boot decision in {} ms",
            self.boot_decision_ms
        );
    }

    /// Handle one external input.
    pub fn handle(
        &mut self,
        input: Input,
        now_ms: u64,
        io: &mut (impl LedPort + ConsolePort),
        sink: &mut impl EventSink,
    ) {
        match input {
            Input::Button(event) => self.on_button(event, io, sink),
            Input::LedWritten { level, result } => {
                let ok = result.is_ok();
                self.state.led.complete(level, result);
                if ok {
                    sink.emit(&AppEvent::LedChanged {
                        on: level.is_high(),
                    });
                }
                if self.state.led_check_pending && !self.state.test_mode {
                    self.state.led_check_pending = false;
                    self.check_led(io);
                }
            }
            Input::SessionOpened => {
                for msg in self.session.on_open(now_ms) {
                    io.send(msg);
                }
                sink.emit(&AppEvent::SessionOpened);
                info!("session: open, subscribed");
            }
            Input::SessionFailed(e) => self.on_session_failed(e, now_ms, sink),
            Input::Inbound(msg) => {
                let Some(update) = self.session.decode(&msg) else {
                    return;
                };
                match update {
                    ConsoleUpdate::HostMic(on) => self.state.console.host_mic_on = on,
                    ConsoleUpdate::HostTalkback(on) => self.state.console.host_talkback_on = on,
                }
                sink.emit(&AppEvent::ConsoleState(self.state.console));
                if !self.state.test_mode {
                    self.check_led(io);
                }
            }
        }
    }

    /// Run whatever is due at `now_ms`: the boot decision, test-mode blink
    /// steps, subscription renewal, and a pending session reopen.
    pub fn poll(
        &mut self,
        now_ms: u64,
        io: &mut (impl LedPort + ConsolePort),
        sink: &mut impl EventSink,
    ) {
        if self.boot_deadline_ms.is_some_and(|d| now_ms >= d) {
            self.boot_deadline_ms = None;
            self.decide_mode(now_ms, io, sink);
        }

        self.step_pattern(now_ms, io, sink);

        if let Some(subs) = self.session.poll(now_ms) {
            for msg in subs {
                io.send(msg);
            }
            sink.emit(&AppEvent::SubscriptionsRenewed);
            debug!("session: subscriptions renewed");
        }

        if self.reopen_at_ms.is_some_and(|t| now_ms >= t) {
            self.reopen_at_ms = None;
            info!("session: retrying open");
            io.open_session();
        }
    }

    /// Earliest time [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.boot_deadline_ms,
            self.pattern.as_ref().map(TestPattern::next_deadline),
            self.session.next_deadline(),
            self.reopen_at_ms,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> DeviceMode {
        self.mode.current()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    // ── Internal ──────────────────────────────────────────────

    fn decide_mode(&mut self, now_ms: u64, io: &mut impl ConsolePort, sink: &mut impl EventSink) {
        let next = if self.state.button_pressed {
            DeviceMode::TestMode
        } else {
            DeviceMode::NormalMode
        };
        if !self.mode.decide(next) {
            return;
        }
        sink.emit(&AppEvent::ModeEntered(next));

        match next {
            DeviceMode::TestMode => {
                self.state.test_mode = true;
                self.pattern = Some(TestPattern::start(
                    now_ms,
                    self.timing,
                    self.test_blink_count,
                ));
            }
            DeviceMode::NormalMode => {
                io.open_session();
                self.state.initialized = true;
            }
            DeviceMode::Booting => {}
        }
    }

    fn step_pattern(&mut self, now_ms: u64, io: &mut impl LedPort, sink: &mut impl EventSink) {
        let Some(pattern) = self.pattern.as_mut() else {
            return;
        };
        while pattern.next_deadline() <= now_ms {
            let step = pattern.poll(now_ms, self.state.button_pressed);
            let request = match step {
                Some(BlinkStep::Light) => self.state.led.on(),
                Some(BlinkStep::Darken) => self.state.led.off(),
                None => None,
            };
            if let Some(level) = request {
                io.request_led(level);
            }
        }
        if !self.state.initialized && pattern.startup_done() {
            self.state.initialized = true;
            sink.emit(&AppEvent::TestPatternDone);
            info!("test mode: start-up pattern done");
        }
    }

    fn on_button(
        &mut self,
        event: ButtonEvent,
        io: &mut (impl LedPort + ConsolePort),
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Button(event));
        match event {
            ButtonEvent::Ready => return,
            ButtonEvent::Press => self.state.button_pressed = true,
            ButtonEvent::Release => self.state.button_pressed = false,
        }
        if !self.state.initialized {
            debug!("button: {:?} before initialization, recorded only", event);
            return;
        }

        let pressed = event == ButtonEvent::Press;
        if self.state.test_mode {
            let request = if pressed {
                self.state.led.on()
            } else {
                self.state.led.off()
            };
            if let Some(level) = request {
                io.request_led(level);
            }
            return;
        }

        if pressed {
            self.state.host_mic_already_muted = !self.state.console.host_mic_on;
            self.send(io, self.session.mic_mix_on(false).clone());
            self.send(io, self.session.talkback_mix_on(true).clone());
            sink.emit(&AppEvent::TalkbackEngaged {
                mic_already_muted: self.state.host_mic_already_muted,
            });
        } else {
            let restore_mic = !self.state.host_mic_already_muted;
            if restore_mic {
                self.send(io, self.session.mic_mix_on(true).clone());
            }
            self.send(io, self.session.talkback_mix_on(false).clone());
            sink.emit(&AppEvent::TalkbackReleased {
                mic_restored: restore_mic,
            });
        }
    }

    /// LED policy: lit exactly while the console has the mic muted and
    /// talkback live.
    fn check_led(&mut self, io: &mut impl LedPort) {
        if self.state.writing_to_led() {
            self.state.led_check_pending = true;
            return;
        }
        let request = if self.state.console.alarm() {
            self.state.led.on()
        } else if self.state.led_on() {
            self.state.led.off()
        } else {
            None
        };
        if let Some(level) = request {
            io.request_led(level);
        }
    }

    fn on_session_failed(&mut self, e: NetError, now_ms: u64, sink: &mut impl EventSink) {
        warn!(
            "session: open failed ({}), retrying in {} ms",
            e, self.reopen_delay_ms
        );
        self.reopen_at_ms = Some(now_ms + self.reopen_delay_ms);
        sink.emit(&AppEvent::SessionFailed);
    }

    fn send(&self, io: &mut impl ConsolePort, msg: OscMessage) {
        if !self.session.is_open() {
            warn!("session: not open, dropping {}", msg.addr);
            return;
        }
        io.send(msg);
    }
}
