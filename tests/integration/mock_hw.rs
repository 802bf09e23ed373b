//! Mock ports and pins for integration tests.
//!
//! Records every request the controller makes so tests can assert on the
//! full command history without touching real GPIO or sockets.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use talkback::app::commands::Input;
use talkback::app::events::AppEvent;
use talkback::app::ports::{ButtonInput, ConsolePort, EventSink, LedOutput, LedPort};
use talkback::app::service::DeviceController;
use talkback::config::TalkbackConfig;
use talkback::drivers::button::{ButtonEvent, Edge, Level};
use talkback::error::GpioError;

use rosc::{OscMessage, OscType};

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Led(Level),
    Open,
    Send(OscMessage),
}

/// `address` carrying a single int, the shape of every mix-on message.
pub fn int_message(address: &str, value: i32) -> OscMessage {
    OscMessage {
        addr: address.to_string(),
        args: vec![OscType::Int(value)],
    }
}

fn int_arg(msg: &OscMessage) -> Option<i32> {
    match msg.args.first() {
        Some(OscType::Int(v)) => Some(*v),
        _ => None,
    }
}

// ── MockPorts ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPorts {
    pub calls: Vec<PortCall>,
    /// LED write requested but not yet reported back.
    pub led_in_flight: Option<Level>,
}

#[allow(dead_code)]
impl MockPorts {
    pub fn leds(&self) -> Vec<Level> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Led(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.calls.iter().filter(|c| **c == PortCall::Open).count()
    }

    /// Sent messages as `(address, first int arg)` pairs.
    pub fn sent(&self) -> Vec<(String, Option<i32>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Send(m) => Some((m.addr.clone(), int_arg(m))),
                _ => None,
            })
            .collect()
    }

    pub fn subscribes(&self) -> usize {
        self.sent().iter().filter(|(a, _)| a == "/subscribe").count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl LedPort for MockPorts {
    fn request_led(&mut self, level: Level) {
        assert!(
            self.led_in_flight.is_none(),
            "second LED write issued while one is in flight"
        );
        self.led_in_flight = Some(level);
        self.calls.push(PortCall::Led(level));
    }
}

impl ConsolePort for MockPorts {
    fn open_session(&mut self) {
        self.calls.push(PortCall::Open);
    }

    fn send(&mut self, msg: OscMessage) {
        self.calls.push(PortCall::Send(msg));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default, Clone)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn snapshot(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.lock().unwrap().contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(*event);
    }
}

// ── Rig: a controller driven by hand ──────────────────────────

pub struct Rig {
    pub controller: DeviceController,
    pub io: MockPorts,
    pub sink: RecordingSink,
    pub now: u64,
}

#[allow(dead_code)]
impl Rig {
    /// Started controller with the initial off-write completed.
    pub fn new() -> Self {
        Self::with_config(&TalkbackConfig::default())
    }

    pub fn with_config(config: &TalkbackConfig) -> Self {
        let mut rig = Self {
            controller: DeviceController::new(config).unwrap(),
            io: MockPorts::default(),
            sink: RecordingSink::default(),
            now: 0,
        };
        rig.controller.start(0, &mut rig.io, &mut rig.sink);
        rig.complete_led();
        rig.controller
            .handle(Input::Button(ButtonEvent::Ready), 0, &mut rig.io, &mut rig.sink);
        rig
    }

    /// Booted into normal mode with the session open.
    pub fn normal() -> Self {
        let mut rig = Self::new();
        rig.advance_to(500);
        rig.input(Input::SessionOpened);
        rig
    }

    pub fn input(&mut self, input: Input) {
        self.controller
            .handle(input, self.now, &mut self.io, &mut self.sink);
    }

    pub fn press(&mut self) {
        self.input(Input::Button(ButtonEvent::Press));
    }

    pub fn release(&mut self) {
        self.input(Input::Button(ButtonEvent::Release));
    }

    pub fn notify(&mut self, address: &str, value: i32) {
        self.input(Input::Inbound(int_message(address, value)));
    }

    pub fn console(&mut self, mic_on: bool, talkback_on: bool) {
        self.notify("/ch/04/mix/on", i32::from(mic_on));
        self.notify("/auxin/01/mix/on", i32::from(talkback_on));
    }

    /// Step through every controller deadline up to `t`, completing LED
    /// writes as they are issued.
    pub fn advance_to(&mut self, t: u64) {
        while let Some(d) = self.controller.next_deadline() {
            if d > t {
                break;
            }
            self.now = d;
            self.controller
                .poll(self.now, &mut self.io, &mut self.sink);
            self.complete_led();
        }
        self.now = t;
        self.controller
            .poll(self.now, &mut self.io, &mut self.sink);
    }

    pub fn led_in_flight(&self) -> Option<Level> {
        self.io.led_in_flight
    }

    /// Report the outstanding LED write as done.
    pub fn complete_led(&mut self) {
        self.finish_led(Ok(()));
    }

    pub fn fail_led(&mut self) {
        self.finish_led(Err(GpioError::WriteFailed));
    }

    fn finish_led(&mut self, result: Result<(), GpioError>) {
        if let Some(level) = self.io.led_in_flight.take() {
            self.input(Input::LedWritten { level, result });
        }
    }
}

// ── Shared pins for runtime tests ─────────────────────────────

/// Button whose level the test flips from another thread. No edge IRQ.
#[derive(Clone)]
pub struct SharedButton {
    pub high: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl SharedButton {
    /// Active-low button, initially `pressed` or not.
    pub fn new(pressed: bool) -> Self {
        Self {
            high: Arc::new(AtomicBool::new(!pressed)),
        }
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.high.store(!pressed, Ordering::SeqCst);
    }
}

impl ButtonInput for SharedButton {
    async fn next_edge(&mut self) -> Result<Edge, GpioError> {
        core::future::pending().await
    }

    fn read_level(&mut self) -> Result<Level, GpioError> {
        Ok(Level::from(self.high.load(Ordering::SeqCst)))
    }
}

/// LED that records every write.
#[derive(Clone, Default)]
pub struct SharedLed {
    pub writes: Arc<Mutex<Vec<Level>>>,
}

#[allow(dead_code)]
impl SharedLed {
    pub fn writes(&self) -> Vec<Level> {
        self.writes.lock().unwrap().clone()
    }
}

impl LedOutput for SharedLed {
    fn write(&mut self, level: Level) -> Result<(), GpioError> {
        self.writes.lock().unwrap().push(level);
        Ok(())
    }
}
