//! Async runtime: wires the controller to the hardware and the network.
//!
//! Single-threaded and cooperative. A `LocalExecutor` runs three I/O tasks
//! beside the control loop, all driven by the `async-io-mini` reactor
//! (timers, the UDP socket) under `futures_lite::future::block_on`.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  block_on                                                    │
//!  │  ┌────────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                          │  │
//!  │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────┐  │  │
//!  │  │  │ button   │ │ led      │ │ rx       │ │ control   │  │  │
//!  │  │  │ edge+poll│ │ 1 write  │ │ datagram │ │ loop      │  │  │
//!  │  │  └──────────┘ └──────────┘ └──────────┘ └───────────┘  │  │
//!  │  └────────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The control loop owns the [`DeviceController`]. It sleeps until either
//! an input arrives or the controller's next deadline passes, hands the
//! input to the controller, then carries out whatever the controller asked
//! for through [`PendingIo`].

pub mod channels;
pub mod tasks;

use core::time::Duration;
use std::rc::Rc;

use async_io_mini::Timer;
use edge_executor::LocalExecutor;
use futures_lite::future;
use heapless::Vec;
use log::{info, warn};
use rosc::OscMessage;

use crate::adapters::time::MonotonicClock;
use crate::app::commands::Input;
use crate::app::ports::{ButtonInput, ConsolePort, EventSink, LedOutput, LedPort, NetworkPort};
use crate::app::service::DeviceController;
use crate::config::TalkbackConfig;
use crate::console::link::UdpLink;
use crate::drivers::button::Level;
use crate::error::{NetError, Result};

use channels::{Inbox, LedRequests, LinkSignal};

/// Most messages the controller queues while handling one input.
const MAX_OUTBOUND: usize = 8;

// ───────────────────────────────────────────────────────────────
// PendingIo: what the controller asked for during one step
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct PendingIo {
    led: Option<Level>,
    open: bool,
    outbound: Vec<OscMessage, MAX_OUTBOUND>,
}

impl LedPort for PendingIo {
    fn request_led(&mut self, level: Level) {
        if let Some(prev) = self.led.replace(level) {
            warn!("runtime: LED request {:?} superseded by {:?}", prev, level);
        }
    }
}

impl ConsolePort for PendingIo {
    fn open_session(&mut self) {
        self.open = true;
    }

    fn send(&mut self, msg: OscMessage) {
        if let Err(msg) = self.outbound.push(msg) {
            warn!("runtime: outbound queue full, dropping {}", msg.addr);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Control loop
// ───────────────────────────────────────────────────────────────

struct ControlLoop<'a, N, S> {
    config: &'a TalkbackConfig,
    controller: DeviceController,
    clock: MonotonicClock,
    network: N,
    sink: S,
    io: PendingIo,
    link: Option<Rc<UdpLink>>,
    inbox: &'a Inbox,
    led_requests: &'a LedRequests,
    link_ready: &'a LinkSignal,
}

impl<N: NetworkPort, S: EventSink> ControlLoop<'_, N, S> {
    async fn run(mut self) -> Result<()> {
        let now = self.clock.now_ms();
        self.controller.start(now, &mut self.io, &mut self.sink);

        loop {
            self.flush().await;

            let now = self.clock.now_ms();
            let input = match self.controller.next_deadline() {
                Some(deadline) if deadline <= now => None,
                Some(deadline) => {
                    let wait = Duration::from_millis(deadline - now);
                    future::or(async { Some(self.inbox.receive().await) }, async {
                        Timer::after(wait).await;
                        None
                    })
                    .await
                }
                None => Some(self.inbox.receive().await),
            };

            let now = self.clock.now_ms();
            if let Some(input) = input {
                self.controller
                    .handle(input, now, &mut self.io, &mut self.sink);
            }
            self.controller.poll(now, &mut self.io, &mut self.sink);
        }
    }

    /// Carry out the controller's requests: open, then LED, then sends.
    async fn flush(&mut self) {
        if core::mem::take(&mut self.io.open) {
            let input = match self.open_link() {
                Ok(link) => {
                    self.link_ready.signal(link.clone());
                    self.link = Some(link);
                    Input::SessionOpened
                }
                Err(e) => Input::SessionFailed(e),
            };
            let now = self.clock.now_ms();
            self.controller
                .handle(input, now, &mut self.io, &mut self.sink);
        }

        if let Some(level) = self.io.led.take() {
            if self.led_requests.try_send(level).is_err() {
                warn!("runtime: LED write still queued, dropping {:?}", level);
            }
        }

        let outbound = core::mem::take(&mut self.io.outbound);
        for msg in &outbound {
            match &self.link {
                Some(link) => {
                    if let Err(e) = link.send(msg).await {
                        warn!("console: {}", e);
                    }
                }
                None => warn!("console: {}, dropping {}", NetError::NotOpen, msg.addr),
            }
        }
    }

    fn open_link(&mut self) -> core::result::Result<Rc<UdpLink>, NetError> {
        if let Some(link) = &self.link {
            return Ok(link.clone());
        }
        self.network.bring_up()?;
        Ok(Rc::new(UdpLink::open(self.config)?))
    }
}

// ───────────────────────────────────────────────────────────────
// Entry points
// ───────────────────────────────────────────────────────────────

/// Run the controller and its I/O tasks until the process ends.
///
/// Only returns early if the configuration cannot build a controller.
pub async fn serve<B, L, N, S>(
    config: &TalkbackConfig,
    button: B,
    led: L,
    network: N,
    sink: S,
) -> Result<()>
where
    B: ButtonInput,
    L: LedOutput,
    N: NetworkPort,
    S: EventSink,
{
    let controller = DeviceController::new(config)?;

    let inbox = Inbox::new();
    let led_requests = LedRequests::new();
    let link_ready = LinkSignal::new();

    let executor: LocalExecutor<'_, 8> = LocalExecutor::new();

    executor
        .spawn(tasks::button_task(
            button,
            u64::from(config.button_poll_ms),
            config.button_active_low,
            &inbox,
        ))
        .detach();
    executor
        .spawn(tasks::led_task(led, &led_requests, &inbox))
        .detach();
    executor
        .spawn(tasks::console_rx_task(&link_ready, &inbox))
        .detach();

    info!(
        "runtime: console {} mic ch {:02} talkback auxin {:02}",
        config.console_endpoint(),
        config.mic_channel,
        config.talkback_auxin
    );

    let control = ControlLoop {
        config,
        controller,
        clock: MonotonicClock::new(),
        network,
        sink,
        io: PendingIo::default(),
        link: None,
        inbox: &inbox,
        led_requests: &led_requests,
        link_ready: &link_ready,
    };
    executor.run(control.run()).await
}

/// Blocking wrapper around [`serve`] for the main thread.
pub fn run<B, L, N, S>(
    config: &TalkbackConfig,
    button: B,
    led: L,
    network: N,
    sink: S,
) -> Result<()>
where
    B: ButtonInput,
    L: LedOutput,
    N: NetworkPort,
    S: EventSink,
{
    future::block_on(serve(config, button, led, network, sink))
}
