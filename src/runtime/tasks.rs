//! Runtime tasks: button, LED output and console receive.
//!
//! Each task is a plain `async fn` spawned on the local executor. They
//! only talk to the control loop through the channels in
//! [`channels`](super::channels).

use core::time::Duration;
use std::time::Instant;

use async_io_mini::Timer;
use futures_lite::future;
use log::{debug, warn};

use crate::app::commands::Input;
use crate::app::ports::{ButtonInput, LedOutput};
use crate::console::link::RECV_BUF_SIZE;
use crate::drivers::button::Debouncer;
use crate::error::Error;

use super::channels::{Inbox, LedRequests, LinkSignal};

/// Pause after a failed receive before trying again.
const RECV_RETRY_MS: u64 = 100;

/// Button task: edge waits raced against the fixed-cadence level poll.
pub async fn button_task<B: ButtonInput>(
    mut button: B,
    poll_ms: u64,
    active_low: bool,
    inbox: &Inbox,
) {
    let mut debouncer = Debouncer::new(active_low);
    if let Some(event) = debouncer.ready() {
        inbox.send(Input::Button(event)).await;
    }

    let period = Duration::from_millis(poll_ms);
    let mut next_poll = Instant::now();

    loop {
        let now = Instant::now();
        let event = if now >= next_poll {
            next_poll += period;
            if next_poll <= now {
                next_poll = now + period;
            }
            debouncer.on_poll(button.read_level())
        } else {
            let until_poll = next_poll - now;
            let edge = future::or(async { Some(button.next_edge().await) }, async {
                Timer::after(until_poll).await;
                None
            })
            .await;
            match edge {
                Some(Ok(edge)) => debouncer.on_edge(edge),
                Some(Err(e)) => {
                    // Fall back to the poll rather than spinning on the error.
                    warn!("button: {}", e);
                    Timer::after(next_poll.saturating_duration_since(Instant::now())).await;
                    None
                }
                None => None,
            }
        };

        if let Some(event) = event {
            inbox.send(Input::Button(event)).await;
        }
    }
}

/// LED task: one pin write per request, completion reported back.
pub async fn led_task<L: LedOutput>(mut led: L, requests: &LedRequests, inbox: &Inbox) {
    loop {
        let level = requests.receive().await;
        let result = led.write(level);
        inbox.send(Input::LedWritten { level, result }).await;
    }
}

/// Console receive task: idle until the link opens, then decode forever.
pub async fn console_rx_task(link_ready: &LinkSignal, inbox: &Inbox) {
    let link = link_ready.wait().await;
    let mut buf = [0u8; RECV_BUF_SIZE];
    loop {
        match link.recv(&mut buf).await {
            Ok(msg) => inbox.send(Input::Inbound(msg)).await,
            Err(Error::Osc(e)) => debug!("console: dropping datagram: {}", e),
            Err(e) => {
                warn!("console: {}", e);
                Timer::after(Duration::from_millis(RECV_RETRY_MS)).await;
            }
        }
    }
}
