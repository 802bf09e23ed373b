//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (the ESP-IDF UART console in production, stderr on host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::button::ButtonEvent;

/// Adapter that logs every [`AppEvent`] as one tagged line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("MODE | booting"),
            AppEvent::ModeEntered(mode) => info!("MODE | {}", mode.name()),
            AppEvent::TestPatternDone => info!("MODE | test pattern done, button live"),
            AppEvent::Button(ButtonEvent::Ready) => info!("BUTTON | ready"),
            AppEvent::Button(ButtonEvent::Press) => info!("BUTTON | pressed"),
            AppEvent::Button(ButtonEvent::Release) => info!("BUTTON | released"),
            AppEvent::TalkbackEngaged { mic_already_muted } => {
                info!(
                    "CONSOLE | talkback on, mic muted (was already muted: {})",
                    mic_already_muted
                );
            }
            AppEvent::TalkbackReleased { mic_restored } => {
                info!(
                    "CONSOLE | talkback off, mic {}",
                    if *mic_restored { "restored" } else { "left muted" }
                );
            }
            AppEvent::ConsoleState(s) => {
                info!(
                    "CONSOLE | host mic={} talkback={}",
                    on_off(s.host_mic_on),
                    on_off(s.host_talkback_on)
                );
            }
            AppEvent::LedChanged { on } => info!("LED | {}", on_off(*on)),
            AppEvent::SessionOpened => info!("SESSION | open"),
            AppEvent::SessionFailed => warn!("SESSION | open failed"),
            AppEvent::SubscriptionsRenewed => info!("SESSION | subscriptions renewed"),
        }
    }
}
