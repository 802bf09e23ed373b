//! Console session protocol.
//!
//! Knows the two mix-on paths the controller cares about, builds every
//! outbound message up front, and keeps the subscription renewal clock.
//! Transport is not owned here: the session hands messages to the caller,
//! who pushes them through a [`ConsolePort`](crate::app::ports::ConsolePort).
//!
//! ```text
//!  open ──▶ subscribe ×2 ──▶ +renew ──▶ subscribe ×2 ──▶ +renew ──▶ …
//! ```
//!
//! The console drops a subscription 10 s after it was registered, so the
//! renewal period is capped at that window by config validation.

use log::debug;
use rosc::{OscMessage, OscType};

use crate::config::TalkbackConfig;

/// Mix-on value for a muted channel.
pub const MIX_OFF: i32 = 0;
/// Mix-on value for an unmuted channel.
pub const MIX_ON: i32 = 1;

const SUBSCRIBE_ADDR: &str = "/subscribe";

/// A state change reported by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleUpdate {
    HostMic(bool),
    HostTalkback(bool),
}

pub struct ConsoleSession {
    mic_path: String,
    talkback_path: String,

    mic_mute: OscMessage,
    mic_unmute: OscMessage,
    talkback_live: OscMessage,
    talkback_idle: OscMessage,
    subscriptions: [OscMessage; 2],

    renew_ms: u64,
    next_renewal_ms: Option<u64>,
}

impl ConsoleSession {
    pub fn new(config: &TalkbackConfig) -> Self {
        let mic_path = mic_path(config.mic_channel);
        let talkback_path = talkback_path(config.talkback_auxin);

        let subscribe = |path: &str| OscMessage {
            addr: SUBSCRIBE_ADDR.to_string(),
            args: vec![
                OscType::String(path.to_string()),
                OscType::Int(config.subscription_cadence),
            ],
        };

        Self {
            mic_mute: mix_on(&mic_path, MIX_OFF),
            mic_unmute: mix_on(&mic_path, MIX_ON),
            talkback_live: mix_on(&talkback_path, MIX_ON),
            talkback_idle: mix_on(&talkback_path, MIX_OFF),
            subscriptions: [subscribe(&mic_path), subscribe(&talkback_path)],
            mic_path,
            talkback_path,
            renew_ms: u64::from(config.subscription_renew_ms),
            next_renewal_ms: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.next_renewal_ms.is_some()
    }

    pub fn mic_path(&self) -> &str {
        &self.mic_path
    }

    pub fn talkback_path(&self) -> &str {
        &self.talkback_path
    }

    /// The transport reported open. Returns the first subscription pair
    /// and starts the renewal clock.
    pub fn on_open(&mut self, now_ms: u64) -> [OscMessage; 2] {
        self.next_renewal_ms = Some(now_ms + self.renew_ms);
        self.subscriptions.clone()
    }

    /// Renewal pair, if one is due.
    pub fn poll(&mut self, now_ms: u64) -> Option<[OscMessage; 2]> {
        let due = self.next_renewal_ms?;
        if now_ms < due {
            return None;
        }
        // Fixed cadence; if we slept through whole periods, restart from now.
        let mut next = due + self.renew_ms;
        if next <= now_ms {
            next = now_ms + self.renew_ms;
        }
        self.next_renewal_ms = Some(next);
        Some(self.subscriptions.clone())
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.next_renewal_ms
    }

    // ── Outbound commands ─────────────────────────────────────

    pub fn mic_mix_on(&self, on: bool) -> &OscMessage {
        if on { &self.mic_unmute } else { &self.mic_mute }
    }

    pub fn talkback_mix_on(&self, on: bool) -> &OscMessage {
        if on {
            &self.talkback_live
        } else {
            &self.talkback_idle
        }
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Map a notification onto a state change. Unknown addresses, messages
    /// without an argument and argument types with no on/off reading are
    /// ignored.
    pub fn decode(&self, msg: &OscMessage) -> Option<ConsoleUpdate> {
        let update: fn(bool) -> ConsoleUpdate = if msg.addr == self.mic_path {
            ConsoleUpdate::HostMic
        } else if msg.addr == self.talkback_path {
            ConsoleUpdate::HostTalkback
        } else {
            debug!("console: ignoring {}", msg.addr);
            return None;
        };
        let Some(arg) = msg.args.first() else {
            debug!("console: {} carried no value", msg.addr);
            return None;
        };
        let Some(on) = truthy(arg) else {
            debug!("console: {} carried {:?}, not a state", msg.addr, arg);
            return None;
        };
        Some(update(on))
    }
}

/// Loose truthiness of a notification value.
fn truthy(arg: &OscType) -> Option<bool> {
    match arg {
        OscType::Int(v) => Some(*v != 0),
        OscType::Long(v) => Some(*v != 0),
        OscType::Float(v) => Some(*v != 0.0),
        OscType::Double(v) => Some(*v != 0.0),
        OscType::String(s) => Some(!s.is_empty()),
        OscType::Bool(b) => Some(*b),
        OscType::Nil => Some(false),
        _ => None,
    }
}

fn mix_on(path: &str, value: i32) -> OscMessage {
    OscMessage {
        addr: path.to_string(),
        args: vec![OscType::Int(value)],
    }
}

/// `/ch/NN/mix/on` for an input channel.
pub fn mic_path(channel: u8) -> String {
    format!("/ch/{channel:02}/mix/on")
}

/// `/auxin/NN/mix/on` for an aux input.
pub fn talkback_path(auxin: u8) -> String {
    format!("/auxin/{auxin:02}/mix/on")
}
