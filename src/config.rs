//! System configuration parameters
//!
//! Console addressing, channel identifiers and every timing constant the
//! controller uses. Values are fixed at build time: the defaults below,
//! optionally overlaid by a `TALKBACK_CONFIG` JSON document.

use std::net::{Ipv4Addr, SocketAddrV4};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Subscriptions on the console lapse after this long without renewal.
pub const CONSOLE_SUBSCRIPTION_EXPIRY_MS: u32 = 10_000;

/// Build-time JSON overlay, if any.
const CONFIG_OVERRIDE: Option<&str> = option_env!("TALKBACK_CONFIG");

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkbackConfig {
    // --- Console ---
    /// IPv4 address of the mixing console
    pub console_addr: Ipv4Addr,
    /// Console control port
    pub console_port: u16,
    /// Local UDP port the session binds (0 = ephemeral)
    pub local_port: u16,
    /// Input channel carrying the host microphone (1-32)
    pub mic_channel: u8,
    /// Aux-in carrying the talkback microphone (1-8)
    pub talkback_auxin: u8,

    // --- Subscription ---
    /// Interval between subscription renewals (milliseconds)
    pub subscription_renew_ms: u32,
    /// Renotification cadence code sent with each subscribe
    pub subscription_cadence: i32,

    // --- Button ---
    /// Fallback level poll interval (milliseconds)
    pub button_poll_ms: u32,
    /// Button pulls the line low when pressed
    pub button_active_low: bool,
    /// Delay from power-on until test/normal mode is chosen (milliseconds)
    pub boot_decision_ms: u32,

    // --- Test mode ---
    /// How long each blink keeps the LED lit (milliseconds)
    pub blink_on_ms: u32,
    /// Dark gap between start-up blinks (milliseconds)
    pub blink_gap_ms: u32,
    /// Number of blinks announcing test mode
    pub test_blink_count: u8,
    /// Period of the reminder blink once test mode is running (milliseconds)
    pub test_reminder_ms: u32,

    // --- WiFi ---
    pub wifi_ssid: String,
    pub wifi_password: String,
}

impl Default for TalkbackConfig {
    fn default() -> Self {
        Self {
            // Console
            console_addr: Ipv4Addr::new(172, 30, 10, 35),
            console_port: 10023,
            local_port: 54263,
            mic_channel: 4,
            talkback_auxin: 1,

            // Subscription
            subscription_renew_ms: CONSOLE_SUBSCRIPTION_EXPIRY_MS,
            subscription_cadence: 3,

            // Button
            button_poll_ms: 100,
            button_active_low: true,
            boot_decision_ms: 500,

            // Test mode
            blink_on_ms: 100,
            blink_gap_ms: 100,
            test_blink_count: 4,
            test_reminder_ms: 3000,

            // WiFi
            wifi_ssid: option_env!("TALKBACK_WIFI_SSID").unwrap_or_default().into(),
            wifi_password: option_env!("TALKBACK_WIFI_PASSWORD").unwrap_or_default().into(),
        }
    }
}

impl TalkbackConfig {
    /// Defaults overlaid with the build-time `TALKBACK_CONFIG` document.
    pub fn load() -> Result<Self> {
        let config = match CONFIG_OVERRIDE {
            Some(json) => Self::from_json(json)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a (possibly partial) JSON document; missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            log::error!("config: {}", e);
            Error::Config("TALKBACK_CONFIG is not valid JSON for TalkbackConfig")
        })
    }

    /// Reject values the controller cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.console_port == 0 {
            return Err(Error::Config("console_port must be non-zero"));
        }
        if !(1..=32).contains(&self.mic_channel) {
            return Err(Error::Config("mic_channel must be 1-32"));
        }
        if !(1..=8).contains(&self.talkback_auxin) {
            return Err(Error::Config("talkback_auxin must be 1-8"));
        }
        if self.subscription_renew_ms == 0
            || self.subscription_renew_ms > CONSOLE_SUBSCRIPTION_EXPIRY_MS
        {
            return Err(Error::Config(
                "subscription_renew_ms must be within the console expiry window",
            ));
        }
        if self.button_poll_ms == 0 {
            return Err(Error::Config("button_poll_ms must be non-zero"));
        }
        if self.blink_on_ms == 0 || self.test_reminder_ms <= self.blink_on_ms {
            return Err(Error::Config("test reminder must outlast a blink"));
        }
        Ok(())
    }

    /// Console control endpoint.
    pub fn console_endpoint(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.console_addr, self.console_port)
    }

    /// Local bind address for the session socket.
    pub fn local_endpoint(&self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.local_port)
    }
}
