//! Unified error types for the talkback firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! runtime's error handling uniform. The GPIO and network kinds are `Copy`
//! so they can ride in completion reports through the runtime channels.
//!
//! None of these ever terminate the device: hardware and transport failures
//! are logged and the affected operation becomes a no-op until the next
//! trigger retries it.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// A digital input or output could not be read or driven.
    Gpio(GpioError),
    /// The UDP transport or network bring-up failed.
    Net(NetError),
    /// A datagram could not be encoded or decoded.
    Osc(OscError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Osc(e) => write!(f, "osc: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Level read on the button input failed.
    ReadFailed,
    /// Level write on the LED output failed.
    WriteFailed,
    /// Waiting for an edge interrupt failed.
    EdgeWaitFailed,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "input read failed"),
            Self::WriteFailed => write!(f, "output write failed"),
            Self::EdgeWaitFailed => write!(f, "edge wait failed"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// The local UDP socket could not be bound.
    BindFailed,
    /// A datagram could not be sent.
    SendFailed,
    /// Receiving a datagram failed.
    RecvFailed,
    /// The session socket is not open yet.
    NotOpen,
    /// WiFi station bring-up failed.
    WifiFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "UDP bind failed"),
            Self::SendFailed => write!(f, "UDP send failed"),
            Self::RecvFailed => write!(f, "UDP receive failed"),
            Self::NotOpen => write!(f, "session not open"),
            Self::WifiFailed => write!(f, "WiFi bring-up failed"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

// ---------------------------------------------------------------------------
// OSC errors
// ---------------------------------------------------------------------------

/// A packet `rosc` could not encode or decode.
#[derive(Debug)]
pub struct OscError(pub rosc::OscError);

impl fmt::Display for OscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<rosc::OscError> for OscError {
    fn from(e: rosc::OscError) -> Self {
        Self(e)
    }
}

impl From<OscError> for Error {
    fn from(e: OscError) -> Self {
        Self::Osc(e)
    }
}

impl From<rosc::OscError> for Error {
    fn from(e: rosc::OscError) -> Self {
        Self::Osc(OscError(e))
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
