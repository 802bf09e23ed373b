//! UDP link to the console.
//!
//! One socket bound to the local control port, sending to the fixed
//! console endpoint. Reactor-driven through `async-io-mini`, so the
//! receive task parks without spinning. UDP has no connection to lose:
//! the link is opened once and lives for the rest of the process.

use std::net::{SocketAddr, UdpSocket};

use async_io_mini::Async;
use log::{debug, info, warn};
use rosc::decoder::decode_udp;
use rosc::{OscMessage, OscPacket, encoder};

use crate::config::TalkbackConfig;
use crate::error::{Error, NetError};

/// Receive buffer size; a common ceiling for OSC over UDP.
pub const RECV_BUF_SIZE: usize = 1536;

pub struct UdpLink {
    socket: Async<UdpSocket>,
    console: SocketAddr,
}

impl UdpLink {
    /// Bind the local endpoint.
    pub fn open(config: &TalkbackConfig) -> Result<Self, NetError> {
        let local = config.local_endpoint();
        let socket = UdpSocket::bind(local)
            .and_then(Async::new)
            .map_err(|e| {
                warn!("console: bind {} failed: {}", local, e);
                NetError::BindFailed
            })?;
        let console = SocketAddr::V4(config.console_endpoint());
        info!("console: bound {}, talking to {}", local, console);
        Ok(Self { socket, console })
    }

    /// Encode and send one message to the console.
    pub async fn send(&self, msg: &OscMessage) -> Result<(), Error> {
        let bytes = encoder::encode(&OscPacket::Message(msg.clone()))?;
        self.socket
            .send_to(&bytes, self.console)
            .await
            .map_err(|e| {
                warn!("console: send {} failed: {}", msg.addr, e);
                NetError::SendFailed
            })?;
        debug!("console: -> {} ({} bytes)", msg.addr, bytes.len());
        Ok(())
    }

    /// Wait for the next message. Bundles are skipped.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<OscMessage, Error> {
        loop {
            let (len, from) = self
                .socket
                .recv_from(buf)
                .await
                .map_err(|_| NetError::RecvFailed)?;
            match decode_udp(&buf[..len])? {
                (_, OscPacket::Message(msg)) => {
                    debug!("console: <- {} from {}", msg.addr, from);
                    return Ok(msg);
                }
                (_, OscPacket::Bundle(_)) => debug!("console: ignoring bundle from {}", from),
            }
        }
    }
}
