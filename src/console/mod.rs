//! Mixing console control: the session protocol and the UDP link that
//! carries it. Packets are OSC, encoded and decoded by `rosc`.

pub mod link;
pub mod session;
