//! Fuzz target: inbound console datagrams
//!
//! Feeds arbitrary bytes through the same path the receive task uses:
//! `rosc` packet decoding, then the session's notification mapping. No
//! input may panic, and only the two tracked paths may produce an update.
//!
//! cargo fuzz run fuzz_osc_decode

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use rosc::OscPacket;
use rosc::decoder::decode_udp;
use talkback::config::TalkbackConfig;
use talkback::console::session::ConsoleSession;

fn session() -> &'static ConsoleSession {
    static SESSION: OnceLock<ConsoleSession> = OnceLock::new();
    SESSION.get_or_init(|| ConsoleSession::new(&TalkbackConfig::default()))
}

fuzz_target!(|data: &[u8]| {
    let Ok((_, OscPacket::Message(msg))) = decode_udp(data) else {
        return;
    };
    let s = session();
    if s.decode(&msg).is_some() {
        assert!(msg.addr == s.mic_path() || msg.addr == s.talkback_path());
        assert!(!msg.args.is_empty());
    }
});
