//! Integration tests for the DeviceController: boot decision, button
//! handling, LED policy and subscription upkeep, driven through mock ports.

use crate::mock_hw::{PortCall, Rig};

use talkback::app::events::AppEvent;
use talkback::drivers::button::Level;
use talkback::fsm::DeviceMode;

fn mix(addr: &str, v: i32) -> (String, Option<i32>) {
    (addr.to_string(), Some(v))
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn initial_led_off_is_written() {
    let rig = Rig::new();
    assert_eq!(rig.io.leds(), vec![Level::Low]);
    assert!(!rig.controller.state().led_on());
}

#[test]
fn released_at_boot_opens_session_exactly_once() {
    let mut rig = Rig::new();
    rig.advance_to(499);
    assert_eq!(rig.controller.mode(), DeviceMode::Booting);
    assert_eq!(rig.io.opens(), 0);

    rig.advance_to(500);
    assert_eq!(rig.controller.mode(), DeviceMode::NormalMode);
    assert_eq!(rig.io.opens(), 1);

    rig.advance_to(60_000);
    assert_eq!(rig.io.opens(), 1);
}

#[test]
fn held_at_boot_enters_test_mode_without_network() {
    let mut rig = Rig::new();
    rig.press();
    rig.advance_to(20_000);
    assert_eq!(rig.controller.mode(), DeviceMode::TestMode);
    assert_eq!(rig.io.opens(), 0);
    assert!(!rig.io.calls.iter().any(|c| matches!(c, PortCall::Send(_))));
    assert!(rig.sink.contains(&AppEvent::ModeEntered(DeviceMode::TestMode)));
}

#[test]
fn tap_released_before_decision_means_normal_mode() {
    let mut rig = Rig::new();
    rig.advance_to(100);
    rig.press();
    rig.advance_to(300);
    rig.release();
    rig.advance_to(500);
    assert_eq!(rig.controller.mode(), DeviceMode::NormalMode);
    // Nothing was sent for the early tap.
    assert!(rig.io.sent().is_empty());
}

// ── Subscriptions ─────────────────────────────────────────────

#[test]
fn subscriptions_on_open_then_every_ten_seconds() {
    let mut rig = Rig::normal();
    assert_eq!(rig.io.subscribes(), 2);
    let sent = rig.io.sent();
    assert_eq!(sent[0].0, "/subscribe");
    assert_eq!(sent[1].0, "/subscribe");

    rig.advance_to(10_499);
    assert_eq!(rig.io.subscribes(), 2);
    rig.advance_to(10_500);
    assert_eq!(rig.io.subscribes(), 4);
    rig.advance_to(30_500);
    assert_eq!(rig.io.subscribes(), 8);
}

#[test]
fn no_renewal_before_session_opens() {
    let mut rig = Rig::new();
    rig.advance_to(500);
    rig.advance_to(40_000);
    assert_eq!(rig.io.subscribes(), 0);
}

// ── Press / release ───────────────────────────────────────────

#[test]
fn release_leaves_already_muted_mic_alone() {
    let mut rig = Rig::normal();
    rig.console(false, false);
    rig.io.clear();

    rig.press();
    assert_eq!(
        rig.io.sent(),
        vec![mix("/ch/04/mix/on", 0), mix("/auxin/01/mix/on", 1)]
    );
    rig.io.clear();

    rig.release();
    assert_eq!(rig.io.sent(), vec![mix("/auxin/01/mix/on", 0)]);
    assert!(rig.sink.contains(&AppEvent::TalkbackReleased {
        mic_restored: false
    }));
}

#[test]
fn release_restores_open_mic() {
    let mut rig = Rig::normal();
    rig.console(true, false);
    rig.io.clear();

    rig.press();
    rig.io.clear();
    rig.release();
    assert_eq!(
        rig.io.sent(),
        vec![mix("/ch/04/mix/on", 1), mix("/auxin/01/mix/on", 0)]
    );
}

#[test]
fn mute_state_is_snapshotted_at_press() {
    let mut rig = Rig::normal();
    rig.console(true, false);
    rig.press();
    // Console echoes our own commands back while the button is held.
    rig.console(false, true);
    rig.complete_led();
    rig.io.clear();

    rig.release();
    assert_eq!(rig.io.sent()[0], mix("/ch/04/mix/on", 1));
}

#[test]
fn commands_before_session_open_are_dropped() {
    let mut rig = Rig::new();
    rig.advance_to(500);
    rig.press();
    rig.release();
    assert!(rig.io.sent().is_empty());
}

// ── LED policy ────────────────────────────────────────────────

#[test]
fn led_follows_mute_while_talkback_live() {
    let mut rig = Rig::normal();
    rig.console(false, true);
    assert_eq!(rig.led_in_flight(), Some(Level::High));
    rig.complete_led();
    assert!(rig.controller.state().led_on());

    rig.notify("/ch/04/mix/on", 1);
    assert_eq!(rig.led_in_flight(), Some(Level::Low));
    rig.complete_led();
    assert!(!rig.controller.state().led_on());
}

#[test]
fn skipped_check_reruns_after_write_completes() {
    let mut rig = Rig::normal();
    rig.console(false, true);
    assert_eq!(rig.led_in_flight(), Some(Level::High));

    // Alarm clears while the on-write is still outstanding.
    rig.notify("/auxin/01/mix/on", 0);
    assert_eq!(rig.io.leds(), vec![Level::Low, Level::High]);

    rig.complete_led();
    assert_eq!(rig.led_in_flight(), Some(Level::Low));
    rig.complete_led();
    assert!(!rig.controller.state().led_on());
}

#[test]
fn failed_write_retries_on_next_notification() {
    let mut rig = Rig::normal();
    rig.console(false, true);
    rig.fail_led();
    assert!(!rig.controller.state().led_on());

    rig.notify("/auxin/01/mix/on", 1);
    assert_eq!(rig.led_in_flight(), Some(Level::High));
}

#[test]
fn unknown_addresses_are_ignored() {
    let mut rig = Rig::normal();
    let before = rig.sink.snapshot().len();
    rig.notify("/ch/05/mix/on", 0);
    rig.notify("/auxin/02/mix/on", 1);
    assert_eq!(rig.sink.snapshot().len(), before);
    assert!(rig.led_in_flight().is_none());
}

// ── Test mode ─────────────────────────────────────────────────

#[test]
fn held_button_suppresses_startup_blinks() {
    let mut rig = Rig::new();
    rig.press();
    rig.advance_to(4_000);
    assert_eq!(rig.io.leds(), vec![Level::Low]);
    assert!(rig.controller.state().initialized);
    assert!(rig.sink.contains(&AppEvent::TestPatternDone));
}

#[test]
fn release_during_burst_lets_remaining_blinks_run() {
    let mut rig = Rig::new();
    rig.press();
    rig.advance_to(600);
    rig.release();
    assert!(!rig.controller.state().initialized);

    rig.advance_to(1_300);
    assert_eq!(
        rig.io.leds()[1..],
        [
            Level::High,
            Level::Low,
            Level::High,
            Level::Low,
            Level::High,
            Level::Low
        ]
    );
    assert!(rig.controller.state().initialized);
}

#[test]
fn reminder_blink_every_period() {
    let mut rig = Rig::new();
    rig.press();
    rig.advance_to(1_150);
    rig.release();
    let before = rig.io.leds().len();

    // Last start-up cycle began at 1100: first reminder 3 s after it ends.
    rig.advance_to(4_199);
    assert_eq!(rig.io.leds().len(), before);
    rig.advance_to(4_300);
    assert_eq!(rig.io.leds()[before..], [Level::High, Level::Low]);
    rig.advance_to(7_300);
    assert_eq!(
        rig.io.leds()[before..],
        [Level::High, Level::Low, Level::High, Level::Low]
    );
}

#[test]
fn test_mode_button_drives_led_directly() {
    let mut rig = Rig::new();
    rig.press();
    rig.advance_to(1_200);
    assert!(rig.controller.state().initialized);

    rig.release();
    assert!(rig.led_in_flight().is_none());

    rig.press();
    assert_eq!(rig.led_in_flight(), Some(Level::High));
    rig.complete_led();
    rig.release();
    assert_eq!(rig.led_in_flight(), Some(Level::Low));
}
