//! Device-level drivers: button debouncing, the LED write guard and the
//! test-mode blink pattern.

pub mod button;
pub mod led_patterns;
pub mod status_led;
