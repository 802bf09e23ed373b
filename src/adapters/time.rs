//! Monotonic clock adapter.
//!
//! Milliseconds since the clock was created, which the controller uses as
//! its only notion of time.
//!
//! - **`target_os = "espidf"`** wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer.
//! - **`not(target_os = "espidf")`** uses `std::time::Instant` for
//!   host-side testing.

pub struct MonotonicClock {
    #[cfg(target_os = "espidf")]
    origin_us: u64,
    #[cfg(not(target_os = "espidf"))]
    origin: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        Self {
            origin_us: Self::timer_us(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    /// Milliseconds since construction.
    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u64 {
        Self::timer_us().saturating_sub(self.origin_us) / 1000
    }

    /// Milliseconds since construction.
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    #[cfg(target_os = "espidf")]
    fn timer_us() -> u64 {
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64
    }
}
