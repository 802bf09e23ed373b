//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to              |
//! |------------|-------------------------|--------------------------|
//! | `hardware` | LedOutput · ButtonInput | GPIO (embedded-hal, IDF) |
//! | `log_sink` | EventSink               | Serial log output        |
//! | `time`     | (clock)                 | ESP32 system timer       |
//! | `wifi`     | NetworkPort             | ESP-IDF WiFi STA / host  |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
