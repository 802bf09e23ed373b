//! Hardware adapters: bridge digital pins to the device-facing ports.
//!
//! | Adapter        | Implements    | Pin                              |
//! |----------------|---------------|----------------------------------|
//! | `GpioLed`      | `LedOutput`   | any `embedded_hal` `OutputPin`   |
//! | `PolledButton` | `ButtonInput` | any `embedded_hal` `InputPin`    |
//! | `EspButton`    | `ButtonInput` | ESP-IDF `PinDriver` with edge IRQ|
//!
//! This is the only module that touches pins. `PolledButton` has no
//! interrupt path, so it relies entirely on the runtime's level poll.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::warn;

use crate::app::ports::{ButtonInput, LedOutput};
use crate::drivers::button::{Edge, Level};
use crate::error::GpioError;

// ── LED ───────────────────────────────────────────────────────

pub struct GpioLed<P> {
    pin: P,
}

impl<P: OutputPin> GpioLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> LedOutput for GpioLed<P> {
    fn write(&mut self, level: Level) -> Result<(), GpioError> {
        let state = PinState::from(level.is_high());
        self.pin.set_state(state).map_err(|e| {
            warn!("led pin: {:?}", e);
            GpioError::WriteFailed
        })
    }
}

// ── Button (poll only) ────────────────────────────────────────

pub struct PolledButton<P> {
    pin: P,
}

impl<P: InputPin> PolledButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ButtonInput for PolledButton<P> {
    async fn next_edge(&mut self) -> Result<Edge, GpioError> {
        core::future::pending().await
    }

    fn read_level(&mut self) -> Result<Level, GpioError> {
        self.pin.is_high().map(Level::from).map_err(|e| {
            warn!("button pin: {:?}", e);
            GpioError::ReadFailed
        })
    }
}

// ── Button (ESP-IDF, edge interrupt) ──────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspButton;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
    use esp_idf_hal::peripheral::Peripheral;

    use crate::app::ports::ButtonInput;
    use crate::drivers::button::{Edge, Level};
    use crate::error::GpioError;

    /// Button on an ESP32 GPIO with the internal pull-up enabled.
    pub struct EspButton<'d, T: InputPin> {
        pin: PinDriver<'d, T, Input>,
        last: Level,
    }

    impl<'d, T: InputPin + OutputPin> EspButton<'d, T> {
        pub fn new(pin: impl Peripheral<P = T> + 'd) -> Result<Self, GpioError> {
            let mut pin = PinDriver::input(pin).map_err(|_| GpioError::ReadFailed)?;
            pin.set_pull(Pull::Up).map_err(|_| GpioError::ReadFailed)?;
            let last = Level::from(pin.is_high());
            Ok(Self { pin, last })
        }
    }

    impl<T: InputPin> ButtonInput for EspButton<'_, T> {
        async fn next_edge(&mut self) -> Result<Edge, GpioError> {
            loop {
                self.pin
                    .wait_for_any_edge()
                    .await
                    .map_err(|_| GpioError::EdgeWaitFailed)?;
                let level = Level::from(self.pin.is_high());
                if level == self.last {
                    // Bounced back before we read it.
                    continue;
                }
                self.last = level;
                return Ok(if level.is_high() { Edge::Rose } else { Edge::Fell });
            }
        }

        fn read_level(&mut self) -> Result<Level, GpioError> {
            let level = Level::from(self.pin.is_high());
            self.last = level;
            Ok(level)
        }
    }
}
