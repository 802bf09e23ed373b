//! WiFi station-mode adapter.
//!
//! Implements [`NetworkPort`] for the ESP32. `bring_up` hands the modem to
//! a background thread that joins the configured access point and rejoins
//! whenever the link drops, so the control loop never blocks on WiFi.
//! Until the station is up, sends fail and are logged; the next
//! subscription renewal after association restores notifications.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `WifiStation` over `esp_idf_svc::wifi`.
//! - **all other targets**: `HostNetwork`, a no-op (the host stack is
//!   already up).

use log::info;

use crate::app::ports::NetworkPort;
use crate::error::NetError;

/// Host networking is managed by the OS.
#[derive(Debug, Default)]
pub struct HostNetwork;

impl NetworkPort for HostNetwork {
    fn bring_up(&mut self) -> Result<(), NetError> {
        info!("network: using host stack");
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
pub use station::WifiStation;

#[cfg(target_os = "espidf")]
mod station {
    use core::time::Duration;

    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{error, info, warn};

    use crate::app::ports::NetworkPort;
    use crate::error::NetError;

    /// Delay between association checks / rejoin attempts.
    const RECHECK_SECS: u64 = 5;

    struct Parts {
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    }

    pub struct WifiStation {
        parts: Option<Parts>,
        ssid: heapless::String<32>,
        password: heapless::String<64>,
    }

    impl WifiStation {
        pub fn new(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<EspDefaultNvsPartition>,
            ssid: &str,
            password: &str,
        ) -> Result<Self, NetError> {
            let ssid = heapless::String::try_from(ssid).map_err(|()| NetError::WifiFailed)?;
            let password =
                heapless::String::try_from(password).map_err(|()| NetError::WifiFailed)?;
            Ok(Self {
                parts: Some(Parts {
                    modem,
                    sysloop,
                    nvs,
                }),
                ssid,
                password,
            })
        }
    }

    impl NetworkPort for WifiStation {
        fn bring_up(&mut self) -> Result<(), NetError> {
            let Some(parts) = self.parts.take() else {
                // Already running; the station thread keeps itself joined.
                return Ok(());
            };
            let config = Configuration::Client(ClientConfiguration {
                ssid: self.ssid.clone(),
                password: self.password.clone(),
                auth_method: if self.password.is_empty() {
                    AuthMethod::None
                } else {
                    AuthMethod::WPA2Personal
                },
                ..Default::default()
            });

            std::thread::Builder::new()
                .name("wifi".into())
                .stack_size(8 * 1024)
                .spawn(move || run_station(parts, &config))
                .map_err(|e| {
                    error!("wifi: could not spawn station thread: {}", e);
                    NetError::WifiFailed
                })?;
            Ok(())
        }
    }

    fn run_station(parts: Parts, config: &Configuration) {
        let wifi = EspWifi::new(parts.modem, parts.sysloop.clone(), parts.nvs)
            .and_then(|w| BlockingWifi::wrap(w, parts.sysloop));
        let mut wifi = match wifi {
            Ok(w) => w,
            Err(e) => {
                error!("wifi: driver init failed: {}", e);
                return;
            }
        };
        if let Err(e) = wifi.set_configuration(config).and_then(|()| wifi.start()) {
            error!("wifi: start failed: {}", e);
            return;
        }

        loop {
            if !wifi.is_connected().unwrap_or(false) {
                match wifi.connect().and_then(|()| wifi.wait_netif_up()) {
                    Ok(()) => info!("wifi: station up"),
                    Err(e) => warn!("wifi: join failed: {}", e),
                }
            }
            std::thread::sleep(Duration::from_secs(RECHECK_SECS));
        }
    }
}
