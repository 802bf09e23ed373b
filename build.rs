fn main() {
    println!("cargo:rerun-if-env-changed=TALKBACK_CONFIG");
    println!("cargo:rerun-if-env-changed=TALKBACK_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=TALKBACK_WIFI_PASSWORD");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
