//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use coyote_lib::config::{DeviceSettings, MacAddress, PowerConfig, WifiCredentials};
#[allow(unused_imports)]
pub use coyote_lib::error::CoyoteError;
#[allow(unused_imports)]
pub use coyote_lib::player::{Playback, Player};
#[allow(unused_imports)]
pub use coyote_lib::power::PowerFrame;
#[allow(unused_imports)]
pub use coyote_lib::transport::{Channel, Characteristic, RecordingTransport, Transport, battery_level};
#[allow(unused_imports)]
pub use coyote_lib::wave::WaveformStep;
#[allow(unused_imports)]
pub use coyote_lib::waveform::{DGLABS, LTX4JAY, Waveform, WaveformLibrary};
#[allow(unused_imports)]
pub use coyote_lib::constants::MAX_BATTERY_PERCENT;
#[allow(unused_imports)]
pub use coyote_lib::frame::parse_hex_frame;
#[allow(unused_imports)]
pub use hex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Route library logs to the test output. Honours `RUST_LOG`, defaults to
/// `debug` so saturation and clamping messages show up on failure.
#[allow(dead_code)]
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::DEBUG.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer().without_time())
        .try_init();
}

/// Decode a hex literal into a 3-byte frame for testing
#[allow(dead_code)]
pub fn frame(hex_data: &str) -> [u8; 3] {
    let bytes = hex::decode(hex_data).expect("Failed to decode hex");
    bytes.try_into().expect("Frame must be 3 bytes")
}

/// Captured GrainTouch transmissions, in playback order
#[allow(dead_code)]
pub const GRAIN_TOUCH_CAPTURE: [&str; 12] = [
    "e10300", "e1030a", "a1040a", "c1050a", "010700", "21010a", "61010a", "a1010a", "010200", "01020a", "81020a",
    "21030a",
];

/// Settings file with every field present
#[allow(dead_code)]
pub const FULL_SETTINGS: &str = r#"{
    "mac_address": "E2:8B:7B:12:34:56",
    "wifi": [
        { "ssid": "SSID Name 1", "password": "Your password" },
        { "ssid": "SSID Name 2", "password": "Your other password" }
    ],
    "power": { "step": 5, "max_power": 1000 }
}"#;
