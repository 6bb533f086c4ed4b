// Protocol constants for the Coyote V2

use std::time::Duration;

/// Every power and waveform write is exactly 3 bytes
pub const FRAME_LEN: usize = 3;

/// Highest power level accepted from the app scale; larger requests saturate
pub const MAX_POWER_LEVEL: u8 = 100;

/// Battery characteristic reports a percentage
pub const MAX_BATTERY_PERCENT: u8 = 100;

/// Largest value an 11-bit channel power field can hold
pub const MAX_CHANNEL_POWER: u16 = (1 << 11) - 1;

/// Default app-level to device-unit multiplier
pub const DEFAULT_POWER_STEP: u8 = 7;

/// Default device-unit safety ceiling
pub const DEFAULT_MAX_POWER: u16 = 2000;

/// Waveform X field (5 bits)
pub const MAX_WAVE_X: u8 = (1 << 5) - 1;

/// Waveform Y field (10 bits)
pub const MAX_WAVE_Y: u16 = (1 << 10) - 1;

/// Waveform Z field (5 bits)
pub const MAX_WAVE_Z: u8 = (1 << 5) - 1;

/// The device expects a fresh waveform step every 100 ms
pub const WAVEFORM_TICK: Duration = Duration::from_millis(100);

/// Primary Coyote V2 service
pub const SERVICE_UUID: &str = "955a180b-0fe2-f5aa-a094-84b8d4f3e8ad";

/// Battery service
pub const BATTERY_SERVICE_UUID: &str = "955a180a-0fe2-f5aa-a094-84b8d4f3e8ad";

/// Every Coyote characteristic shares this base, with the short id in bytes 2..4
pub const UUID_PREFIX: &str = "955a";
pub const UUID_SUFFIX: &str = "-0fe2-f5aa-a094-84b8d4f3e8ad";
