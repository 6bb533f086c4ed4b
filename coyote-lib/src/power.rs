use crate::config::PowerConfig;
use crate::constants::{FRAME_LEN, MAX_POWER_LEVEL};
use crate::frame::pad_frame;
use modular_bitfield::prelude::*;
use std::fmt;
use tracing::{debug, trace};

/// Power for both channels, written to the power characteristic.
///
/// Wire layout, little-endian from bit 0: `[channel_b:11][channel_a:11][reserved:2]`.
/// Channel values are in device units (app level times `step`).
#[bitfield(bytes = 3)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerFrame {
    pub channel_b: B11,
    pub channel_a: B11,
    #[skip]
    reserved: B2,
}

impl PowerFrame {
    /// Encode app-scale levels. Anything at or above 100 is sent as 100.
    pub fn encode(level_a: u8, level_b: u8, config: &PowerConfig) -> Self {
        let a = device_units(level_a, config);
        let b = device_units(level_b, config);
        trace!(level_a, level_b, a, b, "Encoded power frame");
        Self::new().with_channel_a(a).with_channel_b(b)
    }

    /// Rebuild a frame from observed bytes. Short input is zero-padded, bytes
    /// past the third are ignored, and the reserved bits are dropped.
    pub fn decode_from_bytes(bytes: &[u8]) -> Self {
        let raw = Self::from_bytes(pad_frame(bytes));
        Self::new()
            .with_channel_a(raw.channel_a())
            .with_channel_b(raw.channel_b())
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        self.into_bytes()
    }

    /// Convert back to app-scale levels `(a, b)` under `config`.
    pub fn levels(&self, config: &PowerConfig) -> (u8, u8) {
        let step = u16::from(config.step());
        let to_level = |units: u16| u8::try_from(units / step).unwrap_or(u8::MAX);
        (to_level(self.channel_a()), to_level(self.channel_b()))
    }
}

fn device_units(level: u8, config: &PowerConfig) -> u16 {
    if level > MAX_POWER_LEVEL {
        debug!(level, "Power level saturated at {}", MAX_POWER_LEVEL);
    }
    u16::from(level.min(MAX_POWER_LEVEL)) * u16::from(config.step())
}

impl fmt::Display for PowerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: {}, B: {} [{}]",
            self.channel_a(),
            self.channel_b(),
            hex::encode(self.to_bytes())
        )
    }
}
