use crate::constants::{FRAME_LEN, MAX_WAVE_X, MAX_WAVE_Y, MAX_WAVE_Z};
use crate::error::CoyoteError;
use crate::frame::pad_frame;
use modular_bitfield::prelude::*;
use std::fmt;
use tracing::{trace, warn};

/// One 100 ms waveform segment, written to a channel's waveform characteristic.
///
/// Wire layout, little-endian from bit 0: `[x:5][y:10][z:5][reserved:4]`.
/// `x` and `y` shape the pulse timing, `z` sets the pulse width.
#[bitfield(bytes = 3)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaveformStep {
    pub x: B5,
    pub y: B10,
    pub z: B5,
    #[skip]
    reserved: B4,
}

impl WaveformStep {
    /// Encode a step, saturating each parameter at its field maximum
    /// (31 for `x` and `z`, 1023 for `y`).
    pub fn encode(x: u8, y: u16, z: u8) -> Self {
        if x > MAX_WAVE_X || y > MAX_WAVE_Y || z > MAX_WAVE_Z {
            warn!(x, y, z, "Waveform parameters out of range, saturating");
        }
        let step = Self::new()
            .with_x(x.min(MAX_WAVE_X))
            .with_y(y.min(MAX_WAVE_Y))
            .with_z(z.min(MAX_WAVE_Z));
        trace!(x = step.x(), y = step.y(), z = step.z(), "Encoded waveform step");
        step
    }

    /// Encode a step, rejecting any parameter that does not fit its field.
    pub fn try_encode(x: u8, y: u16, z: u8) -> Result<Self, CoyoteError> {
        check_field("x", u32::from(x), u32::from(MAX_WAVE_X))?;
        check_field("y", u32::from(y), u32::from(MAX_WAVE_Y))?;
        check_field("z", u32::from(z), u32::from(MAX_WAVE_Z))?;
        Ok(Self::new().with_x(x).with_y(y).with_z(z))
    }

    /// Rebuild a step from observed bytes in transmit order. Short input is
    /// zero-padded, bytes past the third are ignored, and the reserved bits
    /// are dropped.
    pub fn decode_from_bytes(bytes: &[u8]) -> Self {
        let raw = Self::from_bytes(pad_frame(bytes));
        Self::new().with_x(raw.x()).with_y(raw.y()).with_z(raw.z())
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        self.into_bytes()
    }

    pub fn params(&self) -> (u8, u16, u8) {
        (self.x(), self.y(), self.z())
    }
}

fn check_field(field: &'static str, value: u32, max: u32) -> Result<(), CoyoteError> {
    if value > max {
        return Err(CoyoteError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}

impl From<(u8, u16, u8)> for WaveformStep {
    fn from((x, y, z): (u8, u16, u8)) -> Self {
        Self::encode(x, y, z)
    }
}

impl From<[u8; FRAME_LEN]> for WaveformStep {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self::decode_from_bytes(&bytes)
    }
}

impl fmt::Display for WaveformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x: {:>2}, y: {:>4}, z: {:>2} [{}]",
            self.x(),
            self.y(),
            self.z(),
            hex::encode(self.to_bytes())
        )
    }
}
