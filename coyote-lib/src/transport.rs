//! The seam between the encoders and whatever BLE stack carries the frames.

use crate::constants::{BATTERY_SERVICE_UUID, FRAME_LEN, MAX_BATTERY_PERCENT, SERVICE_UUID, UUID_PREFIX, UUID_SUFFIX};
use crate::error::CoyoteError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;
use tracing::trace;

/// GATT characteristics of the Coyote V2, by their 16-bit short id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum Characteristic {
    /// Battery percentage, read/notify, 1 byte
    #[strum(to_string = "battery")]
    Battery = 0x1500,
    /// Power for both channels, read/write/notify, [`crate::PowerFrame`]
    #[strum(to_string = "power")]
    Power = 0x1504,
    /// Channel A waveform, write, [`crate::WaveformStep`]
    #[strum(to_string = "waveform-a")]
    WaveformA = 0x1505,
    /// Channel B waveform, write, [`crate::WaveformStep`]
    #[strum(to_string = "waveform-b")]
    WaveformB = 0x1506,
}

impl Characteristic {
    /// Full 128-bit UUID string.
    pub fn uuid(&self) -> String {
        let short: u16 = (*self).into();
        format!("{}{:04x}{}", UUID_PREFIX, short, UUID_SUFFIX)
    }

    /// UUID of the service this characteristic belongs to.
    pub fn service_uuid(&self) -> &'static str {
        match self {
            Characteristic::Battery => BATTERY_SERVICE_UUID,
            _ => SERVICE_UUID,
        }
    }
}

/// Output channel of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    pub fn waveform_characteristic(&self) -> Characteristic {
        match self {
            Channel::A => Characteristic::WaveformA,
            Channel::B => Characteristic::WaveformB,
        }
    }
}

/// Something that can deliver a 3-byte frame to a characteristic.
///
/// The BLE client implements this; connection handling stays on its side.
pub trait Transport {
    fn write(
        &mut self,
        characteristic: Characteristic,
        frame: [u8; FRAME_LEN],
    ) -> impl Future<Output = Result<(), CoyoteError>> + Send;
}

/// A single write seen by a [`RecordingTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub characteristic: Characteristic,
    pub frame: [u8; FRAME_LEN],
}

/// In-memory transport that keeps every write in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    writes: Vec<Write>,
    fail_after: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` writes, then fail every following one.
    pub fn failing_after(count: usize) -> Self {
        Self {
            writes: Vec::new(),
            fail_after: Some(count),
        }
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Frames written to one characteristic, in order.
    pub fn frames_for(&self, characteristic: Characteristic) -> Vec<[u8; FRAME_LEN]> {
        self.writes
            .iter()
            .filter(|w| w.characteristic == characteristic)
            .map(|w| w.frame)
            .collect()
    }

    /// Forget every recorded write. A `failing_after` limit counts again from here.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl Transport for RecordingTransport {
    async fn write(&mut self, characteristic: Characteristic, frame: [u8; FRAME_LEN]) -> Result<(), CoyoteError> {
        if self.fail_after.is_some_and(|limit| self.writes.len() >= limit) {
            return Err(CoyoteError::Transport(format!(
                "write to {} rejected after {} writes",
                characteristic,
                self.writes.len()
            )));
        }
        trace!(%characteristic, frame = %hex::encode(frame), "Recorded write");
        self.writes.push(Write { characteristic, frame });
        Ok(())
    }
}

/// Battery percentage from the battery characteristic's value.
pub fn battery_level(bytes: &[u8]) -> Result<u8, CoyoteError> {
    let level = *bytes.first().ok_or(CoyoteError::InsufficientData {
        expected: 1,
        actual: 0,
    })?;
    Ok(level.min(MAX_BATTERY_PERCENT))
}
