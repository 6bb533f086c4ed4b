//! Waveform sequences and the preset library.
//!
//! A [`Waveform`] is played back one step per tick in the order given here,
//! so step order is part of each preset's definition.

use crate::constants::FRAME_LEN;
use crate::error::CoyoteError;
use crate::wave::WaveformStep;
use std::fmt;

/// Preset collection shipped by DG-LAB with the official app
pub const DGLABS: &str = "DGLABS";

/// Community-contributed presets
pub const LTX4JAY: &str = "LTX4JAY";

/// An ordered, immutable sequence of waveform steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Waveform {
    steps: Box<[WaveformStep]>,
}

impl Waveform {
    pub fn new(steps: impl IntoIterator<Item = WaveformStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Build from `(x, y, z)` triples, saturating out-of-range parameters.
    pub fn from_params(params: &[(u8, u16, u8)]) -> Self {
        Self::new(params.iter().copied().map(WaveformStep::from))
    }

    /// Build from captured 3-byte transmissions.
    pub fn from_frames(frames: &[[u8; FRAME_LEN]]) -> Self {
        Self::new(frames.iter().copied().map(WaveformStep::from))
    }

    pub fn steps(&self) -> &[WaveformStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step played on the `tick`-th tick when the waveform loops.
    pub fn step_at(&self, tick: u64) -> Option<WaveformStep> {
        if self.steps.is_empty() {
            return None;
        }
        let index = (tick % self.steps.len() as u64) as usize;
        Some(self.steps[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WaveformStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Waveform {
    type Item = &'a WaveformStep;
    type IntoIter = std::slice::Iter<'a, WaveformStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// One named entry of a [`WaveformLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub collection: String,
    pub name: String,
    pub waveform: Waveform,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({} steps)", self.collection, self.name, self.waveform.len())
    }
}

/// Read-only mapping from `(collection, name)` to a waveform.
///
/// Entries keep their registration order; registering an existing
/// `(collection, name)` replaces that entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveformLibrary {
    presets: Vec<Preset>,
}

impl WaveformLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference presets.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.register(DGLABS, "GrainTouch", grain_touch());
        library.register(DGLABS, "AudioBase", audio_base());
        library.register(LTX4JAY, "IntenseVibration", intense_vibration());
        library.register(LTX4JAY, "SlowWave", slow_wave());
        library.register(LTX4JAY, "MediumWave", medium_wave());
        library
    }

    pub fn register(&mut self, collection: &str, name: &str, waveform: Waveform) {
        let position = self
            .presets
            .iter()
            .position(|p| p.collection == collection && p.name == name);
        let preset = Preset {
            collection: collection.to_string(),
            name: name.to_string(),
            waveform,
        };
        match position {
            Some(i) => self.presets[i] = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, collection: &str, name: &str) -> Option<&Waveform> {
        self.presets
            .iter()
            .find(|p| p.collection == collection && p.name == name)
            .map(|p| &p.waveform)
    }

    pub fn lookup(&self, collection: &str, name: &str) -> Result<&Waveform, CoyoteError> {
        self.get(collection, name).ok_or_else(|| CoyoteError::PresetNotFound {
            collection: collection.to_string(),
            name: name.to_string(),
        })
    }

    /// Look up a `collection/name` path, e.g. `DGLABS/GrainTouch`.
    pub fn lookup_path(&self, path: &str) -> Result<&Waveform, CoyoteError> {
        match path.split_once('/') {
            Some((collection, name)) => self.lookup(collection, name),
            None => Err(CoyoteError::PresetNotFound {
                collection: String::new(),
                name: path.to_string(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn collection<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a Preset> + 'a {
        self.presets.iter().filter(move |p| p.collection == collection)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Captured from the official app
#[rustfmt::skip]
pub fn grain_touch() -> Waveform {
    Waveform::from_frames(&[
        [0xE1, 0x03, 0x00], [0xE1, 0x03, 0x0A], [0xA1, 0x04, 0x0A], [0xC1, 0x05, 0x0A],
        [0x01, 0x07, 0x00], [0x21, 0x01, 0x0A], [0x61, 0x01, 0x0A], [0xA1, 0x01, 0x0A],
        [0x01, 0x02, 0x00], [0x01, 0x02, 0x0A], [0x81, 0x02, 0x0A], [0x21, 0x03, 0x0A],
    ])
}

/// Steady high-frequency carrier, modulated by the app in audio mode
pub fn audio_base() -> Waveform {
    Waveform::from_params(&[(1, 9, 16)])
}

pub fn intense_vibration() -> Waveform {
    Waveform::from_params(&[(1, 9, 22)])
}

#[rustfmt::skip]
pub fn slow_wave() -> Waveform {
    Waveform::from_params(&[
        (1, 26, 8), (1, 26, 8), (1, 24, 10), (1, 22, 12), (1, 20, 14), (1, 18, 16),
        (1, 16, 18), (1, 16, 22), (1, 16, 24), (1, 12, 24), (1, 12, 24), (1, 16, 24),
        (1, 16, 22), (1, 16, 18), (1, 18, 16), (1, 20, 14), (1, 22, 12), (1, 24, 10),
    ])
}

#[rustfmt::skip]
pub fn medium_wave() -> Waveform {
    Waveform::from_params(&[
        (1, 9, 4), (1, 9, 4), (1, 9, 6), (1, 9, 10), (1, 9, 12),
        (1, 9, 17), (1, 9, 20), (1, 9, 20), (1, 9, 20), (1, 9, 20),
        (1, 9, 20), (1, 9, 17), (1, 9, 12), (1, 9, 10), (1, 9, 6),
    ])
}
