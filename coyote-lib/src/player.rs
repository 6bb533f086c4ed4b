use crate::config::PowerConfig;
use crate::constants::{MAX_POWER_LEVEL, WAVEFORM_TICK};
use crate::error::CoyoteError;
use crate::power::PowerFrame;
use crate::transport::{Channel, Characteristic, Transport};
use crate::waveform::Waveform;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How long [`Player::play`] keeps streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// One pass of the longest waveform
    Once,
    /// `n` passes of the longest waveform
    Cycles(u32),
    /// Until the future is dropped or a write fails
    Forever,
}

/// Streams waveforms and power settings to a device through a [`Transport`].
///
/// Every power request is capped at the player's ceiling before encoding.
pub struct Player<T> {
    transport: T,
    config: PowerConfig,
    tick: Duration,
    ceiling: u8,
}

impl<T: Transport> Player<T> {
    pub fn new(transport: T, config: PowerConfig) -> Self {
        Self {
            transport,
            config,
            tick: WAVEFORM_TICK,
            ceiling: MAX_POWER_LEVEL,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_ceiling(mut self, level: u8) -> Self {
        self.set_ceiling(level);
        self
    }

    /// Highest app level [`Player::set_power`] will send, capped at 100.
    pub fn set_ceiling(&mut self, level: u8) {
        self.ceiling = level.min(MAX_POWER_LEVEL);
        info!(ceiling = self.ceiling, "Power ceiling set");
    }

    pub fn ceiling(&self) -> u8 {
        self.ceiling
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Write power levels for both channels and return the frame sent.
    pub async fn set_power(&mut self, level_a: u8, level_b: u8) -> Result<PowerFrame, CoyoteError> {
        let a = self.limit(Channel::A, level_a);
        let b = self.limit(Channel::B, level_b);
        let frame = PowerFrame::encode(a, b, &self.config);
        self.transport.write(Characteristic::Power, frame.to_bytes()).await?;
        info!(a, b, "Power set: {}", frame);
        Ok(frame)
    }

    fn limit(&self, channel: Channel, level: u8) -> u8 {
        if level > self.ceiling {
            warn!(%channel, level, ceiling = self.ceiling, "Power request above ceiling, clamping");
            self.ceiling
        } else {
            level
        }
    }

    /// Stream one step per tick to each supplied channel, each channel looping
    /// over its own waveform. Returns the number of ticks played.
    pub async fn play(
        &mut self,
        a: Option<&Waveform>,
        b: Option<&Waveform>,
        playback: Playback,
    ) -> Result<u64, CoyoteError> {
        let a = a.filter(|w| !w.is_empty());
        let b = b.filter(|w| !w.is_empty());
        let period = a.map_or(0, Waveform::len).max(b.map_or(0, Waveform::len)) as u64;
        if period == 0 {
            warn!("Nothing to play, both channels are empty");
            return Ok(0);
        }

        let total = match playback {
            Playback::Once => Some(period),
            Playback::Cycles(n) => Some(period * u64::from(n)),
            Playback::Forever => None,
        };
        info!(?playback, period, tick_ms = self.tick.as_millis() as u64, "Starting playback");

        let mut interval = time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut tick = 0u64;
        while total.is_none_or(|t| tick < t) {
            interval.tick().await;
            for (channel, waveform) in [(Channel::A, a), (Channel::B, b)] {
                if let Some(step) = waveform.and_then(|w| w.step_at(tick)) {
                    self.transport
                        .write(channel.waveform_characteristic(), step.to_bytes())
                        .await?;
                    debug!(tick, %channel, "{}", step);
                }
            }
            tick += 1;
        }

        info!(ticks = tick, "Playback finished");
        Ok(tick)
    }
}
