use rand::Rng;

use super::ColorStream;
use crate::color::{Color, MAX_CHANNELS};
use crate::error::{ConfigError, Error, Result};
use crate::rng::{EngineRng, seeded};

/// Channel pairs (primary, secondary) for each vivid rotation.
/// The remaining channel stays dark.
const VIVID_ROTATIONS: [(usize, usize); 3] = [
    (0, 1), // red - yellow - green
    (1, 2), // green - aqua - blue
    (2, 0), // blue - purple - red
];

/// Random colors with only two lit channels
#[derive(Debug, Clone)]
pub struct RandomVivid {
    rng: EngineRng,
    brightness: u8,
}

impl RandomVivid {
    pub fn new(brightness: u8, seed: u64) -> Self {
        Self {
            rng: seeded(seed),
            brightness,
        }
    }
}

impl ColorStream for RandomVivid {
    fn next_color(&mut self) -> Color {
        let (primary, secondary) = VIVID_ROTATIONS[self.rng.random_range(0..VIVID_ROTATIONS.len())];
        let prime = if self.brightness > 1 {
            self.rng.random_range(1..self.brightness)
        } else {
            self.brightness
        };
        let mut channels = [0; 3];
        channels[primary] = prime;
        channels[secondary] = self.brightness - prime;
        Color::rgb(channels[0], channels[1], channels[2])
    }
}

/// Uniformly random channels, optionally masked per channel
#[derive(Debug, Clone)]
pub struct RandomPastel {
    rng: EngineRng,
    mask: [u8; MAX_CHANNELS],
    channel_count: usize,
}

impl RandomPastel {
    /// `mask`, when given, must hold exactly one entry per channel
    pub fn new(channel_count: usize, mask: Option<&[u8]>, seed: u64) -> Result<Self> {
        if channel_count == 0 || channel_count > MAX_CHANNELS {
            return Err(Error::InvalidValue {
                reason: "a color has 1 to 4 channels",
            });
        }
        let mut bits = [0xff; MAX_CHANNELS];
        if let Some(mask) = mask {
            if mask.len() != channel_count {
                return Err(ConfigError::MaskLength {
                    len: mask.len(),
                    expected: channel_count,
                }
                .into());
            }
            bits[..channel_count].copy_from_slice(mask);
        }
        Ok(Self {
            rng: seeded(seed),
            mask: bits,
            channel_count,
        })
    }
}

impl ColorStream for RandomPastel {
    fn next_color(&mut self) -> Color {
        let mut channels = [0; MAX_CHANNELS];
        for (channel, &mask) in channels.iter_mut().zip(&self.mask).take(self.channel_count) {
            *channel = self.rng.random::<u8>() & mask;
        }
        Color::from_slice(&channels[..self.channel_count]).unwrap_or_default()
    }
}
