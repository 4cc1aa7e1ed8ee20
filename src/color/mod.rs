mod blend;
mod channel_op;
mod order;
mod wheel;

use smart_leds::RGB8;

use crate::error::{Error, Result};

pub use blend::{blend, step_increment};
pub use channel_op::{ChannelOp, Operand};
pub use order::ChannelOrder;
pub use wheel::{color_wheel, heat_color};

pub(crate) use blend::gradient_at;
pub(crate) use channel_op::apply_packed;

pub type Rgb = RGB8;

/// Maximum number of channels a single color can carry (RGBW)
pub const MAX_CHANNELS: usize = 4;

/// A color of 1-4 channels in logical (RGB[W]) order.
///
/// All channels zero means "off".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    channels: [u8; MAX_CHANNELS],
    len: u8,
}

impl Color {
    /// Three channel black
    pub const OFF: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            channels: [r, g, b, 0],
            len: 3,
        }
    }

    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self {
            channels: [r, g, b, w],
            len: 4,
        }
    }

    /// Single channel value, used by heat maps and masks
    pub const fn mono(value: u8) -> Self {
        Self {
            channels: [value, 0, 0, 0],
            len: 1,
        }
    }

    /// Black with the given channel count
    pub const fn off(channel_count: usize) -> Self {
        Self {
            channels: [0; MAX_CHANNELS],
            len: clamp_len(channel_count),
        }
    }

    /// Build a color from raw channel values
    pub fn from_slice(values: &[u8]) -> Result<Self> {
        if values.is_empty() || values.len() > MAX_CHANNELS {
            return Err(Error::InvalidValue {
                reason: "a color has 1 to 4 channels",
            });
        }
        let mut channels = [0; MAX_CHANNELS];
        channels[..values.len()].copy_from_slice(values);
        Ok(Self {
            channels,
            len: values.len() as u8,
        })
    }

    /// Unpack a big-endian integer (`0xRRGGBB` for three channels)
    pub const fn from_u32(value: u32, channel_count: usize) -> Self {
        let len = clamp_len(channel_count);
        let bytes = value.to_be_bytes();
        let mut channels = [0; MAX_CHANNELS];
        let skip = MAX_CHANNELS - len as usize;
        let mut i = 0;
        while i < len as usize {
            channels[i] = bytes[skip + i];
            i += 1;
        }
        Self { channels, len }
    }

    pub const fn channel_count(&self) -> usize {
        self.len as usize
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.channels[..self.len as usize]
    }

    /// Channel value, zero past the end
    pub const fn channel(&self, index: usize) -> u8 {
        if index < self.len as usize {
            self.channels[index]
        } else {
            0
        }
    }

    pub fn is_off(&self) -> bool {
        self.as_slice().iter().all(|&c| c == 0)
    }

    /// Same color padded with zeros or truncated to `channel_count` channels
    #[must_use]
    pub const fn with_channel_count(self, channel_count: usize) -> Self {
        let len = clamp_len(channel_count);
        let mut channels = self.channels;
        let mut i = len as usize;
        while i < MAX_CHANNELS {
            channels[i] = 0;
            i += 1;
        }
        Self { channels, len }
    }

    /// First three channels as RGB
    pub const fn to_rgb(self) -> Rgb {
        Rgb {
            r: self.channel(0),
            g: self.channel(1),
            b: self.channel(2),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::OFF
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }
}

const fn clamp_len(channel_count: usize) -> u8 {
    if channel_count == 0 {
        1
    } else if channel_count > MAX_CHANNELS {
        MAX_CHANNELS as u8
    } else {
        channel_count as u8
    }
}
