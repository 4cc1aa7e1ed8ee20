use super::MAX_CHANNELS;
use crate::error::{ConfigError, Error, Result};

/// Logical to physical channel mapping.
///
/// Entry `k` is the byte offset inside a hardware pixel that receives
/// logical channel `k` (R, G, B, W).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOrder {
    map: [u8; MAX_CHANNELS],
    len: u8,
}

impl ChannelOrder {
    pub const RGB: Self = Self::from_array([0, 1, 2, 3], 3);
    /// WS2812 byte order
    pub const GRB: Self = Self::from_array([1, 0, 2, 3], 3);
    pub const RGBW: Self = Self::from_array([0, 1, 2, 3], 4);
    /// SK6812 RGBW byte order
    pub const GRBW: Self = Self::from_array([1, 0, 2, 3], 4);

    const fn from_array(map: [u8; MAX_CHANNELS], len: u8) -> Self {
        Self { map, len }
    }

    /// Build an order from a permutation of `0..map.len()`
    pub fn new(map: &[u8]) -> Result<Self> {
        let len = map.len();
        if len == 0 || len > MAX_CHANNELS {
            return Err(ConfigError::ChannelOrder {
                bytes_per_pixel: len,
            }
            .into());
        }
        let mut seen = [false; MAX_CHANNELS];
        for &slot in map {
            let slot = usize::from(slot);
            if slot >= len || seen[slot] {
                return Err(Error::InvalidValue {
                    reason: "channel order must be a permutation",
                });
            }
            seen[slot] = true;
        }
        let mut out = [0; MAX_CHANNELS];
        out[..len].copy_from_slice(map);
        Ok(Self {
            map: out,
            len: len as u8,
        })
    }

    /// Identity order for `channel_count` channels
    pub fn identity(channel_count: usize) -> Self {
        let len = channel_count.clamp(1, MAX_CHANNELS) as u8;
        Self::from_array([0, 1, 2, 3], len)
    }

    pub const fn channel_count(&self) -> usize {
        self.len as usize
    }

    /// Hardware byte offset of logical channel `channel`
    pub const fn physical(&self, channel: usize) -> usize {
        self.map[channel] as usize
    }

    /// Check that this order describes pixels of `bytes_per_pixel` bytes
    pub fn ensure_fits(&self, bytes_per_pixel: usize) -> Result<()> {
        if self.channel_count() == bytes_per_pixel {
            Ok(())
        } else {
            Err(ConfigError::ChannelOrder { bytes_per_pixel }.into())
        }
    }

    /// Scatter logical channels into a hardware pixel
    pub(crate) fn scatter(&self, logical: &[u8], physical: &mut [u8]) {
        for (k, &value) in logical.iter().enumerate().take(self.channel_count()) {
            physical[self.physical(k)] = value;
        }
    }

    /// Gather a hardware pixel back into logical channel order
    pub(crate) fn gather(&self, physical: &[u8], logical: &mut [u8]) {
        for (k, slot) in logical.iter_mut().enumerate().take(self.channel_count()) {
            *slot = physical[self.physical(k)];
        }
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::GRB
    }
}
