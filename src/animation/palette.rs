use alloc::vec::Vec;

use rand::Rng;

use crate::color::{ChannelOrder, Color, color_wheel};
use crate::color_map::ColorMap;
use crate::error::{Error, HardwareError, Result};
use crate::pixel_buffer::PixelBuffer;

/// `len` wheel colors starting at a random hue, at most 30 hue steps apart
pub fn default_palette<R: Rng + ?Sized>(len: usize, brightness: u8, rng: &mut R) -> Result<ColorMap> {
    if len == 0 {
        return Err(Error::InvalidValue {
            reason: "palette needs at least one color",
        });
    }
    let start = usize::from(rng.random::<u8>());
    let step = (255 / len).min(30);
    let mut palette = ColorMap::new(len, 3)?;
    for i in 0..len {
        let hue = ((start + step * i) % 255) as u8;
        palette.set(i as isize, Color::from(color_wheel(hue, brightness)))?;
    }
    Ok(palette)
}

/// Palette pre-arranged in hardware byte order, indexed by 8-bit levels.
///
/// Levels are shifted right by `shift` before the lookup so 256 levels can
/// address a smaller palette. Level zero is always off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatPalette {
    bytes: Vec<u8>,
    bytes_per_pixel: usize,
    shift: u8,
}

impl HeatPalette {
    pub fn new(palette: &ColorMap, order: ChannelOrder, shift: u8) -> Result<Self> {
        let bytes_per_pixel = order.channel_count();
        let mut bytes = Vec::with_capacity(palette.len() * bytes_per_pixel);
        let mut pixel = [0; 4];
        for i in 0..palette.len() {
            let color = palette.get(i as isize)?.with_channel_count(bytes_per_pixel);
            order.scatter(color.as_slice(), &mut pixel[..bytes_per_pixel]);
            bytes.extend_from_slice(&pixel[..bytes_per_pixel]);
        }
        Ok(Self {
            bytes,
            bytes_per_pixel,
            shift,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / self.bytes_per_pixel
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Map each level to its palette entry and write the computed pixels.
    ///
    /// A buffer whose byte layout no longer matches the palette is a broken
    /// invariant and fails with a hardware error.
    pub fn colorize(&self, levels: &[u8], buffer: &mut PixelBuffer) -> Result<()> {
        let bpp = self.bytes_per_pixel;
        if buffer.bytes_per_pixel() != bpp {
            return Err(HardwareError::LengthMismatch {
                expected: levels.len() * bpp,
                actual: buffer.computed_len() * buffer.bytes_per_pixel(),
            }
            .into());
        }
        let mut out = Vec::with_capacity(levels.len() * bpp);
        for &level in levels {
            if level == 0 {
                out.extend(core::iter::repeat_n(0, bpp));
                continue;
            }
            let start = usize::from(level >> self.shift) * bpp;
            match self.bytes.get(start..start + bpp) {
                Some(entry) => out.extend_from_slice(entry),
                None => {
                    return Err(Error::index(usize::from(level >> self.shift), self.len()));
                }
            }
        }
        buffer.write_computed(&out)
    }
}
