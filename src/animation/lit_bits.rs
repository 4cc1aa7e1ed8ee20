use embassy_time::Duration;
use rand::Rng;

use super::{Animation, AnimationSettings, bound_len, default_palette, ensure_bound};
use crate::bitmask::BitMask;
use crate::color::Color;
use crate::color_map::ColorMap;
use crate::error::{ConfigError, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::rng::{EngineRng, seeded};

/// Three on, one off
const LIT_PATTERN: u32 = 0x77;
/// Frames between re-randomized masks
const RESHUFFLE_FRAMES: u32 = 30;
const DEFAULT_PALETTE_LEN: usize = 20;

/// Which pixels are lit, as a repeating pattern or at a random density
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LitPixels {
    mask: BitMask,
    lit_percent: Option<u8>,
}

impl LitPixels {
    pub(crate) fn new(len: usize, lit_percent: Option<u8>) -> Self {
        Self {
            mask: BitMask::new(len),
            lit_percent,
        }
    }

    /// Back to the fixed pattern, or a fresh random draw when a density is set
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.lit_percent {
            Some(percent) => self.mask.randomize(rng, percent),
            None => self.mask.fill_repeating(LIT_PATTERN),
        }
    }

    /// Redraw at the configured density; the fixed pattern is left alone
    pub(crate) fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(percent) = self.lit_percent {
            self.mask.randomize(rng, percent);
        }
    }

    /// Back to the fixed pattern regardless of the density
    pub(crate) fn fill_pattern(&mut self) {
        self.mask.fill_repeating(LIT_PATTERN);
    }

    pub(crate) fn is_lit(&self, index: usize) -> Result<bool> {
        self.mask.get(index)
    }

    pub(crate) fn scroll(&mut self, steps: isize) {
        self.mask.scroll(steps);
    }

    pub(crate) const fn mask(&self) -> &BitMask {
        &self.mask
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitBitsConfig {
    /// Palette movement per frame
    pub scroll_speed: isize,
    /// Mask movement per frame
    pub lit_scroll_speed: isize,
    /// Random lit density; `None` keeps the repeating pattern
    pub lit_percent: Option<u8>,
}

impl Default for LitBitsConfig {
    fn default() -> Self {
        Self {
            scroll_speed: 1,
            lit_scroll_speed: -1,
            lit_percent: None,
        }
    }
}

/// Palette colors showing through a scrolling on/off mask
#[derive(Debug, Clone)]
pub struct LitBits {
    settings: AnimationSettings,
    config: LitBitsConfig,
    base_palette: ColorMap,
    palette: ColorMap,
    lit: LitPixels,
    rng: EngineRng,
    computed_len: usize,
}

impl LitBits {
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: LitBitsConfig,
        palette: Option<ColorMap>,
    ) -> Result<Self> {
        let computed_len = bound_len(buffer, 1)?;
        let mut rng = seeded(settings.seed);
        let palette = match palette {
            Some(palette) => palette,
            None => default_palette(DEFAULT_PALETTE_LEN, settings.brightness, &mut rng)?,
        };
        if palette.is_empty() {
            return Err(ConfigError::PaletteTooShort { min: 1, len: 0 }.into());
        }
        Ok(Self {
            settings,
            config,
            palette: palette.clone(),
            base_palette: palette,
            lit: LitPixels::new(computed_len, config.lit_percent),
            rng,
            computed_len,
        })
    }

    pub fn mask(&self) -> &BitMask {
        self.lit.mask()
    }

    pub const fn palette(&self) -> &ColorMap {
        &self.palette
    }
}

impl Animation for LitBits {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        self.palette.clone_from(&self.base_palette);
        self.lit.reset(&mut self.rng);
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, frame: u32) -> Result<()> {
        if frame % RESHUFFLE_FRAMES == 0 {
            self.lit.reshuffle(&mut self.rng);
        }
        let palette_len = self.palette.len();
        for i in 0..self.computed_len {
            let color = if self.lit.is_lit(i)? {
                self.palette.get((i % palette_len) as isize)?
            } else {
                Color::OFF
            };
            buffer.put(i, color);
        }
        self.palette.scroll(self.config.scroll_speed);
        self.lit.scroll(self.config.lit_scroll_speed);
        Ok(())
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
