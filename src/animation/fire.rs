//! Flame simulation over a per-pixel heat map.
//!
//! Each frame the heat map is optionally scrolled, sparked at the flash
//! points, smoothed around them, cooled, and finally mapped to colors
//! through a black-body palette.

use alloc::vec;
use alloc::vec::Vec;

use embassy_time::Duration;
use heapless::Vec as FixedVec;
use rand::Rng;

use super::{Animation, AnimationSettings, HeatPalette, bound_len, ensure_bound};
use crate::bitmask::BitMask;
use crate::color::{Color, heat_color};
use crate::color_map::{ColorMap, Span};
use crate::error::{ConfigError, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::rng::{EngineRng, seeded};

/// Smallest palette that still covers 256 heat levels with a shift of 2
pub const FIRE_PALETTE_MIN: usize = 64;
const MAX_HOTSPOTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireConfig {
    /// Sparks at or below this roll are hot; zero stops sparking entirely
    pub sparking: u8,
    /// Heat removed from every pixel per frame
    pub cooling: u8,
    /// Direction the flames travel; zero keeps them in place
    pub scroll_speed: isize,
    /// Flash points, at least one
    pub hotspots: usize,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            sparking: 64,
            cooling: 15,
            scroll_speed: 1,
            hotspots: 1,
        }
    }
}

fn black_body_palette() -> Result<ColorMap> {
    let mut palette = ColorMap::new(FIRE_PALETTE_MIN, 3)?;
    for i in 0..FIRE_PALETTE_MIN {
        palette.set(i as isize, Color::from(heat_color((i * 4) as u8)))?;
    }
    Ok(palette)
}

/// Right shift that maps 256 heat levels onto the palette
const fn palette_shift(len: usize) -> u8 {
    if len >= 256 {
        0
    } else if len >= 128 {
        1
    } else {
        2
    }
}

#[derive(Debug, Clone)]
pub struct Fire {
    settings: AnimationSettings,
    config: FireConfig,
    palette: HeatPalette,
    heat: ColorMap,
    scratch: Vec<u8>,
    blend_map: BitMask,
    flash_points: FixedVec<usize, MAX_HOTSPOTS>,
    rng: EngineRng,
    computed_len: usize,
}

impl Fire {
    /// `palette` must hold at least [`FIRE_PALETTE_MIN`] colors
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: FireConfig,
        palette: Option<ColorMap>,
    ) -> Result<Self> {
        let computed_len = bound_len(buffer, 1)?;
        let palette = match palette {
            Some(palette) => palette,
            None => black_body_palette()?,
        };
        if palette.len() < FIRE_PALETTE_MIN {
            return Err(ConfigError::PaletteTooShort {
                min: FIRE_PALETTE_MIN,
                len: palette.len(),
            }
            .into());
        }
        let hotspots = config.hotspots.max(1);
        if hotspots > MAX_HOTSPOTS {
            return Err(ConfigError::CapacityExceeded {
                what: "hotspots",
                max: MAX_HOTSPOTS,
            }
            .into());
        }
        Ok(Self {
            settings,
            config: FireConfig { hotspots, ..config },
            palette: HeatPalette::new(&palette, buffer.order(), palette_shift(palette.len()))?,
            heat: ColorMap::new(computed_len, 1)?,
            scratch: vec![0; computed_len],
            blend_map: BitMask::new(computed_len),
            flash_points: FixedVec::new(),
            rng: seeded(settings.seed),
            computed_len,
        })
    }

    /// Current heat of every computed pixel
    pub fn heat(&self) -> &[u8] {
        self.heat.as_bytes()
    }

    pub fn flash_points(&self) -> &[usize] {
        &self.flash_points
    }

    pub const fn blend_map(&self) -> &BitMask {
        &self.blend_map
    }

    fn place_flash_points(&mut self) -> (isize, isize) {
        let len = self.computed_len;
        let (first, window) = match self.config.scroll_speed {
            s if s > 0 => (0, (0, 11)),
            s if s < 0 => (len - 1, (-10, 1)),
            _ => {
                let point = if len > 1 { self.rng.random_range(0..len - 1) } else { 0 };
                (point, (-5, 6))
            }
        };
        self.flash_points.clear();
        let _ = self.flash_points.push(first);

        // extra points are spread evenly with a little jitter
        let section = (len / self.config.hotspots) as isize;
        for i in 1..self.config.hotspots {
            let jitter = isize::from(self.rng.random::<u8>() & 0x0f) - 8;
            let point = (section * i as isize + jitter).clamp(0, len as isize - 1) as usize;
            if !self.flash_points.contains(&point) {
                let _ = self.flash_points.push(point);
            }
        }
        window
    }

    fn spark(&mut self) {
        if self.config.sparking == 0 {
            return;
        }
        let heat = self.heat.as_bytes_mut();
        for &point in &self.flash_points {
            let roll = self.rng.random::<u8>();
            heat[point] = if roll <= self.config.sparking {
                192 + (roll & 63)
            } else {
                (roll & 127) | 64
            };
        }
    }

    /// Average each marked pixel with its neighbours, reading from a copy so
    /// the result does not depend on iteration order
    fn smooth(&mut self) -> Result<()> {
        let len = self.computed_len;
        self.scratch.copy_from_slice(self.heat.as_bytes());
        let heat = self.heat.as_bytes_mut();
        for i in 0..len {
            if !self.blend_map.get(i)? {
                continue;
            }
            let window = &self.scratch[i.saturating_sub(1)..(i + 2).min(len)];
            let sum: u32 = window.iter().copied().map(u32::from).sum();
            let taps = if i > 0 && i < len - 1 { 3 } else { 2 };
            heat[i] = (sum / taps) as u8;
        }
        Ok(())
    }
}

impl Animation for Fire {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        self.heat.fill(Color::mono(0), Span::ALL)?;

        let (low, high) = self.place_flash_points();
        self.blend_map.fill(false);
        let len = self.computed_len as isize;
        for &point in &self.flash_points {
            for i in point as isize + low..point as isize + high {
                if (0..len).contains(&i) && !self.flash_points.contains(&(i as usize)) {
                    self.blend_map.set(i as usize, true)?;
                }
            }
        }
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        if self.config.scroll_speed != 0 {
            self.heat.scroll(self.config.scroll_speed);
        }
        self.spark();
        self.smooth()?;
        self.heat.sub(self.config.cooling);
        self.palette.colorize(self.heat.as_bytes(), buffer)
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
