//! Two movers per cycle that either meet in the middle or run apart.

use embassy_time::Duration;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{Animation, AnimationSettings, FillMode, bound_len, default_palette, ensure_bound};
use crate::color::Color;
use crate::color_map::{ColorMap, FillDirection, Span};
use crate::error::{ConfigError, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::rng::seeded;
use crate::stream::StreamSlot;

const DEFAULT_PALETTE_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionConfig {
    /// `Multi` switches palette color on every re-seed, `Solid` only per cycle
    pub fill_mode: FillMode,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Inward,
    Outward,
}

#[derive(Debug, Clone)]
struct Movers {
    settings: AnimationSettings,
    config: CollisionConfig,
    heading: Heading,
    base_palette: ColorMap,
    palette: ColorMap,
    stream: Option<StreamSlot>,
    computed_len: usize,
    insert_points: [usize; 2],
    movers: Vec<usize, 2>,
    palette_index: usize,
    color: Color,
    cycles: u32,
}

impl Movers {
    fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: CollisionConfig,
        heading: Heading,
        palette: Option<ColorMap>,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        let computed_len = match heading {
            Heading::Inward => bound_len(buffer, 2)?,
            Heading::Outward => bound_len(buffer, 3)?,
        };
        let palette = match palette {
            Some(palette) => palette,
            None => default_palette(DEFAULT_PALETTE_LEN, settings.brightness, &mut seeded(settings.seed))?,
        };
        if palette.is_empty() {
            return Err(ConfigError::PaletteTooShort { min: 1, len: 0 }.into());
        }
        let insert_points = match heading {
            Heading::Inward => [0, computed_len - 1],
            Heading::Outward => [computed_len / 2, computed_len / 2 + 1],
        };
        Ok(Self {
            settings,
            config,
            heading,
            palette: palette.clone(),
            base_palette: palette,
            stream,
            computed_len,
            insert_points,
            movers: Vec::new(),
            palette_index: 0,
            color: Color::OFF,
            cycles: 0,
        })
    }

    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        self.palette.clone_from(&self.base_palette);
        if let Some(stream) = &mut self.stream {
            self.palette
                .fill_from_stream(stream, Span::ALL, FillDirection::Forward)?;
        }
        self.palette_index = 0;
        self.cycles = 0;
        self.start_cycle(buffer)
    }

    fn next_color(&mut self) -> Result<()> {
        self.palette_index = (self.palette_index + 1) % self.palette.len();
        self.color = self.palette.get(self.palette_index as isize)?;
        Ok(())
    }

    fn seed_insert_points(&mut self, buffer: &mut PixelBuffer) {
        self.movers.clear();
        for &point in &self.insert_points {
            buffer.put(point, self.color);
            // capacity matches the two insertion points
            let _ = self.movers.push(point);
        }
    }

    fn start_cycle(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        buffer.clear();
        self.next_color()?;
        self.seed_insert_points(buffer);
        self.cycles += 1;
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        let mut step: isize = match self.heading {
            Heading::Inward => 1,
            Heading::Outward => -1,
        };
        let mut moved: Vec<usize, 2> = Vec::new();
        let mut reseed = false;
        let mut new_cycle = false;

        for &mover in &self.movers {
            let target = mover as isize + step;
            step = -step;
            if !(0..self.computed_len as isize).contains(&target) {
                match self.heading {
                    Heading::Inward => {
                        #[cfg(feature = "esp32-log")]
                        println!("[collision] mover {} left the strip", mover);
                    }
                    Heading::Outward => reseed = true,
                }
                continue;
            }
            let target = target as usize;
            if buffer.pixel(target).is_off() {
                buffer.put(target, buffer.pixel(mover));
                buffer.put(mover, Color::OFF);
                let _ = moved.push(target);
            } else if self.insert_points.contains(&mover) {
                new_cycle = true;
            } else {
                reseed = true;
            }
        }

        if new_cycle {
            return self.start_cycle(buffer);
        }
        if reseed {
            if self.config.fill_mode == FillMode::Multi {
                self.next_color()?;
            }
            self.seed_insert_points(buffer);
        } else {
            self.movers = moved;
        }
        Ok(())
    }
}

/// Movers start at both ends and march toward each other. Each collision
/// stacks up in the middle until the insertion points are blocked, which
/// starts a new cycle.
#[derive(Debug, Clone)]
pub struct Convergent(Movers);

impl Convergent {
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: CollisionConfig,
        palette: Option<ColorMap>,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        Movers::new(buffer, settings, config, Heading::Inward, palette, stream).map(Self)
    }

    /// Cycles started since setup, the first one included
    pub const fn cycles(&self) -> u32 {
        self.0.cycles
    }

    pub fn movers(&self) -> &[usize] {
        &self.0.movers
    }

    pub const fn insert_points(&self) -> [usize; 2] {
        self.0.insert_points
    }
}

impl Animation for Convergent {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        self.0.setup(buffer)
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        self.0.compute_frame(buffer)
    }

    fn interval(&self) -> Duration {
        self.0.settings.interval
    }
}

/// Movers start next to the midpoint and run apart. A mover reaching an
/// end re-seeds the midpoint.
#[derive(Debug, Clone)]
pub struct Divergent(Movers);

impl Divergent {
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: CollisionConfig,
        palette: Option<ColorMap>,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        Movers::new(buffer, settings, config, Heading::Outward, palette, stream).map(Self)
    }

    /// Cycles started since setup, the first one included
    pub const fn cycles(&self) -> u32 {
        self.0.cycles
    }

    pub fn movers(&self) -> &[usize] {
        &self.0.movers
    }

    pub const fn insert_points(&self) -> [usize; 2] {
        self.0.insert_points
    }
}

impl Animation for Divergent {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        self.0.setup(buffer)
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        self.0.compute_frame(buffer)
    }

    fn interval(&self) -> Duration {
        self.0.settings.interval
    }
}
