use alloc::vec::Vec;

use embassy_time::Duration;
use rand::Rng;

use super::{Animation, AnimationSettings, HeatPalette, bound_len, ensure_bound};
use crate::color::Color;
use crate::color_map::{ColorMap, FillDirection, Span};
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::rng::{EngineRng, seeded};
use crate::stream::{FadeMode, FadingWheel, StreamSlot};

/// Distance between insertion points
const SPACING: isize = 32;
/// Steps each cycle grows before it resets
const CYCLE_STEPS: isize = 16;
/// Palette slots: slot zero is off, 1..=32 come from the stream
const PALETTE_LEN: usize = 33;
const LEVELS: [u8; 2] = [15, 31];

/// Colors grow outward from points 32 pixels apart, then clear and restart
#[derive(Debug, Clone)]
pub struct Conjunction {
    settings: AnimationSettings,
    stream: StreamSlot,
    palette: ColorMap,
    levels: HeatPalette,
    heat: ColorMap,
    insert_points: Vec<isize>,
    step: isize,
    rng: EngineRng,
    computed_len: usize,
}

impl Conjunction {
    /// The stream refills the palette at the start of every cycle
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        let computed_len = bound_len(buffer, 1)?;
        let stream = match stream {
            Some(stream) => stream,
            None => StreamSlot::Fading(FadingWheel::new(25, 16, 0, FadeMode::Out)?),
        };
        let palette = ColorMap::new(PALETTE_LEN, 3)?;
        Ok(Self {
            settings,
            stream,
            levels: HeatPalette::new(&palette, buffer.order(), 0)?,
            palette,
            heat: ColorMap::new(computed_len, 1)?,
            insert_points: Vec::new(),
            step: 0,
            rng: seeded(settings.seed),
            computed_len,
        })
    }

    pub fn insert_points(&self) -> &[isize] {
        &self.insert_points
    }

    pub fn heat(&self) -> &[u8] {
        self.heat.as_bytes()
    }

    pub const fn palette(&self) -> &ColorMap {
        &self.palette
    }

    fn start_cycle(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        self.heat.as_bytes_mut().fill(0);
        buffer.clear();
        self.palette
            .fill_from_stream(&mut self.stream, Span::starting_at(1), FillDirection::Reverse)?;
        self.palette.set(0, Color::OFF)?;
        self.levels = HeatPalette::new(&self.palette, buffer.order(), 0)?;
        self.step = 0;

        let mut point = isize::from(self.rng.random::<u8>() & 0x1f);
        self.insert_points.clear();
        self.insert_points.push(point - SPACING);
        self.insert_points.push(point);
        while point < self.computed_len as isize {
            point += SPACING;
            self.insert_points.push(point);
        }
        Ok(())
    }
}

impl Animation for Conjunction {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        self.start_cycle(buffer)
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        let step = self.step;
        self.step += 1;
        if step >= CYCLE_STEPS {
            return self.start_cycle(buffer);
        }
        self.heat.sub(1);

        let len = self.computed_len as isize;
        let heat = self.heat.as_bytes_mut();
        for (j, &point) in self.insert_points.iter().enumerate() {
            let behind = point - step;
            let ahead = point + step;
            if (0..len).contains(&behind) {
                heat[behind as usize] = LEVELS[j % 2];
            }
            if (0..len).contains(&ahead) {
                heat[ahead as usize] = LEVELS[(j + 1) % 2];
            }
        }
        self.levels.colorize(self.heat.as_bytes(), buffer)
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
