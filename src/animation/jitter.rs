use embassy_time::Duration;
use rand::Rng;

use super::lit_bits::LitPixels;
use super::{Animation, AnimationSettings, FillMode, bound_len, ensure_bound};
use crate::color::{Color, blend};
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::rng::{EngineRng, fork, seeded};
use crate::stream::{ColorStream, RandomPastel, StreamSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterConfig {
    /// Percent of the way faded toward the background per frame
    pub fade_percent: u8,
    /// Odds out of 256 that a frame sparks new pixels
    pub sparking: u8,
    pub background: Color,
    /// Rough share of pixels lit by a spark
    pub lit_percent: u8,
    pub fill_mode: FillMode,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            fade_percent: 40,
            sparking: 25,
            background: Color::from_u32(0x0a_0a0a, 3),
            lit_percent: 15,
            fill_mode: FillMode::Multi,
        }
    }
}

/// Random pixels spark and slowly fade back to the background
#[derive(Debug, Clone)]
pub struct Jitter {
    settings: AnimationSettings,
    config: JitterConfig,
    stream: StreamSlot,
    lit: LitPixels,
    rng: EngineRng,
    computed_len: usize,
}

impl Jitter {
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: JitterConfig,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        let computed_len = bound_len(buffer, 1)?;
        let stream = match stream {
            Some(stream) => stream,
            None => StreamSlot::RandomPastel(RandomPastel::new(
                buffer.bytes_per_pixel(),
                None,
                fork(settings.seed, 1),
            )?),
        };
        Ok(Self {
            settings,
            config: JitterConfig {
                background: config.background.with_channel_count(buffer.bytes_per_pixel()),
                ..config
            },
            stream,
            lit: LitPixels::new(computed_len, Some(config.lit_percent)),
            rng: seeded(settings.seed),
            computed_len,
        })
    }

    fn spark(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        let background = self.config.background;
        self.lit.reshuffle(&mut self.rng);
        let spark = self.stream.next_color();
        for i in 0..self.computed_len {
            if self.lit.is_lit(i)? {
                let color = match self.config.fill_mode {
                    FillMode::Solid => spark,
                    FillMode::Multi => self.stream.next_color(),
                };
                buffer.put(i, color);
            } else {
                let current = buffer.pixel(i);
                if current != background {
                    buffer.put(i, blend(current, background, i32::from(self.config.fade_percent)));
                }
            }
        }
        Ok(())
    }

    fn fade(&self, buffer: &mut PixelBuffer) -> Result<()> {
        let background = self.config.background;
        for i in 0..self.computed_len {
            let color = if self.lit.is_lit(i)? {
                blend(buffer.pixel(i), background, i32::from(self.config.fade_percent))
            } else {
                background
            };
            buffer.put(i, color);
        }
        Ok(())
    }
}

impl Animation for Jitter {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        self.lit.fill_pattern();
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        if self.rng.random::<u8>() < self.config.sparking {
            self.spark(buffer)
        } else {
            self.fade(buffer)
        }
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
