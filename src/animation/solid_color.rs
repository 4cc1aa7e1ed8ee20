use embassy_time::Duration;

use super::{Animation, AnimationSettings, bound_len, ensure_bound};
use crate::color::Color;
use crate::color_map::{FillDirection, Span};
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::stream::StreamSlot;

/// Interval for the idle loop after the one-shot fill
pub const SOLID_COLOR_INTERVAL: Duration = Duration::from_millis(5000);

/// Fills the strip once, then idles
#[derive(Debug, Clone)]
pub struct SolidColor {
    settings: AnimationSettings,
    color: Color,
    stream: Option<StreamSlot>,
    computed_len: usize,
}

impl SolidColor {
    /// Fill with `stream` when given, otherwise with `color`
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        color: Color,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        Ok(Self {
            settings,
            color,
            stream,
            computed_len: bound_len(buffer, 1)?,
        })
    }
}

impl Animation for SolidColor {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        match &mut self.stream {
            Some(stream) => buffer.fill_from_stream(stream, Span::ALL, FillDirection::Forward),
            None => buffer.fill_solid(self.color, Span::ALL),
        }
    }

    fn compute_frame(&mut self, _buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        Ok(())
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}

