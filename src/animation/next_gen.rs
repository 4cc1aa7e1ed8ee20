use embassy_time::Duration;

use super::{Animation, AnimationSettings, bound_len, ensure_bound};
use crate::color::Color;
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::stream::{ColorStream, StreamSlot, StripedWheel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextGenConfig {
    /// Dark pixels between injected colors
    pub blanks: usize,
    /// Scroll direction; anything else is clamped to -1 or 1
    pub scroll_speed: isize,
}

impl Default for NextGenConfig {
    fn default() -> Self {
        Self {
            blanks: 0,
            scroll_speed: 1,
        }
    }
}

/// Scrolls the strip one pixel per frame and feeds the next stream color
/// in at the leading edge.
#[derive(Debug, Clone)]
pub struct NextGen {
    settings: AnimationSettings,
    config: NextGenConfig,
    stream: StreamSlot,
    computed_len: usize,
    insert_point: usize,
}

impl NextGen {
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        config: NextGenConfig,
        stream: Option<StreamSlot>,
    ) -> Result<Self> {
        let stream = match stream {
            Some(stream) => stream,
            None => StreamSlot::Striped(StripedWheel::new(10, 1, 0, settings.brightness)?),
        };
        let scroll_speed = config.scroll_speed.clamp(-1, 1);
        Ok(Self {
            settings,
            config: NextGenConfig {
                scroll_speed: if scroll_speed == 0 { 1 } else { scroll_speed },
                ..config
            },
            stream,
            computed_len: bound_len(buffer, 1)?,
            insert_point: 0,
        })
    }

    pub const fn insert_point(&self) -> usize {
        self.insert_point
    }
}

impl Animation for NextGen {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        // Prefill against the scroll direction so the strip starts full
        if self.config.scroll_speed < 0 {
            self.insert_point = self.computed_len - 1;
            for i in (0..self.computed_len).step_by(self.config.blanks.saturating_add(1)) {
                buffer.put(i, self.stream.next_color());
            }
        } else {
            self.insert_point = 0;
            for i in (0..self.computed_len).rev() {
                buffer.put(i, self.stream.next_color());
            }
        }
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, frame: u32) -> Result<()> {
        buffer.scroll(self.config.scroll_speed);
        let color = if self.config.blanks == 0
            || frame as usize % self.config.blanks.saturating_add(1) == 0
        {
            self.stream.next_color()
        } else {
            Color::OFF
        };
        buffer.set(self.insert_point, color)
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
