use embassy_time::Duration;
use heapless::Vec;

use super::{Animation, AnimationSettings, bound_len, ensure_bound};
use crate::error::{ConfigError, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::rng::fork;
use crate::stream::{ColorStream, RandomVivid, StreamSlot, StripedWheel};

/// Streams a single [`SideSwipe`] can rotate through
pub const MAX_SWIPE_STREAMS: usize = 4;

/// A cursor sweeping back and forth, switching streams at every bounce
#[derive(Debug, Clone)]
pub struct SideSwipe {
    settings: AnimationSettings,
    streams: Vec<StreamSlot, MAX_SWIPE_STREAMS>,
    computed_len: usize,
    location: usize,
    forward: bool,
    cycle: usize,
    active: usize,
}

impl SideSwipe {
    /// Rotate through `streams`, or a vivid and a striped wheel when empty
    pub fn new(
        buffer: &PixelBuffer,
        settings: AnimationSettings,
        streams: Vec<StreamSlot, MAX_SWIPE_STREAMS>,
    ) -> Result<Self> {
        let streams = if streams.is_empty() {
            Self::default_streams(settings)?
        } else {
            streams
        };
        Ok(Self {
            settings,
            streams,
            computed_len: bound_len(buffer, 1)?,
            location: 0,
            forward: true,
            cycle: 0,
            active: 0,
        })
    }

    fn default_streams(settings: AnimationSettings) -> Result<Vec<StreamSlot, MAX_SWIPE_STREAMS>> {
        let mut streams = Vec::new();
        let defaults = [
            StreamSlot::RandomVivid(RandomVivid::new(settings.brightness, fork(settings.seed, 1))),
            StreamSlot::Striped(StripedWheel::new(20, 10, 0, settings.brightness)?),
        ];
        for stream in defaults {
            streams.push(stream).map_err(|_| ConfigError::CapacityExceeded {
                what: "swipe streams",
                max: MAX_SWIPE_STREAMS,
            })?;
        }
        Ok(streams)
    }

    /// Completed sweeps since setup
    pub const fn cycle(&self) -> usize {
        self.cycle
    }

    pub const fn location(&self) -> usize {
        self.location
    }
}

impl Animation for SideSwipe {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        ensure_bound(buffer, self.computed_len)?;
        buffer.clear();
        self.location = 0;
        self.forward = true;
        self.cycle = 0;
        self.active = 0;
        Ok(())
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, _frame: u32) -> Result<()> {
        let color = self.streams[self.active].next_color();
        buffer.set(self.location, color)?;
        let next = if self.forward {
            self.location.checked_add(1).filter(|&n| n < self.computed_len)
        } else {
            self.location.checked_sub(1)
        };
        match next {
            Some(next) => self.location = next,
            None => {
                self.cycle += 1;
                self.active = self.cycle % self.streams.len();
                self.forward = !self.forward;
            }
        }
        Ok(())
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }
}
