//! Hardware-facing pixel storage.
//!
//! Pixels are kept packed in hardware channel order so a flush hands the
//! bytes straight to the sink. Animations only compute the first
//! `computed_len` pixels; the rest are derived at flush time according to
//! the [`RepeatMode`].

use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::HardwareSink;
use crate::color::{
    ChannelOp, ChannelOrder, Color, MAX_CHANNELS, Operand, apply_packed, blend, gradient_at,
    step_increment,
};
use crate::color_map::{FillDirection, Span};
use crate::error::{ConfigError, Error, HardwareError, Result};
use crate::stream::ColorStream;

/// How pixels past the computed prefix are derived at flush time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Leave them untouched
    #[default]
    None,
    /// Tile the prefix: `A B C A B C A`
    Stripe,
    /// Reflect the prefix back and forth: `A B C C B A A`
    Mirror,
}

impl RepeatMode {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "stripe" => Some(Self::Stripe),
            "mirror" => Some(Self::Mirror),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBufferConfig {
    /// Physical pixel count
    pub len: usize,
    /// Pixels computed by animations, defaults to `len`
    pub computed_len: Option<usize>,
    pub repeat_mode: RepeatMode,
    /// Byte order on the wire; also fixes the bytes per pixel
    pub order: ChannelOrder,
}

impl PixelBufferConfig {
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            computed_len: None,
            repeat_mode: RepeatMode::None,
            order: ChannelOrder::GRB,
        }
    }

    #[must_use]
    pub const fn with_repeat(mut self, computed_len: usize, repeat_mode: RepeatMode) -> Self {
        self.computed_len = Some(computed_len);
        self.repeat_mode = repeat_mode;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
    len: usize,
    computed_len: usize,
    repeat_mode: RepeatMode,
    order: ChannelOrder,
}

impl PixelBuffer {
    pub fn new(config: PixelBufferConfig) -> Result<Self> {
        let computed_len = config.computed_len.unwrap_or(config.len);
        if computed_len > config.len {
            return Err(ConfigError::InvalidBuffer.into());
        }
        let bytes_per_pixel = config.order.channel_count();
        Ok(Self {
            bytes: vec![0; config.len * bytes_per_pixel],
            len: config.len,
            computed_len,
            repeat_mode: config.repeat_mode,
            order: config.order,
        })
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pixels animations compute each frame
    pub const fn computed_len(&self) -> usize {
        self.computed_len
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        self.order.channel_count()
    }

    pub const fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub const fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Packed bytes in hardware order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set(&mut self, index: usize, color: Color) -> Result<()> {
        if index >= self.len {
            return Err(Error::index(index, self.len));
        }
        self.put(index, color);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<Color> {
        if index >= self.len {
            return Err(Error::index(index, self.len));
        }
        Ok(self.pixel(index))
    }

    /// Write without the bounds check; callers stay below `len`
    pub(crate) fn put(&mut self, index: usize, color: Color) {
        let bpp = self.bytes_per_pixel();
        let color = color.with_channel_count(bpp);
        let start = index * bpp;
        self.order
            .scatter(color.as_slice(), &mut self.bytes[start..start + bpp]);
    }

    pub(crate) fn pixel(&self, index: usize) -> Color {
        let bpp = self.bytes_per_pixel();
        let start = index * bpp;
        let mut logical = [0; MAX_CHANNELS];
        self.order
            .gather(&self.bytes[start..start + bpp], &mut logical[..bpp]);
        Color::from_slice(&logical[..bpp]).unwrap_or_default()
    }

    /// Replace the computed region with bytes already in hardware order
    pub fn write_computed(&mut self, bytes: &[u8]) -> Result<()> {
        let expected = self.computed_len * self.bytes_per_pixel();
        if bytes.len() != expected {
            return Err(HardwareError::LengthMismatch {
                expected,
                actual: bytes.len(),
            }
            .into());
        }
        self.bytes[..expected].copy_from_slice(bytes);
        Ok(())
    }

    /// Turn every pixel off, derived ones included
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// An end at or past `len` (or none) stops at the last computed pixel
    fn resolve(&self, span: Span) -> Result<RangeInclusive<usize>> {
        let end = match span.end {
            Some(end) if end < self.len => end,
            _ => self.computed_len.checked_sub(1).ok_or(ConfigError::InvalidBuffer)?,
        };
        Span::new(span.start, end).resolve(self.len)
    }

    pub fn fill_solid(&mut self, color: Color, span: Span) -> Result<()> {
        for i in self.resolve(span)? {
            self.put(i, color);
        }
        Ok(())
    }

    pub fn fill_gradient(&mut self, from: Color, to: Color, span: Span) -> Result<()> {
        let range = self.resolve(span)?;
        let (start, end) = (*range.start(), *range.end());
        let from = from.with_channel_count(self.bytes_per_pixel());
        let inc = step_increment(from, to, end - start);
        for step in 0..end - start {
            self.put(start + step, gradient_at(from, &inc, step));
        }
        self.put(end, to);
        Ok(())
    }

    pub fn fill_from_stream<S: ColorStream + ?Sized>(
        &mut self,
        stream: &mut S,
        span: Span,
        direction: FillDirection,
    ) -> Result<()> {
        let range = self.resolve(span)?;
        match direction {
            FillDirection::Forward => {
                for i in range {
                    self.put(i, stream.next_color());
                }
            }
            FillDirection::Reverse => {
                for i in range.rev() {
                    self.put(i, stream.next_color());
                }
            }
        }
        Ok(())
    }

    /// Move every lit pixel `pct` percent of the way toward `color`.
    /// Pixels that are already off stay off.
    pub fn blend_to_color(&mut self, color: Color, pct: i32, span: Span) -> Result<()> {
        for i in self.resolve(span)? {
            let current = self.pixel(i);
            if !current.is_off() {
                self.put(i, blend(current, color, pct));
            }
        }
        Ok(())
    }

    /// Saturating channel arithmetic over the computed pixels
    pub fn apply(&mut self, op: ChannelOp, operand: Operand<'_>) -> Result<()> {
        let bpp = self.bytes_per_pixel();
        let logical = operand.resolve(bpp)?;
        let mut physical = [0; MAX_CHANNELS];
        self.order.scatter(&logical[..bpp], &mut physical[..bpp]);
        apply_packed(
            &mut self.bytes[..self.computed_len * bpp],
            bpp,
            op,
            &physical,
        )
    }

    /// Rotate the computed pixels; a positive step moves pixel `i` to `i + steps`
    pub fn scroll(&mut self, steps: isize) {
        if self.computed_len == 0 {
            return;
        }
        let shift = steps.rem_euclid(self.computed_len as isize) as usize;
        let bpp = self.bytes_per_pixel();
        self.bytes[..self.computed_len * bpp].rotate_right(shift * bpp);
    }

    /// Derive pixels `computed_len..len` from the computed prefix
    pub fn expand(&mut self) {
        let computed = self.computed_len;
        if computed == 0 || computed == self.len {
            return;
        }
        let bpp = self.bytes_per_pixel();
        for i in computed..self.len {
            let source = match self.repeat_mode {
                RepeatMode::None => return,
                RepeatMode::Stripe => i % computed,
                RepeatMode::Mirror => {
                    let phase = (i - computed) % (2 * computed);
                    if phase < computed {
                        computed - 1 - phase
                    } else {
                        phase - computed
                    }
                }
            };
            self.bytes
                .copy_within(source * bpp..(source + 1) * bpp, i * bpp);
        }
    }

    /// Expand and hand the bytes to the sink. Any failure is fatal for the run.
    pub fn flush<S: HardwareSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let expected = self.len * self.bytes_per_pixel();
        if self.bytes.len() != expected {
            return Err(HardwareError::LengthMismatch {
                expected,
                actual: self.bytes.len(),
            }
            .into());
        }
        self.expand();
        sink.write(&self.bytes)?;
        Ok(())
    }
}
