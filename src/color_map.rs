//! Packed arrays of fixed-width color items.
//!
//! Used for palettes and for per-pixel scalar state such as heat maps
//! (one byte per item).

use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::color::{
    ChannelOp, ChannelOrder, Color, MAX_CHANNELS, Operand, apply_packed, gradient_at,
    step_increment,
};
use crate::error::{Error, Result};
use crate::stream::ColorStream;

/// Inclusive range of items. A missing or oversized end means "to the last item".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: Option<usize>,
}

impl Span {
    /// Every item
    pub const ALL: Self = Self {
        start: 0,
        end: None,
    };

    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub const fn starting_at(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Clamp against `len` items and reject empty or inverted spans
    pub(crate) fn resolve(self, len: usize) -> Result<RangeInclusive<usize>> {
        if self.start >= len {
            return Err(Error::index(self.start, len));
        }
        let end = self.end.map_or(len - 1, |end| end.min(len - 1));
        if self.start > end {
            return Err(Error::InvalidValue {
                reason: "span ends before it starts",
            });
        }
        Ok(self.start..=end)
    }
}

/// Order in which a span is filled from a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillDirection {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    bytes: Vec<u8>,
    bytes_per_item: usize,
}

impl ColorMap {
    /// `len` zeroed items of `bytes_per_item` bytes each
    pub fn new(len: usize, bytes_per_item: usize) -> Result<Self> {
        if bytes_per_item == 0 || bytes_per_item > MAX_CHANNELS {
            return Err(Error::InvalidValue {
                reason: "items are 1 to 4 bytes wide",
            });
        }
        Ok(Self {
            bytes: vec![0; len * bytes_per_item],
            bytes_per_item,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / self.bytes_per_item
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn bytes_per_item(&self) -> usize {
        self.bytes_per_item
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw item bytes. With one byte per item this is the value array.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Resolve a logical key: `-len < key < 0` counts back from the end
    fn slot(&self, key: isize) -> Result<usize> {
        let len = self.len() as isize;
        if (0..len).contains(&key) {
            Ok(key as usize)
        } else if -len < key && key < 0 {
            Ok((key + len) as usize)
        } else {
            Err(Error::IndexOutOfRange {
                index: key,
                len: self.len(),
            })
        }
    }

    pub fn get(&self, key: isize) -> Result<Color> {
        let start = self.slot(key)? * self.bytes_per_item;
        Color::from_slice(&self.bytes[start..start + self.bytes_per_item])
    }

    /// Store `color`. Writing at `key == len` appends one item.
    pub fn set(&mut self, key: isize, color: Color) -> Result<()> {
        let color = color.with_channel_count(self.bytes_per_item);
        if key == self.len() as isize {
            self.bytes.extend_from_slice(color.as_slice());
            return Ok(());
        }
        let start = self.slot(key)? * self.bytes_per_item;
        self.bytes[start..start + self.bytes_per_item].copy_from_slice(color.as_slice());
        Ok(())
    }

    pub fn push(&mut self, color: Color) {
        let color = color.with_channel_count(self.bytes_per_item);
        self.bytes.extend_from_slice(color.as_slice());
    }

    fn write(&mut self, index: usize, color: Color) {
        let width = self.bytes_per_item;
        let color = color.with_channel_count(width);
        self.bytes[index * width..(index + 1) * width].copy_from_slice(color.as_slice());
    }

    pub fn fill(&mut self, color: Color, span: Span) -> Result<()> {
        for i in span.resolve(self.len())? {
            self.write(i, color);
        }
        Ok(())
    }

    /// Linear gradient from `from` at the span start to exactly `to` at its end
    pub fn fill_gradient(&mut self, from: Color, to: Color, span: Span) -> Result<()> {
        let range = span.resolve(self.len())?;
        let (start, end) = (*range.start(), *range.end());
        let from = from.with_channel_count(self.bytes_per_item);
        let inc = step_increment(from, to, end - start);
        for step in 0..end - start {
            self.write(start + step, gradient_at(from, &inc, step));
        }
        self.write(end, to);
        Ok(())
    }

    /// Pull one color per slot from `stream`
    pub fn fill_from_stream<S: ColorStream + ?Sized>(
        &mut self,
        stream: &mut S,
        span: Span,
        direction: FillDirection,
    ) -> Result<()> {
        let range = span.resolve(self.len())?;
        match direction {
            FillDirection::Forward => {
                for i in range {
                    self.write(i, stream.next_color());
                }
            }
            FillDirection::Reverse => {
                for i in range.rev() {
                    self.write(i, stream.next_color());
                }
            }
        }
        Ok(())
    }

    /// Saturating channel arithmetic over every item
    pub fn apply(&mut self, op: ChannelOp, operand: Operand<'_>) -> Result<()> {
        let values = operand.resolve(self.bytes_per_item)?;
        apply_packed(&mut self.bytes, self.bytes_per_item, op, &values)
    }

    pub fn add(&mut self, value: u8) {
        for byte in &mut self.bytes {
            *byte = byte.saturating_add(value);
        }
    }

    pub fn sub(&mut self, value: u8) {
        for byte in &mut self.bytes {
            *byte = byte.saturating_sub(value);
        }
    }

    /// Rotate items; a positive step moves item `i` to `i + steps`
    pub fn scroll(&mut self, steps: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let shift = steps.rem_euclid(len as isize) as usize;
        self.bytes.rotate_right(shift * self.bytes_per_item);
    }

    /// Copy of the items with channels rearranged into hardware order
    pub fn to_hardware_order(&self, order: ChannelOrder) -> Result<Vec<u8>> {
        order.ensure_fits(self.bytes_per_item)?;
        let mut out = vec![0; self.bytes.len()];
        for (logical, physical) in self
            .bytes
            .chunks_exact(self.bytes_per_item)
            .zip(out.chunks_exact_mut(self.bytes_per_item))
        {
            order.scatter(logical, physical);
        }
        Ok(out)
    }
}
