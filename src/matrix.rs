//! Two-dimensional addressing over a [`PixelBuffer`].

use crate::color::Color;
use crate::error::{ConfigError, Error, Result};
use crate::pixel_buffer::PixelBuffer;

/// How rows are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    /// Every row runs left to right
    Straight,
    /// Odd rows run right to left
    #[default]
    Snake,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMatrix {
    buffer: PixelBuffer,
    width: usize,
    height: usize,
    layout: MatrixLayout,
}

impl PixelMatrix {
    /// Wrap a buffer holding exactly `width * height` pixels
    pub fn new(buffer: PixelBuffer, width: usize, height: usize, layout: MatrixLayout) -> Result<Self> {
        if width.checked_mul(height) != Some(buffer.len()) {
            return Err(ConfigError::InvalidBuffer.into());
        }
        Ok(Self {
            buffer,
            width,
            height,
            layout,
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_inner(self) -> PixelBuffer {
        self.buffer
    }

    /// Strip index of `(x, y)`
    pub fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width {
            return Err(Error::index(x, self.width));
        }
        if y >= self.height {
            return Err(Error::index(y, self.height));
        }
        Ok(match self.layout {
            MatrixLayout::Snake if y % 2 == 1 => self.width * (y + 1) - x - 1,
            _ => self.width * y + x,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Color> {
        self.buffer.get(self.index(x, y)?)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        let index = self.index(x, y)?;
        self.buffer.set(index, color)
    }

    pub fn hline(&mut self, x: usize, y: usize, width: usize, color: Color) -> Result<()> {
        self.fill_rect(x, y, width, 1, color)
    }

    pub fn vline(&mut self, x: usize, y: usize, height: usize, color: Color) -> Result<()> {
        self.fill_rect(x, y, 1, height, color)
    }

    /// Fails before drawing anything if the rectangle leaves the matrix
    pub fn fill_rect(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        color: Color,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let last_x = x
            .checked_add(width - 1)
            .ok_or(Error::index(x, self.width))?;
        let last_y = y
            .checked_add(height - 1)
            .ok_or(Error::index(y, self.height))?;
        self.index(last_x, last_y)?;
        for iy in y..y + height {
            for ix in x..x + width {
                let index = self.index(ix, iy)?;
                self.buffer.set(index, color)?;
            }
        }
        Ok(())
    }
}
