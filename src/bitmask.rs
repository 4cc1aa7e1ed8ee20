//! Bit-packed per-pixel flags.
//!
//! Bits live in 32-bit words (bit `i` is bit `i % 32` of word `i / 32`).
//! Rotation is tracked as an offset so scrolling never moves data.

use alloc::vec;
use alloc::vec::Vec;

use rand::Rng;

use crate::error::{Error, Result};

/// Random 32-bit word with roughly `density` percent of its bits set.
///
/// Combines a few uniform draws with AND/OR instead of drawing every bit,
/// so the result only lands near the requested density.
pub fn rand32<R: Rng + ?Sized>(rng: &mut R, density: u8) -> u32 {
    let mut draw = || rng.random::<u32>();
    match density {
        0 => 0,
        1..=6 => draw() & draw() & draw() & draw(),
        7..=19 => draw() & draw() & draw(),
        20..=31 => draw() & draw(),
        32..=44 => draw() & (draw() | draw()),
        45..=56 => draw(),
        57..=69 => draw() | (draw() & draw()),
        70..=81 => draw() | draw(),
        82..=94 => draw() | draw() | draw(),
        100.. => u32::MAX,
        _ => draw() | draw() | draw() | draw(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    words: Vec<u32>,
    len: usize,
    offset: usize,
}

impl BitMask {
    /// All-clear mask of `len` bits
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(32)],
            len,
            offset: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing words, in physical (unrotated) order
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    fn physical(&self, index: usize) -> Result<usize> {
        if index >= self.len {
            return Err(Error::index(index, self.len));
        }
        Ok((index + self.offset) % self.len)
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        let bit = self.physical(index)?;
        Ok(self.words[bit / 32] & (1 << (bit % 32)) != 0)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        let bit = self.physical(index)?;
        let mask = 1 << (bit % 32);
        if value {
            self.words[bit / 32] |= mask;
        } else {
            self.words[bit / 32] &= !mask;
        }
        Ok(())
    }

    /// Rotate by `steps`; `get(i)` afterwards returns what `get(i - steps)` did
    pub fn scroll(&mut self, steps: isize) {
        if self.len == 0 {
            return;
        }
        let len = self.len as isize;
        let steps = steps.rem_euclid(len);
        self.offset = (self.offset as isize - steps).rem_euclid(len) as usize;
    }

    /// Refill every word at roughly `density` percent ones. Clears rotation.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: u8) {
        self.offset = 0;
        for word in &mut self.words {
            *word = rand32(rng, density);
        }
    }

    /// Tile `pattern` across the mask. Clears rotation.
    ///
    /// The tile is as many little-endian bytes as `pattern` needs (1-4), so
    /// `0x77` repeats every 8 bits and `0x0123_4567` every 32.
    pub fn fill_repeating(&mut self, pattern: u32) {
        self.offset = 0;
        let tile = pattern.to_le_bytes();
        let width = match pattern {
            0..=0xff => 1,
            0x100..=0xffff => 2,
            0x1_0000..=0xff_ffff => 3,
            _ => 4,
        };
        for (w, word) in self.words.iter_mut().enumerate() {
            let mut bytes = [0; 4];
            for (j, byte) in bytes.iter_mut().enumerate() {
                *byte = tile[(w * 4 + j) % width];
            }
            *word = u32::from_le_bytes(bytes);
        }
    }

    /// Set every bit
    pub fn fill(&mut self, value: bool) {
        self.offset = 0;
        self.words.fill(if value { u32::MAX } else { 0 });
    }

    /// Number of set bits among the `len` logical positions
    pub fn count_ones(&self) -> usize {
        (0..self.len)
            .filter(|&bit| self.words[bit / 32] & (1 << (bit % 32)) != 0)
            .count()
    }

    /// Logical bits in order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| {
            let bit = (i + self.offset) % self.len;
            self.words[bit / 32] & (1 << (bit % 32)) != 0
        })
    }
}
