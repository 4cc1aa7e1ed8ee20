use alloc::vec::Vec;

use super::ColorStream;
use crate::color::{Color, MAX_CHANNELS, color_wheel, gradient_at, step_increment};
use crate::error::{ConfigError, Result};
use crate::math8::{saturate8, sin8};

/// Current hue and how far it moves per step, modulo 255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HueWalk {
    hue: u8,
    stride: i16,
}

impl HueWalk {
    const fn new(start_hue: u8, stride: i16) -> Self {
        Self {
            hue: start_hue % 255,
            stride,
        }
    }

    /// Zero stride would freeze the wheel, so it becomes one step forward
    const fn moving(start_hue: u8, stride: i16) -> Self {
        Self::new(start_hue, if stride == 0 { 1 } else { stride })
    }

    const fn offset(self, by: i16) -> u8 {
        (self.hue as i32 + by as i32).rem_euclid(255) as u8
    }

    const fn advance(&mut self) {
        self.hue = self.offset(self.stride);
    }
}

/// Longest stripe a wheel stream accepts
pub const MAX_STRIPE_SIZE: usize = 1024;

fn check_stripe(stripe_size: usize, min: usize) -> Result<()> {
    if stripe_size < min {
        return Err(ConfigError::StripeTooShort { size: stripe_size }.into());
    }
    if stripe_size > MAX_STRIPE_SIZE {
        return Err(ConfigError::StripeTooLong {
            size: stripe_size,
            max: MAX_STRIPE_SIZE,
        }
        .into());
    }
    Ok(())
}

/// Fades across each stripe from the current hue toward the next hue at a
/// quarter of the brightness.
#[derive(Debug, Clone)]
pub struct SteppedWheel {
    walk: HueWalk,
    stripe_size: usize,
    brightness: u8,
    pos: usize,
    base: Color,
    inc: [f32; MAX_CHANNELS],
}

impl SteppedWheel {
    pub fn new(hue_stride: i16, stripe_size: usize, start_hue: u8, brightness: u8) -> Result<Self> {
        check_stripe(stripe_size, 1)?;
        Ok(Self {
            walk: HueWalk::moving(start_hue, hue_stride),
            stripe_size,
            brightness,
            pos: 0,
            base: Color::OFF,
            inc: [0.0; MAX_CHANNELS],
        })
    }
}

impl ColorStream for SteppedWheel {
    fn next_color(&mut self) -> Color {
        if self.pos == 0 {
            let from = Color::from(color_wheel(self.walk.hue, self.brightness));
            let to = Color::from(color_wheel(
                self.walk.offset(self.walk.stride),
                self.brightness >> 2,
            ));
            self.base = from;
            self.inc = step_increment(from, to, self.stripe_size - 1);
        }
        let color = gradient_at(self.base, &self.inc, self.pos);
        self.pos += 1;
        if self.pos == self.stripe_size {
            self.pos = 0;
            self.walk.advance();
        }
        color
    }
}

/// Repeats one flat color `stripe_size` times per hue step
#[derive(Debug, Clone)]
pub struct StripedWheel {
    walk: HueWalk,
    stripe_size: usize,
    brightness: u8,
    pos: usize,
}

impl StripedWheel {
    pub fn new(hue_stride: i16, stripe_size: usize, start_hue: u8, brightness: u8) -> Result<Self> {
        check_stripe(stripe_size, 1)?;
        Ok(Self {
            walk: HueWalk::moving(start_hue, hue_stride),
            stripe_size,
            brightness,
            pos: 0,
        })
    }

    pub const fn hue(&self) -> u8 {
        self.walk.hue
    }
}

impl ColorStream for StripedWheel {
    fn next_color(&mut self) -> Color {
        let color = Color::from(color_wheel(self.walk.hue, self.brightness));
        self.pos += 1;
        if self.pos == self.stripe_size {
            self.pos = 0;
            self.walk.advance();
        }
        color
    }
}

/// Brightness envelope replayed by [`FadingWheel`] at every hue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FadeMode {
    /// Dark to bright
    In,
    /// Bright to dark
    #[default]
    Out,
    /// Dark, bright, dark
    InOut,
}

impl FadeMode {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "in" | "fade_in" => Some(Self::In),
            "out" | "fade_out" => Some(Self::Out),
            "in_out" | "fade_in_out" => Some(Self::InOut),
            _ => None,
        }
    }

    /// Sine ramp sampled at `len` points
    fn curve(self, len: usize) -> Vec<u8> {
        let span = (len - 1) as f32;
        (0..len)
            .map(|i| {
                let i = i as f32;
                match self {
                    Self::InOut => saturate8(2 + (sin8(i * 127.5 / span) * 253.0) as i32),
                    Self::Out => saturate8(255 - (sin8(i * 63.75 / span) * 253.0) as i32),
                    Self::In => {
                        saturate8(255 - (sin8(63.75 + i * 63.75 / span) * 253.0) as i32)
                    }
                }
            })
            .collect()
    }
}

/// Holds each hue for a full fade envelope before moving on
#[derive(Debug, Clone)]
pub struct FadingWheel {
    walk: HueWalk,
    curve: Vec<u8>,
    pos: usize,
}

impl FadingWheel {
    pub fn new(hue_stride: i16, stripe_size: usize, start_hue: u8, mode: FadeMode) -> Result<Self> {
        check_stripe(stripe_size, 2)?;
        Ok(Self {
            walk: HueWalk::moving(start_hue, hue_stride),
            curve: mode.curve(stripe_size),
            pos: 0,
        })
    }

    /// Brightness values replayed at every hue
    pub fn curve(&self) -> &[u8] {
        &self.curve
    }
}

impl ColorStream for FadingWheel {
    fn next_color(&mut self) -> Color {
        let color = Color::from(color_wheel(self.walk.hue, self.curve[self.pos]));
        self.pos += 1;
        if self.pos == self.curve.len() {
            self.pos = 0;
            self.walk.advance();
        }
        color
    }
}

/// Alternates a hue with its opposite on the wheel
#[derive(Debug, Clone)]
pub struct ComplementWheel {
    walk: HueWalk,
    stripe_size: usize,
    brightness: u8,
    pos: usize,
}

impl ComplementWheel {
    pub fn new(hue_stride: i16, stripe_size: usize, start_hue: u8, brightness: u8) -> Result<Self> {
        check_stripe(stripe_size, 1)?;
        Ok(Self {
            walk: HueWalk::new(start_hue, hue_stride),
            stripe_size,
            brightness,
            pos: 0,
        })
    }
}

impl ColorStream for ComplementWheel {
    fn next_color(&mut self) -> Color {
        let hue = if self.pos < self.stripe_size {
            self.walk.hue
        } else {
            self.walk.offset(127)
        };
        self.pos += 1;
        if self.pos == 2 * self.stripe_size {
            self.pos = 0;
            self.walk.advance();
        }
        Color::from(color_wheel(hue, self.brightness))
    }
}
