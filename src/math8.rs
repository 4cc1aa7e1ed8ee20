//! 8-bit channel arithmetic.
//!
//! Every helper saturates into `0..=255`; nothing here wraps.

/// Clamp an integer into the 8-bit channel range
#[inline]
pub const fn saturate8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// Truncate a float toward zero and clamp it into the 8-bit channel range
#[inline]
pub fn saturate8f(value: f32) -> u8 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        value as u8
    }
}

/// Saturating 8-bit addition
#[inline]
pub const fn add8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating 8-bit subtraction
#[inline]
pub const fn sub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// Saturating 8-bit multiplication
#[inline]
pub const fn mult8(a: u8, b: u8) -> u8 {
    saturate8(a as i32 * b as i32)
}

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Map a percentage (0-100) onto the 0-255 range, clamping above 100
#[inline]
pub const fn percent_to_u8(percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    ((percent as u16 * 255) / 100) as u8
}

/// Sine on a 255 "degree" circle, returns -1.0..=1.0
#[inline]
pub fn sin8(value: f32) -> f32 {
    libm::sinf(value / 127.5 * core::f32::consts::PI)
}
