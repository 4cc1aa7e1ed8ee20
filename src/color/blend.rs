use super::{Color, MAX_CHANNELS};
use crate::math8::{saturate8, saturate8f};

/// Blend `c1` with `pct` percent of `c2`.
///
/// A percentage outside `0..=100` returns `c1` unchanged.
/// The result keeps the channel count of `c1`.
pub fn blend(c1: Color, c2: Color, pct: i32) -> Color {
    if !(0..=100).contains(&pct) {
        return c1;
    }
    let mut out = c1;
    for i in 0..c1.channel_count() {
        let a = i32::from(c1.channel(i));
        let b = i32::from(c2.channel(i));
        out.channels[i] = saturate8((a * 100 + (b - a) * pct) / 100);
    }
    out
}

/// Per-channel increments that walk from `c1` to `c2` in `steps` segments
pub fn step_increment(c1: Color, c2: Color, steps: usize) -> [f32; MAX_CHANNELS] {
    let mut inc = [0.0; MAX_CHANNELS];
    if steps == 0 {
        return inc;
    }
    let steps = steps as f32;
    for (i, slot) in inc.iter_mut().enumerate().take(c1.channel_count()) {
        *slot = (f32::from(c2.channel(i)) - f32::from(c1.channel(i))) / steps;
    }
    inc
}

/// Color `step` increments away from `base`
pub(crate) fn gradient_at(base: Color, inc: &[f32; MAX_CHANNELS], step: usize) -> Color {
    let mut out = base;
    for i in 0..base.channel_count() {
        out.channels[i] = saturate8f(f32::from(base.channel(i)) + inc[i] * step as f32);
    }
    out
}
