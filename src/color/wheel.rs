use super::Rgb;

/// Width of one band on the 255 step color wheel
const BAND: u8 = 85;

/// Color wheel with 255 hue steps, always at full saturation.
///
/// The wheel runs red -> green -> blue -> red, scaled by `value`.
#[allow(clippy::cast_lossless)]
pub const fn color_wheel(hue: u8, value: u8) -> Rgb {
    let hue = hue % 255;
    let pa = hue % BAND;
    let ci = ((value as u16 * pa as u16) / BAND as u16) as u8;
    let cd = value - ci;
    if hue < BAND {
        Rgb { r: cd, g: ci, b: 0 }
    } else if hue < 2 * BAND {
        Rgb { r: 0, g: cd, b: ci }
    } else {
        Rgb { r: ci, g: 0, b: cd }
    }
}

/// Loose approximation of black body radiation.
///
/// Black -> red -> yellow -> white over the 0-255 temperature range.
#[allow(clippy::cast_lossless)]
pub const fn heat_color(temp: u8) -> Rgb {
    let t191 = ((temp as u16 * 191) / 255) as u8;
    let ramp = (t191 & 63) << 2;
    if t191 < 64 {
        Rgb { r: ramp, g: 0, b: 0 }
    } else if t191 < 128 {
        Rgb {
            r: 255,
            g: ramp,
            b: 0,
        }
    } else {
        Rgb {
            r: 255,
            g: 255,
            b: ramp,
        }
    }
}
