//! Animation system with compile-time known variants
//!
//! All animations are stored in an enum so the scheduler can own one
//! without boxing. Each variant implements the [`Animation`] trait.

mod collision;
mod conjunction;
mod fire;
mod jitter;
mod lit_bits;
mod next_gen;
mod palette;
mod side_swipe;
mod solid_color;

use embassy_time::Duration;

pub use collision::{CollisionConfig, Convergent, Divergent};
pub use conjunction::Conjunction;
pub use fire::{FIRE_PALETTE_MIN, Fire, FireConfig};
pub use jitter::{Jitter, JitterConfig};
pub use lit_bits::{LitBits, LitBitsConfig};
pub use next_gen::{NextGen, NextGenConfig};
pub use palette::{HeatPalette, default_palette};
pub use side_swipe::{MAX_SWIPE_STREAMS, SideSwipe};
pub use solid_color::{SOLID_COLOR_INTERVAL, SolidColor};

use crate::error::{ConfigError, Result};
use crate::pixel_buffer::PixelBuffer;

/// Frame interval used unless a variant or the configuration says otherwise
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

const EFFECT_NAME_SOLID_COLOR: &str = "solid_color";
const EFFECT_NAME_NEXT_GEN: &str = "next_gen";
const EFFECT_NAME_LIT_BITS: &str = "lit_bits";
const EFFECT_NAME_JITTER: &str = "jitter";
const EFFECT_NAME_SIDE_SWIPE: &str = "side_swipe";
const EFFECT_NAME_CONVERGENT: &str = "convergent";
const EFFECT_NAME_DIVERGENT: &str = "divergent";
const EFFECT_NAME_FIRE: &str = "fire";
const EFFECT_NAME_CONJUNCTION: &str = "conjunction";

const EFFECT_ID_SOLID_COLOR: u8 = 0;
const EFFECT_ID_NEXT_GEN: u8 = 1;
const EFFECT_ID_LIT_BITS: u8 = 2;
const EFFECT_ID_JITTER: u8 = 3;
const EFFECT_ID_SIDE_SWIPE: u8 = 4;
const EFFECT_ID_CONVERGENT: u8 = 5;
const EFFECT_ID_DIVERGENT: u8 = 6;
const EFFECT_ID_FIRE: u8 = 7;
const EFFECT_ID_CONJUNCTION: u8 = 8;

pub trait Animation {
    /// Reset run-time state. Called exactly once per run, before any frame.
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()>;

    /// Compute frame number `frame` (starting at 1) into the buffer
    fn compute_frame(&mut self, buffer: &mut PixelBuffer, frame: u32) -> Result<()>;

    /// Pause between frames
    fn interval(&self) -> Duration;
}

/// Settings shared by every variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    pub interval: Duration,
    /// Value handed to the color wheel and palette generators
    pub brightness: u8,
    /// Seed for every random decision the animation makes
    pub seed: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            brightness: crate::stream::DEFAULT_BRIGHTNESS,
            seed: 0,
        }
    }
}

/// Whether newly lit pixels share one color or each draw their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Solid,
    Multi,
}

impl FillMode {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "solid" => Some(Self::Solid),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }
}

/// Computed pixel count of `buffer`, rejecting buffers with fewer than `min`
pub(crate) fn bound_len(buffer: &PixelBuffer, min: usize) -> Result<usize> {
    let len = buffer.computed_len();
    if len < min.max(1) {
        return Err(ConfigError::InvalidBuffer.into());
    }
    Ok(len)
}

/// Reject a buffer other than the one the animation was built for
pub(crate) fn ensure_bound(buffer: &PixelBuffer, computed_len: usize) -> Result<()> {
    if buffer.computed_len() == computed_len {
        Ok(())
    } else {
        Err(ConfigError::InvalidBuffer.into())
    }
}

/// Animation slot - enum containing all possible animations
#[derive(Debug, Clone)]
pub enum AnimationSlot {
    SolidColor(SolidColor),
    NextGen(NextGen),
    LitBits(LitBits),
    Jitter(Jitter),
    SideSwipe(SideSwipe),
    Convergent(Convergent),
    Divergent(Divergent),
    Fire(Fire),
    Conjunction(Conjunction),
}

impl Animation for AnimationSlot {
    fn setup(&mut self, buffer: &mut PixelBuffer) -> Result<()> {
        match self {
            Self::SolidColor(animation) => animation.setup(buffer),
            Self::NextGen(animation) => animation.setup(buffer),
            Self::LitBits(animation) => animation.setup(buffer),
            Self::Jitter(animation) => animation.setup(buffer),
            Self::SideSwipe(animation) => animation.setup(buffer),
            Self::Convergent(animation) => animation.setup(buffer),
            Self::Divergent(animation) => animation.setup(buffer),
            Self::Fire(animation) => animation.setup(buffer),
            Self::Conjunction(animation) => animation.setup(buffer),
        }
    }

    fn compute_frame(&mut self, buffer: &mut PixelBuffer, frame: u32) -> Result<()> {
        match self {
            Self::SolidColor(animation) => animation.compute_frame(buffer, frame),
            Self::NextGen(animation) => animation.compute_frame(buffer, frame),
            Self::LitBits(animation) => animation.compute_frame(buffer, frame),
            Self::Jitter(animation) => animation.compute_frame(buffer, frame),
            Self::SideSwipe(animation) => animation.compute_frame(buffer, frame),
            Self::Convergent(animation) => animation.compute_frame(buffer, frame),
            Self::Divergent(animation) => animation.compute_frame(buffer, frame),
            Self::Fire(animation) => animation.compute_frame(buffer, frame),
            Self::Conjunction(animation) => animation.compute_frame(buffer, frame),
        }
    }

    fn interval(&self) -> Duration {
        match self {
            Self::SolidColor(animation) => animation.interval(),
            Self::NextGen(animation) => animation.interval(),
            Self::LitBits(animation) => animation.interval(),
            Self::Jitter(animation) => animation.interval(),
            Self::SideSwipe(animation) => animation.interval(),
            Self::Convergent(animation) => animation.interval(),
            Self::Divergent(animation) => animation.interval(),
            Self::Fire(animation) => animation.interval(),
            Self::Conjunction(animation) => animation.interval(),
        }
    }
}

impl AnimationSlot {
    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::SolidColor(_) => EffectId::SolidColor,
            Self::NextGen(_) => EffectId::NextGen,
            Self::LitBits(_) => EffectId::LitBits,
            Self::Jitter(_) => EffectId::Jitter,
            Self::SideSwipe(_) => EffectId::SideSwipe,
            Self::Convergent(_) => EffectId::Convergent,
            Self::Divergent(_) => EffectId::Divergent,
            Self::Fire(_) => EffectId::Fire,
            Self::Conjunction(_) => EffectId::Conjunction,
        }
    }
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    SolidColor = EFFECT_ID_SOLID_COLOR,
    NextGen = EFFECT_ID_NEXT_GEN,
    LitBits = EFFECT_ID_LIT_BITS,
    Jitter = EFFECT_ID_JITTER,
    SideSwipe = EFFECT_ID_SIDE_SWIPE,
    Convergent = EFFECT_ID_CONVERGENT,
    Divergent = EFFECT_ID_DIVERGENT,
    Fire = EFFECT_ID_FIRE,
    Conjunction = EFFECT_ID_CONJUNCTION,
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_SOLID_COLOR => Self::SolidColor,
            EFFECT_ID_NEXT_GEN => Self::NextGen,
            EFFECT_ID_LIT_BITS => Self::LitBits,
            EFFECT_ID_JITTER => Self::Jitter,
            EFFECT_ID_SIDE_SWIPE => Self::SideSwipe,
            EFFECT_ID_CONVERGENT => Self::Convergent,
            EFFECT_ID_DIVERGENT => Self::Divergent,
            EFFECT_ID_FIRE => Self::Fire,
            EFFECT_ID_CONJUNCTION => Self::Conjunction,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SolidColor => EFFECT_NAME_SOLID_COLOR,
            Self::NextGen => EFFECT_NAME_NEXT_GEN,
            Self::LitBits => EFFECT_NAME_LIT_BITS,
            Self::Jitter => EFFECT_NAME_JITTER,
            Self::SideSwipe => EFFECT_NAME_SIDE_SWIPE,
            Self::Convergent => EFFECT_NAME_CONVERGENT,
            Self::Divergent => EFFECT_NAME_DIVERGENT,
            Self::Fire => EFFECT_NAME_FIRE,
            Self::Conjunction => EFFECT_NAME_CONJUNCTION,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_SOLID_COLOR => Some(Self::SolidColor),
            EFFECT_NAME_NEXT_GEN => Some(Self::NextGen),
            EFFECT_NAME_LIT_BITS => Some(Self::LitBits),
            EFFECT_NAME_JITTER => Some(Self::Jitter),
            EFFECT_NAME_SIDE_SWIPE => Some(Self::SideSwipe),
            EFFECT_NAME_CONVERGENT => Some(Self::Convergent),
            EFFECT_NAME_DIVERGENT => Some(Self::Divergent),
            EFFECT_NAME_FIRE => Some(Self::Fire),
            EFFECT_NAME_CONJUNCTION => Some(Self::Conjunction),
            _ => None,
        }
    }
}
