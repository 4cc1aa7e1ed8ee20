//! Infinite color streams.
//!
//! A stream never ends and cannot be rewound: each call to
//! [`ColorStream::next_color`] advances its internal state by one value.
//! All streams are stored in [`StreamSlot`] so animations can own one
//! without boxing.

mod random;
mod wheel;

use heapless::Vec;

pub use random::{RandomPastel, RandomVivid};
pub use wheel::{
    ComplementWheel, FadeMode, FadingWheel, MAX_STRIPE_SIZE, SteppedWheel, StripedWheel,
};

use crate::color::Color;
use crate::error::Result;

/// Brightness used when nothing else is configured
pub const DEFAULT_BRIGHTNESS: u8 = 200;

const STREAM_NAME_STEPPED: &str = "stepped_color_wheel";
const STREAM_NAME_STRIPED: &str = "striped_color_wheel";
const STREAM_NAME_FADING: &str = "fading_color_wheel";
const STREAM_NAME_COMPLEMENT: &str = "color_complement";
const STREAM_NAME_COMPLEMENT_ALIAS: &str = "color_compliment";
const STREAM_NAME_RANDOM_VIVID: &str = "random_vivid";
const STREAM_NAME_RANDOM_PASTEL: &str = "random_pastel";

const STREAM_ID_STEPPED: u8 = 0;
const STREAM_ID_STRIPED: u8 = 1;
const STREAM_ID_FADING: u8 = 2;
const STREAM_ID_COMPLEMENT: u8 = 3;
const STREAM_ID_RANDOM_VIVID: u8 = 4;
const STREAM_ID_RANDOM_PASTEL: u8 = 5;

pub trait ColorStream {
    /// Advance by one step and return the produced color
    fn next_color(&mut self) -> Color;
}

impl<T: ColorStream + ?Sized> ColorStream for &mut T {
    fn next_color(&mut self) -> Color {
        (**self).next_color()
    }
}

/// Stream slot - enum containing every stream variant
#[derive(Debug, Clone)]
pub enum StreamSlot {
    Stepped(SteppedWheel),
    Striped(StripedWheel),
    Fading(FadingWheel),
    Complement(ComplementWheel),
    RandomVivid(RandomVivid),
    RandomPastel(RandomPastel),
}

impl ColorStream for StreamSlot {
    fn next_color(&mut self) -> Color {
        match self {
            Self::Stepped(stream) => stream.next_color(),
            Self::Striped(stream) => stream.next_color(),
            Self::Fading(stream) => stream.next_color(),
            Self::Complement(stream) => stream.next_color(),
            Self::RandomVivid(stream) => stream.next_color(),
            Self::RandomPastel(stream) => stream.next_color(),
        }
    }
}

impl StreamSlot {
    pub fn id(&self) -> StreamId {
        match self {
            Self::Stepped(_) => StreamId::SteppedColorWheel,
            Self::Striped(_) => StreamId::StripedColorWheel,
            Self::Fading(_) => StreamId::FadingColorWheel,
            Self::Complement(_) => StreamId::ColorComplement,
            Self::RandomVivid(_) => StreamId::RandomVivid,
            Self::RandomPastel(_) => StreamId::RandomPastel,
        }
    }
}

/// Known stream ids that can be requested by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum StreamId {
    SteppedColorWheel = STREAM_ID_STEPPED,
    StripedColorWheel = STREAM_ID_STRIPED,
    FadingColorWheel = STREAM_ID_FADING,
    ColorComplement = STREAM_ID_COMPLEMENT,
    RandomVivid = STREAM_ID_RANDOM_VIVID,
    RandomPastel = STREAM_ID_RANDOM_PASTEL,
}

impl StreamId {
    pub const ALL: [Self; 6] = [
        Self::SteppedColorWheel,
        Self::StripedColorWheel,
        Self::FadingColorWheel,
        Self::ColorComplement,
        Self::RandomVivid,
        Self::RandomPastel,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            STREAM_ID_STEPPED => Self::SteppedColorWheel,
            STREAM_ID_STRIPED => Self::StripedColorWheel,
            STREAM_ID_FADING => Self::FadingColorWheel,
            STREAM_ID_COMPLEMENT => Self::ColorComplement,
            STREAM_ID_RANDOM_VIVID => Self::RandomVivid,
            STREAM_ID_RANDOM_PASTEL => Self::RandomPastel,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SteppedColorWheel => STREAM_NAME_STEPPED,
            Self::StripedColorWheel => STREAM_NAME_STRIPED,
            Self::FadingColorWheel => STREAM_NAME_FADING,
            Self::ColorComplement => STREAM_NAME_COMPLEMENT,
            Self::RandomVivid => STREAM_NAME_RANDOM_VIVID,
            Self::RandomPastel => STREAM_NAME_RANDOM_PASTEL,
        }
    }

    /// Look up a stream by name. Unknown names mean "no stream".
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            STREAM_NAME_STEPPED => Some(Self::SteppedColorWheel),
            STREAM_NAME_STRIPED => Some(Self::StripedColorWheel),
            STREAM_NAME_FADING => Some(Self::FadingColorWheel),
            STREAM_NAME_COMPLEMENT | STREAM_NAME_COMPLEMENT_ALIAS => {
                Some(Self::ColorComplement)
            }
            STREAM_NAME_RANDOM_VIVID => Some(Self::RandomVivid),
            STREAM_NAME_RANDOM_PASTEL => Some(Self::RandomPastel),
            _ => None,
        }
    }

    /// Construct the stream, validating its parameters
    pub fn to_slot(self, params: &StreamParams) -> Result<StreamSlot> {
        let hue_stride = params.hue_stride.unwrap_or(10);
        let start_hue = params.start_hue;
        let brightness = params.brightness;
        Ok(match self {
            Self::SteppedColorWheel => StreamSlot::Stepped(SteppedWheel::new(
                hue_stride,
                params.stripe_size.unwrap_or(20),
                start_hue,
                brightness,
            )?),
            Self::StripedColorWheel => StreamSlot::Striped(StripedWheel::new(
                hue_stride,
                params.stripe_size.unwrap_or(10),
                start_hue,
                brightness,
            )?),
            Self::FadingColorWheel => StreamSlot::Fading(FadingWheel::new(
                hue_stride,
                params.stripe_size.unwrap_or(20),
                start_hue,
                params.fade,
            )?),
            Self::ColorComplement => StreamSlot::Complement(ComplementWheel::new(
                hue_stride,
                params.stripe_size.unwrap_or(1),
                start_hue,
                brightness,
            )?),
            Self::RandomVivid => {
                StreamSlot::RandomVivid(RandomVivid::new(brightness, params.seed))
            }
            Self::RandomPastel => StreamSlot::RandomPastel(RandomPastel::new(
                params.channel_count,
                params.mask.as_deref(),
                params.seed,
            )?),
        })
    }
}

/// Named stream parameters. `None` picks the per-stream default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamParams {
    pub hue_stride: Option<i16>,
    pub stripe_size: Option<usize>,
    pub start_hue: u8,
    pub fade: FadeMode,
    /// Value passed to the color wheel
    pub brightness: u8,
    /// Channels produced by the random streams
    pub channel_count: usize,
    /// Per-channel AND mask for [`RandomPastel`]
    pub mask: Option<Vec<u8, 4>>,
    pub seed: u64,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            hue_stride: None,
            stripe_size: None,
            start_hue: 0,
            fade: FadeMode::default(),
            brightness: DEFAULT_BRIGHTNESS,
            channel_count: 3,
            mask: None,
            seed: 0,
        }
    }
}

impl StreamParams {
    #[must_use]
    pub fn with_stride(mut self, hue_stride: i16, stripe_size: usize) -> Self {
        self.hue_stride = Some(hue_stride);
        self.stripe_size = Some(stripe_size);
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
