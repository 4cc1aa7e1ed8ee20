//! Effect configuration as submitted by the control surface.
//!
//! The web form sends a query string such as
//! `effect=fire&br=50&cooling=20`. [`EffectConfig::parse_query`] turns it
//! into typed settings without allocating, and [`EffectConfig::build`]
//! resolves the effect and generator names through the static registries.

use core::str::FromStr;

use embassy_time::Duration;
use heapless::Vec;

use crate::animation::{
    AnimationSettings, AnimationSlot, CollisionConfig, Conjunction, Convergent, DEFAULT_INTERVAL,
    Divergent, EffectId, FillMode, Fire, FireConfig, Jitter, JitterConfig, LitBits, LitBitsConfig,
    NextGen, NextGenConfig, SOLID_COLOR_INTERVAL, SideSwipe, SolidColor,
};
use crate::color::Color;
use crate::color_map::{ColorMap, FillDirection, Span};
use crate::error::{ConfigError, Result};
use crate::math8::percent_to_u8;
use crate::pixel_buffer::PixelBuffer;
use crate::rng::fork;
use crate::stream::{DEFAULT_BRIGHTNESS, FadeMode, StreamId, StreamParams};

/// Palette size used when a generator feeds a palette-driven effect
const STREAM_PALETTE_LEN: usize = 20;

/// Longest accepted frame interval, one hour
pub const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Per-variant tuning. `None` keeps the variant's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectOverrides {
    pub blanks: Option<usize>,
    pub scroll_speed: Option<isize>,
    pub lit_scroll_speed: Option<isize>,
    pub lit_percent: Option<u8>,
    pub fade_percent: Option<u8>,
    pub sparking: Option<u8>,
    pub cooling: Option<u8>,
    pub hotspots: Option<usize>,
    pub fill_mode: Option<FillMode>,
    pub background: Option<Color>,
    pub hue_stride: Option<i16>,
    pub stripe_size: Option<usize>,
    pub start_hue: Option<u8>,
    pub fade: Option<FadeMode>,
    pub mask: Option<Vec<u8, 4>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectConfig {
    pub effect: EffectId,
    /// Requested color stream; unknown names leave this empty
    pub generator: Option<StreamId>,
    /// Solid color from `rgb` or `r`/`g`/`b`
    pub color: Color,
    /// `br`, 0-100
    pub brightness_percent: Option<u8>,
    pub interval: Option<Duration>,
    /// Stop after this many frames; `None` runs until cancelled
    pub frame_limit: Option<u32>,
    pub seed: u64,
    pub overrides: EffectOverrides,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::new(EffectId::SolidColor)
    }
}

fn number<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidKey { key }.into())
}

/// `#rrggbb`, `%23rrggbb` or bare hex
fn hex_color(key: &'static str, value: &str) -> Result<Color> {
    let digits = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("%23"))
        .unwrap_or(value);
    if digits.is_empty() || digits.len() > 6 {
        return Err(ConfigError::InvalidKey { key }.into());
    }
    let raw = u32::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidKey { key })?;
    Ok(Color::from_u32(raw, 3))
}

/// Comma separated channel values, `,` possibly sent as `%2C`
fn channel_list(key: &'static str, value: &str) -> Result<Vec<u8, 4>> {
    let mut out = Vec::new();
    for part in value.split("%2C").flat_map(|chunk| chunk.split(',')) {
        let channel = number(key, part)?;
        out.push(channel)
            .map_err(|_| ConfigError::InvalidKey { key })?;
    }
    Ok(out)
}

const fn scale_percent(value: u8, percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    ((value as u16 * percent as u16) / 100) as u8
}

impl EffectConfig {
    pub fn new(effect: EffectId) -> Self {
        Self {
            effect,
            generator: None,
            color: Color::OFF,
            brightness_percent: None,
            interval: None,
            frame_limit: None,
            seed: 0,
            overrides: EffectOverrides::default(),
        }
    }

    /// Parse `key=value&key=value` form data.
    ///
    /// `effect` is required. An effect named after a color stream runs
    /// [`NextGen`] with that stream. Unrecognized keys are ignored.
    pub fn parse_query(query: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut effect = None;
        let mut channels: [Option<u8>; 3] = [None; 3];
        let overrides = &mut config.overrides;

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "effect" => effect = Some(value),
                "generator" => config.generator = StreamId::parse_from_str(value),
                "rgb" => config.color = hex_color("rgb", value)?,
                "r" => channels[0] = Some(number("r", value)?),
                "g" => channels[1] = Some(number("g", value)?),
                "b" => channels[2] = Some(number("b", value)?),
                "br" => config.brightness_percent = Some(number::<u8>("br", value)?.min(100)),
                "interval" => {
                    let millis: u64 = number("interval", value)?;
                    if millis > MAX_INTERVAL_MS {
                        return Err(ConfigError::InvalidKey { key: "interval" }.into());
                    }
                    config.interval = Some(Duration::from_millis(millis));
                }
                "frames" => {
                    let frames: u32 = number("frames", value)?;
                    config.frame_limit = (frames > 0).then_some(frames);
                }
                "seed" => config.seed = number("seed", value)?,
                "blanks" => overrides.blanks = Some(number("blanks", value)?),
                "scroll_speed" => overrides.scroll_speed = Some(number("scroll_speed", value)?),
                "lit_scroll_speed" => {
                    overrides.lit_scroll_speed = Some(number("lit_scroll_speed", value)?);
                }
                "lit_percent" => overrides.lit_percent = Some(number("lit_percent", value)?),
                "fade_percent" => overrides.fade_percent = Some(number("fade_percent", value)?),
                "sparking" => overrides.sparking = Some(number("sparking", value)?),
                "cooling" => overrides.cooling = Some(number("cooling", value)?),
                "hotspots" => overrides.hotspots = Some(number("hotspots", value)?),
                "fill_mode" => {
                    overrides.fill_mode = Some(
                        FillMode::parse_from_str(value)
                            .ok_or(ConfigError::InvalidKey { key: "fill_mode" })?,
                    );
                }
                "background" => overrides.background = Some(hex_color("background", value)?),
                "hue_stride" => overrides.hue_stride = Some(number("hue_stride", value)?),
                "stripe_size" => overrides.stripe_size = Some(number("stripe_size", value)?),
                "start_hue" => overrides.start_hue = Some(number("start_hue", value)?),
                "fade" => {
                    overrides.fade = Some(
                        FadeMode::parse_from_str(value)
                            .ok_or(ConfigError::InvalidKey { key: "fade" })?,
                    );
                }
                "mask" => overrides.mask = Some(channel_list("mask", value)?),
                _ => {}
            }
        }

        if channels.iter().any(Option::is_some) {
            let [r, g, b] = channels.map(|c| c.unwrap_or(0));
            config.color = Color::rgb(r, g, b);
        }

        let effect = effect.ok_or(ConfigError::MissingKey { key: "effect" })?;
        if let Some(id) = EffectId::parse_from_str(effect) {
            config.effect = id;
        } else if let Some(stream) = StreamId::parse_from_str(effect) {
            config.effect = EffectId::NextGen;
            config.generator = Some(stream);
            // Stripe widths the effect menu uses for these streams
            let stripe_size = match stream {
                StreamId::StripedColorWheel => Some(1),
                StreamId::ColorComplement => Some(10),
                _ => None,
            };
            if config.overrides.stripe_size.is_none() {
                config.overrides.stripe_size = stripe_size;
            }
        } else {
            return Err(ConfigError::UnknownEffect.into());
        }
        Ok(config)
    }

    /// Brightness handed to the color wheel: `br` percent of 255, or the default
    pub fn brightness(&self) -> u8 {
        self.brightness_percent
            .map_or(DEFAULT_BRIGHTNESS, percent_to_u8)
    }

    fn settings(&self) -> AnimationSettings {
        let default_interval = match self.effect {
            EffectId::SolidColor => SOLID_COLOR_INTERVAL,
            _ => DEFAULT_INTERVAL,
        };
        AnimationSettings {
            interval: self.interval.unwrap_or(default_interval),
            brightness: self.brightness(),
            seed: self.seed,
        }
    }

    /// Parameters for the requested stream, sized for `buffer`
    pub fn stream_params(&self, buffer: &PixelBuffer) -> StreamParams {
        let o = &self.overrides;
        StreamParams {
            hue_stride: o.hue_stride,
            stripe_size: o.stripe_size,
            start_hue: o.start_hue.unwrap_or(0),
            fade: o.fade.unwrap_or_default(),
            brightness: self.brightness(),
            channel_count: buffer.bytes_per_pixel(),
            mask: o.mask.clone(),
            seed: fork(self.seed, 2),
        }
    }

    /// Construct the configured animation against `buffer`
    pub fn build(&self, buffer: &PixelBuffer) -> Result<AnimationSlot> {
        let settings = self.settings();
        let o = &self.overrides;
        let mut stream = match self.generator {
            Some(id) => Some(id.to_slot(&self.stream_params(buffer))?),
            None => None,
        };

        Ok(match self.effect {
            EffectId::SolidColor => {
                let color = match self.brightness_percent {
                    Some(percent) => {
                        let mut channels = [0; 4];
                        let source = self.color.as_slice();
                        for (out, &c) in channels.iter_mut().zip(source) {
                            *out = scale_percent(c, percent);
                        }
                        Color::from_slice(&channels[..source.len()])?
                    }
                    None => self.color,
                };
                AnimationSlot::SolidColor(SolidColor::new(buffer, settings, color, stream)?)
            }
            EffectId::NextGen => {
                let defaults = NextGenConfig::default();
                let config = NextGenConfig {
                    blanks: o.blanks.unwrap_or(defaults.blanks),
                    scroll_speed: o.scroll_speed.unwrap_or(defaults.scroll_speed),
                };
                AnimationSlot::NextGen(NextGen::new(buffer, settings, config, stream)?)
            }
            EffectId::LitBits => {
                let defaults = LitBitsConfig::default();
                let config = LitBitsConfig {
                    scroll_speed: o.scroll_speed.unwrap_or(defaults.scroll_speed),
                    lit_scroll_speed: o.lit_scroll_speed.unwrap_or(defaults.lit_scroll_speed),
                    lit_percent: o.lit_percent,
                };
                let palette = match stream.as_mut() {
                    Some(stream) => {
                        let mut palette = ColorMap::new(STREAM_PALETTE_LEN, 3)?;
                        palette.fill_from_stream(stream, Span::ALL, FillDirection::Forward)?;
                        Some(palette)
                    }
                    None => None,
                };
                AnimationSlot::LitBits(LitBits::new(buffer, settings, config, palette)?)
            }
            EffectId::Jitter => {
                let defaults = JitterConfig::default();
                let config = JitterConfig {
                    fade_percent: o.fade_percent.unwrap_or(defaults.fade_percent),
                    sparking: o.sparking.unwrap_or(defaults.sparking),
                    background: o.background.unwrap_or(defaults.background),
                    lit_percent: o.lit_percent.unwrap_or(defaults.lit_percent),
                    fill_mode: o.fill_mode.unwrap_or(defaults.fill_mode),
                };
                AnimationSlot::Jitter(Jitter::new(buffer, settings, config, stream)?)
            }
            EffectId::SideSwipe => {
                let mut streams = Vec::new();
                if let Some(stream) = stream {
                    streams
                        .push(stream)
                        .map_err(|_| ConfigError::CapacityExceeded {
                            what: "swipe streams",
                            max: crate::animation::MAX_SWIPE_STREAMS,
                        })?;
                }
                AnimationSlot::SideSwipe(SideSwipe::new(buffer, settings, streams)?)
            }
            EffectId::Convergent => {
                let config = CollisionConfig {
                    fill_mode: o.fill_mode.unwrap_or(CollisionConfig::default().fill_mode),
                };
                AnimationSlot::Convergent(Convergent::new(buffer, settings, config, None, stream)?)
            }
            EffectId::Divergent => {
                let config = CollisionConfig {
                    fill_mode: o.fill_mode.unwrap_or(CollisionConfig::default().fill_mode),
                };
                AnimationSlot::Divergent(Divergent::new(buffer, settings, config, None, stream)?)
            }
            EffectId::Fire => {
                let defaults = FireConfig::default();
                let config = FireConfig {
                    sparking: o.sparking.unwrap_or(defaults.sparking),
                    cooling: o.cooling.unwrap_or(defaults.cooling),
                    scroll_speed: o.scroll_speed.unwrap_or(defaults.scroll_speed),
                    hotspots: o.hotspots.unwrap_or(defaults.hotspots),
                };
                AnimationSlot::Fire(Fire::new(buffer, settings, config, None)?)
            }
            EffectId::Conjunction => {
                AnimationSlot::Conjunction(Conjunction::new(buffer, settings, stream)?)
            }
        })
    }
}
