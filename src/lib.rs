#![no_std]

extern crate alloc;

pub mod animation;
pub mod bitmask;
pub mod color;
pub mod color_map;
pub mod config;
pub mod error;
pub mod math8;
pub mod matrix;
pub mod pixel_buffer;
pub mod rng;
pub mod scheduler;
pub mod signal;
pub mod stream;

pub use animation::{Animation, AnimationSettings, AnimationSlot, EffectId, FillMode};
pub use bitmask::BitMask;
pub use color::{ChannelOp, ChannelOrder, Color, Operand, Rgb};
pub use color_map::{ColorMap, FillDirection, Span};
pub use config::{EffectConfig, EffectOverrides};
pub use error::{ConfigError, Error, HardwareError, Result};
pub use matrix::{MatrixLayout, PixelMatrix};
pub use pixel_buffer::{PixelBuffer, PixelBufferConfig, RepeatMode};
pub use scheduler::{FrameResult, FrameScheduler, StopReason, TickOutcome};
pub use signal::{ControlRequest, ControlSignal};
pub use stream::{ColorStream, StreamId, StreamParams, StreamSlot};

pub use embassy_time::{Duration, Instant};

/// Hardware output for the packed pixel bytes
///
/// Implement this trait to support different LED drivers. The write is
/// expected to block until the bytes are on the wire.
pub trait HardwareSink {
    /// Transmit bytes already in hardware channel order
    fn write(&mut self, bytes: &[u8]) -> core::result::Result<(), HardwareError>;
}

impl<T: HardwareSink + ?Sized> HardwareSink for &mut T {
    fn write(&mut self, bytes: &[u8]) -> core::result::Result<(), HardwareError> {
        (**self).write(bytes)
    }
}
