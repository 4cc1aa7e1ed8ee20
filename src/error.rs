//! Error types shared by every module of the engine.

use derive_more::{Display, Error};

/// A specialized `Result` where the error is this crate's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for buffer, stream and animation operations.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid or inconsistent configuration
    #[display("configuration error: {_0}")]
    Config(ConfigError),

    /// Logical index outside the addressable range
    #[display("index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// Failure while handing pixels to the hardware sink
    #[display("hardware error: {_0}")]
    Hardware(HardwareError),

    /// Argument with a bad range or shape
    #[display("invalid value: {reason}")]
    InvalidValue { reason: &'static str },
}

/// Configuration problems detected before anything is mutated.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[display("no such effect")]
    UnknownEffect,

    #[display("missing required key `{key}`")]
    MissingKey { key: &'static str },

    #[display("invalid value for `{key}`")]
    InvalidKey { key: &'static str },

    #[display("pixel buffer cannot drive an animation")]
    InvalidBuffer,

    #[display("palette needs at least {min} colors, got {len}")]
    PaletteTooShort { min: usize, len: usize },

    #[display("channel mask has {len} entries, expected {expected}")]
    MaskLength { len: usize, expected: usize },

    #[display("stripe size {size} is too short")]
    StripeTooShort { size: usize },

    #[display("stripe size {size} is too long, at most {max} supported")]
    StripeTooLong { size: usize, max: usize },

    #[display("channel order does not fit {bytes_per_pixel} bytes per pixel")]
    ChannelOrder { bytes_per_pixel: usize },

    #[display("too many {what}, at most {max} supported")]
    CapacityExceeded { what: &'static str, max: usize },
}

/// Failures at the hardware boundary. Always fatal for the current run.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    #[display("buffer length changed: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[display("write to the data line failed")]
    WriteFailed,
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<HardwareError> for Error {
    fn from(err: HardwareError) -> Self {
        Self::Hardware(err)
    }
}

impl Error {
    pub(crate) const fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            index: index as isize,
            len,
        }
    }
}
