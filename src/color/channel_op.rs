use super::MAX_CHANNELS;
use crate::error::{Error, Result};
use crate::math8::{add8, mult8, sub8};

/// Arithmetic applied to every channel of every item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Right-hand side of a [`ChannelOp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    /// Same value for every channel
    Scalar(u8),
    /// One value per channel, in logical order
    PerChannel(&'a [u8]),
}

impl ChannelOp {
    #[inline]
    const fn eval(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Add => add8(a, b),
            Self::Sub => sub8(a, b),
            Self::Mul => mult8(a, b),
            Self::Div => a / b,
        }
    }
}

impl Operand<'_> {
    /// Expand to one value per channel for items `width` bytes wide
    pub(crate) fn resolve(self, width: usize) -> Result<[u8; MAX_CHANNELS]> {
        let mut values = [0; MAX_CHANNELS];
        match self {
            Self::Scalar(value) => values[..width].fill(value),
            Self::PerChannel(channels) => {
                if channels.len() < width {
                    return Err(Error::InvalidValue {
                        reason: "operand needs one value per channel",
                    });
                }
                values[..width].copy_from_slice(&channels[..width]);
            }
        }
        Ok(values)
    }
}

/// Apply `op` to packed items `width` bytes wide.
///
/// `operand` holds one value per byte position within an item. The whole
/// operand is validated before any byte changes.
pub(crate) fn apply_packed(
    bytes: &mut [u8],
    width: usize,
    op: ChannelOp,
    operand: &[u8; MAX_CHANNELS],
) -> Result<()> {
    if op == ChannelOp::Div && operand[..width].contains(&0) {
        return Err(Error::InvalidValue {
            reason: "division by zero",
        });
    }
    for item in bytes.chunks_exact_mut(width) {
        for (byte, &rhs) in item.iter_mut().zip(operand.iter()) {
            *byte = op.eval(*byte, rhs);
        }
    }
    Ok(())
}
