//! Error type for precondition violations
//!
//! The decoder is a pure numeric kernel, so the only failures are inputs whose
//! sizes or indices cannot describe a valid trellis or block. Every variant is
//! detected before any output is written.

use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SisoError {
    /// Constraint length outside the supported range
    #[snafu(display("constraint length {constraint_length} is outside the supported range 2..=16"))]
    InvalidConstraintLength { constraint_length: usize },

    /// Output symbol width outside the supported range
    #[snafu(display("symbol width {symbol_width} is outside the supported range 1..=16"))]
    InvalidSymbolWidth { symbol_width: usize },

    /// Trellis tables are inconsistent with the declared dimensions
    #[snafu(display("invalid trellis: {reason}"))]
    InvalidTrellis { reason: String },

    /// Generator polynomials do not describe a recursive systematic code
    #[snafu(display("invalid generator polynomials: {reason}"))]
    InvalidGenerators { reason: String },

    /// Block has no information bits
    #[snafu(display("block must contain at least one information bit"))]
    EmptyBlock,

    /// Channel input does not cover the trellis
    #[snafu(display("channel input has {actual} values, expected {expected}"))]
    ChannelLengthMismatch { expected: usize, actual: usize },

    /// Decoder type index does not name a max-star operator
    #[snafu(display("decoder type {index} is not one of 0..=4"))]
    InvalidDecoderType { index: u8 },

    /// Decoder name does not name a max-star operator
    #[snafu(display("\"{name}\" is not a max-star operator name"))]
    UnknownDecoderName { name: String },
}
