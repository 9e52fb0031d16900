//! Max-star (Jacobian logarithm) operators
//!
//! The max-star operator computes the log-domain sum of two quantities:
//!
//! ```text
//! max*(x, y) = log(exp(x) + exp(y)) = max(x, y) + log(1 + exp(-|x - y|))
//! ```
//!
//! Five variants trade accuracy for speed:
//!
//! | Index | Kind | Correction term |
//! |---|---|---|
//! | 0 | [`MaxStarKind::Linear`] | linear in \|x-y\|, zero past 2.5068 |
//! | 1 | [`MaxStarKind::Max`] | none (max-log-MAP) |
//! | 2 | [`MaxStarKind::Constant`] | 0.5 when \|x-y\| <= 1.5 |
//! | 3 | [`MaxStarKind::Table`] | 8-segment nonuniform interpolation table |
//! | 4 | [`MaxStarKind::Exact`] | log(1 + exp(-\|x-y\|)) evaluated directly |
//!
//! Every operator is symmetric in its arguments, never returns less than
//! `max(x, y)`, and treats `-MAX_LOG` as negative infinity.

mod constants;
mod operators;

use std::fmt;
use std::str::FromStr;

use crate::error::SisoError;

pub use constants::MAX_LOG;
pub use operators::{ConstantLogMap, LinearLogMap, LogMap, MaxLogMap, TableLogMap};

/// A max-star strategy
///
/// Implementors are zero-sized; the decoder is generic over `M: MaxStar` so
/// the operator is fixed at compile time inside the recursion loops.
pub trait MaxStar {
    /// Runtime tag of this operator
    const KIND: MaxStarKind;

    /// Worst-case absolute deviation from the exact operator
    const MAX_ERROR: f32;

    fn max_star(x: f32, y: f32) -> f32;
}

/// Decoder-wide choice of max-star operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaxStarKind {
    /// Linear approximation to the correction term
    Linear,
    /// Max-log-MAP, no correction
    Max,
    /// Constant correction term
    Constant,
    /// Nonuniform table with linear interpolation
    Table,
    /// Exact log-MAP
    #[default]
    Exact,
}

impl MaxStarKind {
    /// All operators in index order
    pub const ALL: [MaxStarKind; 5] = [
        MaxStarKind::Linear,
        MaxStarKind::Max,
        MaxStarKind::Constant,
        MaxStarKind::Table,
        MaxStarKind::Exact,
    ];

    /// Index of this operator (the inverse of `TryFrom<u8>`)
    pub fn index(self) -> u8 {
        match self {
            MaxStarKind::Linear => 0,
            MaxStarKind::Max => 1,
            MaxStarKind::Constant => 2,
            MaxStarKind::Table => 3,
            MaxStarKind::Exact => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaxStarKind::Linear => "linear",
            MaxStarKind::Max => "max",
            MaxStarKind::Constant => "constant",
            MaxStarKind::Table => "table",
            MaxStarKind::Exact => "exact",
        }
    }

    /// Worst-case absolute deviation from the exact operator
    pub fn max_error(self) -> f32 {
        match self {
            MaxStarKind::Linear => LinearLogMap::MAX_ERROR,
            MaxStarKind::Max => MaxLogMap::MAX_ERROR,
            MaxStarKind::Constant => ConstantLogMap::MAX_ERROR,
            MaxStarKind::Table => TableLogMap::MAX_ERROR,
            MaxStarKind::Exact => LogMap::MAX_ERROR,
        }
    }

    /// Apply this operator once
    ///
    /// Dispatches on every call. Fine for one-off use; the decoder resolves
    /// the kind once per block instead.
    pub fn max_star(self, x: f32, y: f32) -> f32 {
        match self {
            MaxStarKind::Linear => LinearLogMap::max_star(x, y),
            MaxStarKind::Max => MaxLogMap::max_star(x, y),
            MaxStarKind::Constant => ConstantLogMap::max_star(x, y),
            MaxStarKind::Table => TableLogMap::max_star(x, y),
            MaxStarKind::Exact => LogMap::max_star(x, y),
        }
    }
}

impl TryFrom<u8> for MaxStarKind {
    type Error = SisoError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        MaxStarKind::ALL
            .get(index as usize)
            .copied()
            .ok_or(SisoError::InvalidDecoderType { index })
    }
}

impl FromStr for MaxStarKind {
    type Err = SisoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        MaxStarKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| SisoError::UnknownDecoderName { name: s.to_owned() })
    }
}

impl fmt::Display for MaxStarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
