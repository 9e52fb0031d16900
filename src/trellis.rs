//! Trellis description of a convolutional code
//!
//! A trellis is the pair of tables the decoder walks: for every encoder state
//! and input bit, the state the encoder moves to and the output symbol it
//! emits. Output symbols are `nn`-bit integers read MSB first, so bit 0 of the
//! code word at a stage is the most significant bit of the symbol.
//!
//! Tables can be supplied directly with [`Trellis::from_tables`] or generated
//! for a recursive systematic convolutional (RSC) code with [`Trellis::rsc`].

use snafu::ensure;
use tracing::debug;

use crate::error::{
    InvalidConstraintLengthSnafu, InvalidGeneratorsSnafu, InvalidSymbolWidthSnafu,
    InvalidTrellisSnafu, SisoError,
};

/// Largest supported constraint length (32768 states)
pub const MAX_CONSTRAINT_LENGTH: usize = 16;

/// Largest supported number of output bits per trellis stage
pub const MAX_SYMBOL_WIDTH: usize = 16;

/// Validated next-state and output-symbol tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trellis {
    memory: usize,
    symbol_width: usize,
    /// `next_state[s][b]` for input bit `b`
    next_state: Vec<[usize; 2]>,
    /// `output[s][b]` for input bit `b`
    output: Vec<[usize; 2]>,
}

impl Trellis {
    /// Build a trellis from the four transition tables
    ///
    /// # Arguments
    /// * `constraint_length` - K; the trellis has 2^(K-1) states
    /// * `symbol_width` - nn, the number of coded bits per stage
    /// * `next_state0`, `output0` - next state and output symbol for input 0
    /// * `next_state1`, `output1` - next state and output symbol for input 1
    ///
    /// # Errors
    /// Returns an error if K or nn is out of range, if any table length is not
    /// 2^(K-1), or if any entry is out of range for its table.
    pub fn from_tables(
        constraint_length: usize,
        symbol_width: usize,
        next_state0: &[usize],
        next_state1: &[usize],
        output0: &[usize],
        output1: &[usize],
    ) -> Result<Self, SisoError> {
        validate_dimensions(constraint_length, symbol_width)?;

        let memory = constraint_length - 1;
        let num_states = 1usize << memory;
        let num_symbols = 1usize << symbol_width;

        for (name, table) in [
            ("next_state0", next_state0),
            ("next_state1", next_state1),
            ("output0", output0),
            ("output1", output1),
        ] {
            ensure!(
                table.len() == num_states,
                InvalidTrellisSnafu {
                    reason: format!("{name} has {} entries, expected {num_states}", table.len()),
                }
            );
        }

        if let Some(bad) = next_state0.iter().chain(next_state1).find(|&&s| s >= num_states) {
            return InvalidTrellisSnafu {
                reason: format!("next state {bad} is not below {num_states}"),
            }
            .fail();
        }
        if let Some(bad) = output0.iter().chain(output1).find(|&&o| o >= num_symbols) {
            return InvalidTrellisSnafu {
                reason: format!("output symbol {bad} does not fit in {symbol_width} bits"),
            }
            .fail();
        }

        Ok(Self {
            memory,
            symbol_width,
            next_state: next_state0.iter().zip(next_state1).map(|(&a, &b)| [a, b]).collect(),
            output: output0.iter().zip(output1).map(|(&a, &b)| [a, b]).collect(),
        })
    }

    /// Build the trellis of a recursive systematic convolutional encoder
    ///
    /// `generators[0]` is the feedback polynomial and also produces the
    /// systematic bit; each further polynomial produces one parity bit. The
    /// constraint length K is the bit length of the feedback polynomial, and
    /// the code rate is `1 / generators.len()`. Polynomials are usually written
    /// in octal, e.g. `[0o7, 0o5]` or the LTE pair `[0o13, 0o15]`.
    ///
    /// The register holds the last K-1 feedback bits with the most recent in
    /// the MSB. Output bit `n` of a transition is the parity of
    /// `(feedback << (K-1) | state) & generators[n]`, and bit 0 always equals
    /// the input bit.
    ///
    /// # Errors
    /// Returns an error if fewer than two polynomials are given, if the
    /// feedback polynomial is zero or a power of two, or if a feedforward
    /// polynomial is zero, equal to the feedback polynomial, or longer than it.
    pub fn rsc(generators: &[usize]) -> Result<Self, SisoError> {
        ensure!(
            generators.len() >= 2,
            InvalidGeneratorsSnafu { reason: "expected at least two polynomials" }
        );
        let feedback = generators[0];
        ensure!(
            feedback != 0 && !feedback.is_power_of_two(),
            InvalidGeneratorsSnafu {
                reason: format!("feedback polynomial {feedback:#o} cannot be 0 or a power of 2"),
            }
        );

        let constraint_length = (usize::BITS - feedback.leading_zeros()) as usize;
        validate_dimensions(constraint_length, generators.len())?;

        let limit = 1usize << constraint_length;
        if let Some(&bad) = generators[1..]
            .iter()
            .find(|&&g| g == 0 || g == feedback || g >= limit)
        {
            return InvalidGeneratorsSnafu {
                reason: format!(
                    "feedforward polynomial {bad:#o} must be in [1, {limit:#o}) and differ from the feedback polynomial"
                ),
            }
            .fail();
        }

        let memory = constraint_length - 1;
        let num_states = 1usize << memory;
        let mut next_state = Vec::with_capacity(num_states);
        let mut output = Vec::with_capacity(num_states);

        for state in 0..num_states {
            let mut next = [0usize; 2];
            let mut out = [0usize; 2];
            for input in 0..2usize {
                let feedback_bit = parity(((input << memory) | state) & feedback);
                let register = (feedback_bit << memory) | state;
                out[input] = generators
                    .iter()
                    .fold(0, |symbol, &g| (symbol << 1) | parity(register & g));
                next[input] = register >> 1;
            }
            next_state.push(next);
            output.push(out);
        }

        debug!(
            constraint_length,
            symbol_width = generators.len(),
            num_states,
            "built RSC trellis"
        );

        Ok(Self {
            memory,
            symbol_width: generators.len(),
            next_state,
            output,
        })
    }

    /// Constraint length K
    pub fn constraint_length(&self) -> usize {
        self.memory + 1
    }

    /// Memory order M = K - 1; also the number of tail stages
    pub fn memory(&self) -> usize {
        self.memory
    }

    pub fn num_states(&self) -> usize {
        self.next_state.len()
    }

    /// Coded bits per stage (nn)
    pub fn symbol_width(&self) -> usize {
        self.symbol_width
    }

    /// Size of the output alphabet, 2^nn
    pub fn num_symbols(&self) -> usize {
        1 << self.symbol_width
    }

    #[inline]
    pub fn next_state(&self, state: usize, input: bool) -> usize {
        self.next_state[state][input as usize]
    }

    #[inline]
    pub fn output_symbol(&self, state: usize, input: bool) -> usize {
        self.output[state][input as usize]
    }

    /// Next states for input 0 and input 1
    #[inline]
    pub fn next_states(&self, state: usize) -> [usize; 2] {
        self.next_state[state]
    }

    /// Output symbols for input 0 and input 1
    #[inline]
    pub fn output_symbols(&self, state: usize) -> [usize; 2] {
        self.output[state]
    }
}

fn validate_dimensions(constraint_length: usize, symbol_width: usize) -> Result<(), SisoError> {
    ensure!(
        (2..=MAX_CONSTRAINT_LENGTH).contains(&constraint_length),
        InvalidConstraintLengthSnafu { constraint_length }
    );
    ensure!(
        (1..=MAX_SYMBOL_WIDTH).contains(&symbol_width),
        InvalidSymbolWidthSnafu { symbol_width }
    );
    Ok(())
}

#[inline]
fn parity(word: usize) -> usize {
    (word.count_ones() & 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsc_7_5_tables() {
        // Hand-derived tables for the (7,5) code, symbol = systematic:parity
        let t = Trellis::rsc(&[0o7, 0o5]).unwrap();
        assert_eq!(t.constraint_length(), 3);
        assert_eq!(t.num_states(), 4);
        assert_eq!(t.symbol_width(), 2);
        assert_eq!(t.num_symbols(), 4);

        let next0: Vec<usize> = (0..4).map(|s| t.next_state(s, false)).collect();
        let next1: Vec<usize> = (0..4).map(|s| t.next_state(s, true)).collect();
        let out0: Vec<usize> = (0..4).map(|s| t.output_symbol(s, false)).collect();
        let out1: Vec<usize> = (0..4).map(|s| t.output_symbol(s, true)).collect();

        assert_eq!(next0, [0, 2, 3, 1]);
        assert_eq!(next1, [2, 0, 1, 3]);
        assert_eq!(out0, [0, 0, 1, 1]);
        assert_eq!(out1, [3, 3, 2, 2]);
    }

    #[test]
    fn test_rsc_is_systematic() {
        for generators in [&[0o7usize, 0o5][..], &[0o13, 0o15][..], &[0o13, 0o15, 0o17][..]] {
            let t = Trellis::rsc(generators).unwrap();
            let msb = 1 << (t.symbol_width() - 1);
            for s in 0..t.num_states() {
                assert_eq!(t.output_symbol(s, false) & msb, 0);
                assert_eq!(t.output_symbol(s, true) & msb, msb);
            }
        }
    }

    #[test]
    fn test_rsc_every_state_has_two_predecessors() {
        let t = Trellis::rsc(&[0o13, 0o15]).unwrap();
        let mut incoming = vec![0usize; t.num_states()];
        for s in 0..t.num_states() {
            for n in t.next_states(s) {
                incoming[n] += 1;
            }
        }
        assert!(incoming.iter().all(|&c| c == 2), "incoming counts {:?}", incoming);
    }

    #[test]
    fn test_rsc_rejects_bad_generators() {
        assert!(matches!(Trellis::rsc(&[0o7]), Err(SisoError::InvalidGenerators { .. })));
        assert!(matches!(Trellis::rsc(&[0o4, 0o5]), Err(SisoError::InvalidGenerators { .. })));
        assert!(matches!(Trellis::rsc(&[0o7, 0o7]), Err(SisoError::InvalidGenerators { .. })));
        assert!(matches!(Trellis::rsc(&[0o7, 0o17]), Err(SisoError::InvalidGenerators { .. })));
        assert!(matches!(Trellis::rsc(&[0o7, 0]), Err(SisoError::InvalidGenerators { .. })));
    }

    #[test]
    fn test_from_tables_matches_rsc() {
        let rsc = Trellis::rsc(&[0o7, 0o5]).unwrap();
        let t = Trellis::from_tables(3, 2, &[0, 2, 3, 1], &[2, 0, 1, 3], &[0, 0, 1, 1], &[3, 3, 2, 2])
            .unwrap();
        assert_eq!(t, rsc);
    }

    #[test]
    fn test_from_tables_rejects_bad_dimensions() {
        assert_eq!(
            Trellis::from_tables(1, 2, &[0], &[0], &[0], &[0]),
            Err(SisoError::InvalidConstraintLength { constraint_length: 1 })
        );
        assert_eq!(
            Trellis::from_tables(3, 0, &[0; 4], &[0; 4], &[0; 4], &[0; 4]),
            Err(SisoError::InvalidSymbolWidth { symbol_width: 0 })
        );
    }

    #[test]
    fn test_from_tables_rejects_bad_entries() {
        let short = Trellis::from_tables(3, 2, &[0, 2, 3], &[2, 0, 1, 3], &[0, 0, 1, 1], &[3, 3, 2, 2]);
        assert!(matches!(short, Err(SisoError::InvalidTrellis { .. })));

        let bad_state = Trellis::from_tables(3, 2, &[0, 2, 3, 4], &[2, 0, 1, 3], &[0, 0, 1, 1], &[3, 3, 2, 2]);
        assert!(matches!(bad_state, Err(SisoError::InvalidTrellis { .. })));

        let bad_symbol = Trellis::from_tables(3, 2, &[0, 2, 3, 1], &[2, 0, 1, 3], &[0, 0, 1, 4], &[3, 3, 2, 2]);
        assert!(matches!(bad_symbol, Err(SisoError::InvalidTrellis { .. })));
    }
}
