//! Validated view of one block's decoder input

use snafu::ensure;

use super::Termination;
use crate::error::{ChannelLengthMismatchSnafu, EmptyBlockSnafu, SisoError};
use crate::trellis::{Trellis, MAX_SYMBOL_WIDTH};

/// Received values for tail stages that carry no channel observation
static ZEROS: [f32; MAX_SYMBOL_WIDTH] = [0.0; MAX_SYMBOL_WIDTH];

/// Channel and a-priori input for one block, checked against a trellis
#[derive(Debug, Clone, Copy)]
pub(crate) struct Block<'a> {
    channel: &'a [f32],
    apriori: &'a [f32],
    symbol_width: usize,
    num_stages: usize,
}

impl<'a> Block<'a> {
    /// Check sizes and build the view
    ///
    /// The block length is `apriori.len()`. A terminated block needs channel
    /// values for all `LL + M` stages; an unterminated block supplies only the
    /// `LL` data stages and the tail stages read as zero.
    pub(crate) fn new(
        trellis: &Trellis,
        termination: Termination,
        channel: &'a [f32],
        apriori: &'a [f32],
    ) -> Result<Self, SisoError> {
        let info_len = apriori.len();
        ensure!(info_len > 0, EmptyBlockSnafu);

        let symbol_width = trellis.symbol_width();
        let num_stages = info_len + trellis.memory();
        let expected = match termination {
            Termination::Terminated => symbol_width * num_stages,
            Termination::Unterminated => symbol_width * info_len,
        };
        ensure!(
            channel.len() == expected,
            ChannelLengthMismatchSnafu { expected, actual: channel.len() }
        );

        Ok(Self {
            channel,
            apriori,
            symbol_width,
            num_stages,
        })
    }

    /// Number of information bits (LL)
    pub(crate) fn info_len(&self) -> usize {
        self.apriori.len()
    }

    /// Number of trellis stages (LL + M)
    pub(crate) fn num_stages(&self) -> usize {
        self.num_stages
    }

    /// A-priori LLR of the data bit at `stage`, zero in the tail
    #[inline]
    pub(crate) fn apriori(&self, stage: usize) -> f32 {
        self.apriori.get(stage).copied().unwrap_or(0.0)
    }

    /// The `nn` channel LLRs of `stage`
    #[inline]
    pub(crate) fn received(&self, stage: usize) -> &'a [f32] {
        let start = stage * self.symbol_width;
        self.channel
            .get(start..start + self.symbol_width)
            .unwrap_or(&ZEROS[..self.symbol_width])
    }

    /// Largest input magnitude, for range diagnostics
    pub(crate) fn peak_magnitude(&self) -> f32 {
        self.channel
            .iter()
            .chain(self.apriori)
            .fold(0.0f32, |peak, v| peak.max(v.abs()))
    }
}
