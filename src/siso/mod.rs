//! Log-domain BCJR soft-input soft-output decoding
//!
//! Decodes one block of a convolutional code given channel LLRs for the
//! coded bits and a-priori LLRs for the data bits, producing posterior LLRs
//! for both. This is the constituent decoder of a turbo decoder: the outer
//! loop calls it once per constituent code per iteration and feeds the
//! [`SisoOutput::extrinsic`] part of the result to the other decoder.
//!
//! **Algorithm** (one call):
//! 1. Validate the block against the trellis
//! 2. Backward pass: beta for every stage boundary, right to left
//! 3. Forward pass: alpha stage by stage, finishing each stage's LLRs as soon
//!    as its alpha is known
//!
//! Both passes combine metrics with the configured max-star operator, chosen
//! once per call. State metrics are renormalized every stage.
//!
//! All LLRs are log(P(bit = 1) / P(bit = 0)).

mod backward;
mod block;
mod forward;
mod normalize;
mod workspace;

use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::branch_metric::{BranchMetric, Correlation};
use crate::error::SisoError;
use crate::max_star::{
    ConstantLogMap, LinearLogMap, LogMap, MaxLogMap, MaxStar, MaxStarKind, TableLogMap, MAX_LOG,
};
use crate::trellis::Trellis;

use self::backward::backward_pass;
use self::block::Block;
use self::forward::forward_pass;

pub use self::workspace::Workspace;

/// Input magnitude above which metrics risk approaching the sentinel
const INPUT_MAGNITUDE_WARNING: f32 = MAX_LOG / 1.0e3;

/// How the encoder finished the block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// The encoder was driven back to state 0 by M tail bits; channel input
    /// covers all `LL + M` stages
    #[default]
    Terminated,
    /// The encoder stopped after the data; channel input covers `LL` stages
    /// and the tail stages carry no observation
    Unterminated,
}

/// Configuration for the SISO decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SisoConfig {
    /// Max-star operator used at every metric combination
    pub max_star: MaxStarKind,
    /// Termination of the blocks being decoded
    pub termination: Termination,
}

/// Posterior LLRs for one block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SisoOutput {
    /// One LLR per data bit (`LL` values)
    pub data_llr: Vec<f32>,
    /// `nn` LLRs per trellis stage, stage-major (`nn * (LL + M)` values)
    pub coded_llr: Vec<f32>,
    symbol_width: usize,
}

impl SisoOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trellis stages covered by `coded_llr`
    pub fn num_stages(&self) -> usize {
        if self.symbol_width == 0 {
            0
        } else {
            self.coded_llr.len() / self.symbol_width
        }
    }

    /// Coded-bit LLRs of one trellis stage, MSB of the output symbol first
    pub fn stage_coded_llr(&self, stage: usize) -> &[f32] {
        let start = stage * self.symbol_width;
        &self.coded_llr[start..start + self.symbol_width]
    }

    /// Extrinsic information: posterior data LLR minus the a-priori input
    ///
    /// `apriori` should be the slice passed to the decode call; extra values
    /// on either side are ignored.
    pub fn extrinsic(&self, apriori: &[f32]) -> Vec<f32> {
        self.data_llr
            .iter()
            .zip(apriori)
            .map(|(llr, prior)| llr - prior)
            .collect()
    }

    fn prepare(&mut self, info_len: usize, num_stages: usize, symbol_width: usize) {
        self.symbol_width = symbol_width;
        self.data_llr.resize(info_len, 0.0);
        self.coded_llr.resize(symbol_width * num_stages, 0.0);
    }
}

/// Channel and a-priori input of one block, for batch decoding
#[derive(Debug, Clone, Copy)]
pub struct SisoInput<'a> {
    /// `nn` channel LLRs per stage
    pub channel_llr: &'a [f32],
    /// One a-priori LLR per data bit; its length is the block length
    pub apriori_llr: &'a [f32],
}

/// Decoder for one constituent code
///
/// Holds its scratch storage so that repeated calls, e.g. across turbo
/// iterations, do not reallocate.
///
/// # Example
/// ```
/// use turbo_siso::{SisoConfig, SisoDecoder, Trellis, MaxStarKind};
///
/// let trellis = Trellis::rsc(&[0o7, 0o5])?;
/// let config = SisoConfig { max_star: MaxStarKind::Linear, ..SisoConfig::default() };
/// let mut decoder = SisoDecoder::new(&trellis, config);
///
/// // 4 data bits + 2 tail stages, 2 coded bits per stage, all favoring 0
/// let channel = vec![-4.0f32; 12];
/// let apriori = vec![0.0f32; 4];
/// let output = decoder.decode(&channel, &apriori)?;
/// assert!(output.data_llr.iter().all(|&llr| llr < 0.0));
/// # Ok::<(), turbo_siso::SisoError>(())
/// ```
#[derive(Debug)]
pub struct SisoDecoder<'t, B = Correlation> {
    trellis: &'t Trellis,
    metric: B,
    config: SisoConfig,
    workspace: Workspace,
}

impl<'t> SisoDecoder<'t, Correlation> {
    /// Decoder using the correlation branch metric
    pub fn new(trellis: &'t Trellis, config: SisoConfig) -> Self {
        Self::with_metric(trellis, Correlation, config)
    }
}

impl<'t, B: BranchMetric> SisoDecoder<'t, B> {
    /// Decoder using a caller-supplied branch metric
    pub fn with_metric(trellis: &'t Trellis, metric: B, config: SisoConfig) -> Self {
        Self {
            trellis,
            metric,
            config,
            workspace: Workspace::new(),
        }
    }

    pub fn config(&self) -> &SisoConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SisoConfig) {
        self.config = config;
    }

    pub fn trellis(&self) -> &Trellis {
        self.trellis
    }

    /// Scratch state of the last call, e.g. to inspect its beta metrics
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Decode one block into a freshly allocated output
    ///
    /// # Arguments
    /// * `channel_llr` - `nn` LLRs per stage: `LL + M` stages when terminated,
    ///   `LL` when unterminated
    /// * `apriori_llr` - one a-priori LLR per data bit; zero when nothing is
    ///   known, e.g. on the first turbo iteration
    ///
    /// # Errors
    /// Returns an error if the block is empty or the channel input length does
    /// not match the block length.
    pub fn decode(&mut self, channel_llr: &[f32], apriori_llr: &[f32]) -> Result<SisoOutput, SisoError> {
        let mut output = SisoOutput::new();
        self.decode_into(channel_llr, apriori_llr, &mut output)?;
        Ok(output)
    }

    /// Decode one block into a caller-provided output
    ///
    /// `output` is resized as needed. On error it is left untouched.
    #[instrument(
        skip(self, channel_llr, apriori_llr, output),
        fields(info_bits = apriori_llr.len(), max_star = %self.config.max_star)
    )]
    pub fn decode_into(
        &mut self,
        channel_llr: &[f32],
        apriori_llr: &[f32],
        output: &mut SisoOutput,
    ) -> Result<(), SisoError> {
        run(
            self.trellis,
            &self.metric,
            &self.config,
            channel_llr,
            apriori_llr,
            &mut self.workspace,
            output,
        )
    }
}

/// Decode one block with the correlation metric and a terminated trellis
///
/// This is the single-call form: K and nn come from `trellis`, the block
/// length from `apriori_llr.len()`, and `max_star` picks the operator.
/// Scratch storage is allocated for this call only.
#[instrument(skip(trellis, channel_llr, apriori_llr), fields(info_bits = apriori_llr.len()))]
pub fn siso(
    trellis: &Trellis,
    channel_llr: &[f32],
    apriori_llr: &[f32],
    max_star: MaxStarKind,
) -> Result<SisoOutput, SisoError> {
    let config = SisoConfig {
        max_star,
        ..SisoConfig::default()
    };
    let mut output = SisoOutput::new();
    run(
        trellis,
        &Correlation,
        &config,
        channel_llr,
        apriori_llr,
        &mut Workspace::new(),
        &mut output,
    )?;
    Ok(output)
}

/// Decode many independent blocks in parallel
///
/// Each rayon worker keeps its own workspace. Results are returned in input
/// order and are identical to decoding the blocks one at a time.
#[instrument(skip(trellis, metric, blocks), fields(blocks = blocks.len(), max_star = %config.max_star))]
pub fn decode_blocks<B>(
    trellis: &Trellis,
    metric: &B,
    config: &SisoConfig,
    blocks: &[SisoInput<'_>],
) -> Vec<Result<SisoOutput, SisoError>>
where
    B: BranchMetric + Sync + ?Sized,
{
    blocks
        .par_iter()
        .map_init(Workspace::new, |ws, input| -> Result<SisoOutput, SisoError> {
            let mut output = SisoOutput::new();
            run(trellis, metric, config, input.channel_llr, input.apriori_llr, ws, &mut output)?;
            Ok(output)
        })
        .collect()
}

fn run<B: BranchMetric + ?Sized>(
    trellis: &Trellis,
    metric: &B,
    config: &SisoConfig,
    channel_llr: &[f32],
    apriori_llr: &[f32],
    ws: &mut Workspace,
    output: &mut SisoOutput,
) -> Result<(), SisoError> {
    let block = Block::new(trellis, config.termination, channel_llr, apriori_llr)?;

    let num_states = trellis.num_states();
    let num_stages = block.num_stages();
    let symbol_width = trellis.symbol_width();

    debug!(
        num_states,
        num_stages,
        symbol_width,
        termination = ?config.termination,
        "decoding block"
    );

    let peak = block.peak_magnitude();
    if peak > INPUT_MAGNITUDE_WARNING {
        warn!(peak, limit = INPUT_MAGNITUDE_WARNING, "input LLR magnitude approaches the unreachable sentinel");
    }

    ws.prepare(num_states, num_stages, symbol_width);
    output.prepare(block.info_len(), num_stages, symbol_width);

    match config.max_star {
        MaxStarKind::Linear => run_passes::<LinearLogMap, B>(trellis, metric, &block, ws, output),
        MaxStarKind::Max => run_passes::<MaxLogMap, B>(trellis, metric, &block, ws, output),
        MaxStarKind::Constant => run_passes::<ConstantLogMap, B>(trellis, metric, &block, ws, output),
        MaxStarKind::Table => run_passes::<TableLogMap, B>(trellis, metric, &block, ws, output),
        MaxStarKind::Exact => run_passes::<LogMap, B>(trellis, metric, &block, ws, output),
    }

    Ok(())
}

fn run_passes<M, B>(trellis: &Trellis, metric: &B, block: &Block<'_>, ws: &mut Workspace, output: &mut SisoOutput)
where
    M: MaxStar,
    B: BranchMetric + ?Sized,
{
    backward_pass::<M, B>(trellis, metric, block, ws);
    forward_pass::<M, B>(
        trellis,
        metric,
        block,
        ws,
        &mut output.data_llr,
        &mut output.coded_llr,
    );
}
