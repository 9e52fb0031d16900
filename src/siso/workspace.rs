//! Reusable scratch storage for the forward-backward passes

use crate::branch_metric::BranchMetricCache;

/// Scratch buffers for one decoder call
///
/// Sized by (states, stages, symbol width) on every call. Buffers only ever
/// grow their allocation, so a workspace reused across turbo iterations stops
/// allocating after the first block. Every value read during a call is
/// written earlier in the same call.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    num_states: usize,
    num_stages: usize,
    /// Backward metrics for stage boundaries 0..=num_stages, state-major per stage
    pub(crate) beta: Vec<f32>,
    /// Forward metrics being accumulated for the current stage
    pub(crate) alpha: Vec<f32>,
    /// Normalized forward metrics of the previous stage
    pub(crate) alpha_prime: Vec<f32>,
    pub(crate) metrics: BranchMetricCache,
    /// Per coded bit log-sum for the bit being 1
    pub(crate) num_llr_c: Vec<f32>,
    /// Per coded bit log-sum for the bit being 0
    pub(crate) den_llr_c: Vec<f32>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workspace pre-sized for blocks up to the given dimensions
    pub fn with_capacity(num_states: usize, num_stages: usize, symbol_width: usize) -> Self {
        let mut ws = Self::default();
        ws.prepare(num_states, num_stages, symbol_width);
        ws
    }

    pub(crate) fn prepare(&mut self, num_states: usize, num_stages: usize, symbol_width: usize) {
        self.num_states = num_states;
        self.num_stages = num_stages;
        self.beta.resize((num_stages + 1) * num_states, 0.0);
        self.alpha.resize(num_states, 0.0);
        self.alpha_prime.resize(num_states, 0.0);
        self.metrics.resize(1 << symbol_width);
        self.num_llr_c.resize(symbol_width, 0.0);
        self.den_llr_c.resize(symbol_width, 0.0);
    }

    /// Number of trellis stages of the last block
    pub fn num_stages(&self) -> usize {
        self.num_stages
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Backward metrics at stage boundary `stage` (0..=num_stages) of the last block
    pub fn beta(&self, stage: usize) -> &[f32] {
        let start = stage * self.num_states;
        &self.beta[start..start + self.num_states]
    }

    /// Normalized forward metrics after the last completed stage
    pub fn alpha(&self) -> &[f32] {
        &self.alpha_prime
    }
}
