//! Branch metrics and the per-stage metric cache
//!
//! A branch metric is the log-domain likelihood of one stage's received
//! values given that a particular output symbol was sent. The decoder only
//! needs one value per symbol per stage, so [`BranchMetricCache`] evaluates
//! the provider once for each of the 2^nn symbols and every transition reads
//! from the cache.

use std::ops::Index;

use bitvec::prelude::*;

/// Source of branch metrics
///
/// `received` holds the `nn` channel LLRs of one stage; `symbol` is an
/// `nn`-bit output symbol whose MSB corresponds to `received[0]`.
pub trait BranchMetric {
    fn metric(&self, received: &[f32], symbol: usize) -> f32;
}

impl<F> BranchMetric for F
where
    F: Fn(&[f32], usize) -> f32,
{
    fn metric(&self, received: &[f32], symbol: usize) -> f32 {
        self(received, symbol)
    }
}

/// Correlation metric for LLR-valued channel observations
///
/// Sums the received LLR of every coded bit that is 1 in the symbol. Up to a
/// per-stage constant this is the log-likelihood of the symbol when the inputs
/// are LLRs of the form log(P(1)/P(0)), e.g. `2*y/sigma^2` for BPSK mapping
/// 1 to +1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlation;

impl BranchMetric for Correlation {
    #[inline]
    fn metric(&self, received: &[f32], symbol: usize) -> f32 {
        let bits = symbol.view_bits::<Msb0>();
        let bits = &bits[bits.len() - received.len()..];

        received
            .iter()
            .zip(bits.iter().by_vals())
            .filter_map(|(&llr, bit)| bit.then_some(llr))
            .sum()
    }
}

/// Branch metrics of every output symbol for one trellis stage
#[derive(Debug, Clone, Default)]
pub struct BranchMetricCache {
    metrics: Vec<f32>,
}

impl BranchMetricCache {
    pub fn new(num_symbols: usize) -> Self {
        Self {
            metrics: vec![0.0; num_symbols],
        }
    }

    /// Change the alphabet size, keeping the allocation where possible
    pub fn resize(&mut self, num_symbols: usize) {
        self.metrics.resize(num_symbols, 0.0);
    }

    pub fn num_symbols(&self) -> usize {
        self.metrics.len()
    }

    /// Evaluate `metric` for every symbol against one stage's received values
    pub fn fill<B: BranchMetric + ?Sized>(&mut self, metric: &B, received: &[f32]) {
        for (symbol, m) in self.metrics.iter_mut().enumerate() {
            *m = metric.metric(received, symbol);
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.metrics
    }
}

impl Index<usize> for BranchMetricCache {
    type Output = f32;

    #[inline]
    fn index(&self, symbol: usize) -> &f32 {
        &self.metrics[symbol]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_correlation_msb_first() {
        let received = [1.0f32, 2.0, 4.0];
        assert_eq!(Correlation.metric(&received, 0b000), 0.0);
        assert_eq!(Correlation.metric(&received, 0b100), 1.0);
        assert_eq!(Correlation.metric(&received, 0b010), 2.0);
        assert_eq!(Correlation.metric(&received, 0b001), 4.0);
        assert_eq!(Correlation.metric(&received, 0b111), 7.0);
    }

    #[test]
    fn test_cache_fill_covers_alphabet() {
        let mut cache = BranchMetricCache::new(4);
        cache.fill(&Correlation, &[-3.0, 0.5]);
        assert_eq!(cache.as_slice(), &[0.0, 0.5, -3.0, -2.5]);
        assert_eq!(cache[3], -2.5);
    }

    #[test]
    fn test_cache_calls_provider_once_per_symbol() {
        let calls = Cell::new(0usize);
        let counting = |received: &[f32], symbol: usize| {
            calls.set(calls.get() + 1);
            received[0] * symbol as f32
        };

        let mut cache = BranchMetricCache::new(8);
        cache.fill(&counting, &[2.0, 0.0, 0.0]);
        assert_eq!(calls.get(), 8);
        assert_eq!(cache[5], 10.0);
    }

    #[test]
    fn test_cache_resize() {
        let mut cache = BranchMetricCache::new(2);
        cache.resize(16);
        assert_eq!(cache.num_symbols(), 16);
        cache.fill(&Correlation, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(cache[0b1111], 4.0);
    }
}
