//! Backward recursion
//!
//! Computes the reverse-time state metrics (beta) for every stage boundary of
//! the block, right to left, and leaves them in the workspace for the forward
//! pass to read.

use tracing::trace;

use super::block::Block;
use super::normalize::normalize;
use super::workspace::Workspace;
use crate::branch_metric::BranchMetric;
use crate::max_star::{MaxStar, MAX_LOG};
use crate::trellis::Trellis;

/// Fill `ws.beta` for boundaries `0..=LL+M`
///
/// The final boundary forces the known end state: state 0 is 0 and every
/// other state is unreachable. Boundary `k` is then
/// `beta[k][s] = max*(beta[k+1][next(s,0)] + m(out(s,0)),
///                    beta[k+1][next(s,1)] + m(out(s,1)) + apriori[k])`,
/// normalized so that state 0 is zero.
pub(crate) fn backward_pass<M, B>(trellis: &Trellis, metric: &B, block: &Block<'_>, ws: &mut Workspace)
where
    M: MaxStar,
    B: BranchMetric + ?Sized,
{
    let num_states = trellis.num_states();
    let num_stages = block.num_stages();
    let Workspace { beta, metrics, .. } = ws;

    let end = num_stages * num_states;
    beta[end] = 0.0;
    beta[end + 1..end + num_states].fill(-MAX_LOG);

    let tracing_stages = tracing::enabled!(tracing::Level::TRACE);

    for k in (0..num_stages).rev() {
        let app_in = block.apriori(k);
        metrics.fill(metric, block.received(k));

        let (head, tail) = beta.split_at_mut((k + 1) * num_states);
        let current = &mut head[k * num_states..];
        let next = &tail[..num_states];

        for (state, beta_k) in current.iter_mut().enumerate() {
            let [next0, next1] = trellis.next_states(state);
            let [out0, out1] = trellis.output_symbols(state);

            let delta1 = next[next0] + metrics[out0];
            let delta2 = next[next1] + metrics[out1] + app_in;
            *beta_k = M::max_star(delta1, delta2);
        }

        normalize(current);

        if tracing_stages {
            trace!(stage = k, beta = ?current, "backward stage");
        }
    }
}
