//! Forward recursion fused with LLR synthesis
//!
//! The forward pass walks the trellis left to right keeping only the previous
//! stage's normalized alpha. Because every beta is already in the workspace,
//! each stage's output LLRs are finished as soon as that stage's alpha is
//! known, so there is no third pass.

use tracing::trace;

use super::block::Block;
use super::normalize::normalize_into;
use super::workspace::Workspace;
use crate::branch_metric::BranchMetric;
use crate::max_star::{MaxStar, MAX_LOG};
use crate::trellis::Trellis;

/// Run the forward pass over all stages, writing every output LLR
///
/// `data_llr` must hold `LL` values and `coded_llr` `nn * (LL + M)`.
pub(crate) fn forward_pass<M, B>(
    trellis: &Trellis,
    metric: &B,
    block: &Block<'_>,
    ws: &mut Workspace,
    data_llr: &mut [f32],
    coded_llr: &mut [f32],
) where
    M: MaxStar,
    B: BranchMetric + ?Sized,
{
    init_forward(ws);
    for k in 1..=block.num_stages() {
        forward_stage::<M, B>(trellis, metric, block, ws, k, data_llr, coded_llr);
    }
}

/// The encoder starts in state 0
pub(crate) fn init_forward(ws: &mut Workspace) {
    ws.alpha_prime.fill(-MAX_LOG);
    ws.alpha_prime[0] = 0.0;
}

/// Advance alpha across stage `k - 1` and emit that stage's LLRs
///
/// On entry `ws.alpha_prime` holds the normalized metrics at boundary `k - 1`;
/// on exit it holds them at boundary `k`.
pub(crate) fn forward_stage<M, B>(
    trellis: &Trellis,
    metric: &B,
    block: &Block<'_>,
    ws: &mut Workspace,
    k: usize,
    data_llr: &mut [f32],
    coded_llr: &mut [f32],
) where
    M: MaxStar,
    B: BranchMetric + ?Sized,
{
    let num_states = trellis.num_states();
    let nn = trellis.symbol_width();
    let stage = k - 1;
    let Workspace {
        beta,
        alpha,
        alpha_prime,
        metrics,
        num_llr_c,
        den_llr_c,
        ..
    } = ws;

    let app_in = block.apriori(stage);
    metrics.fill(metric, block.received(stage));

    // Accumulate alpha: several source states fold into each destination
    alpha.fill(-MAX_LOG);
    for (state, &alpha_s) in alpha_prime.iter().enumerate() {
        let [next0, next1] = trellis.next_states(state);
        let [out0, out1] = trellis.output_symbols(state);

        alpha[next0] = M::max_star(alpha_s + metrics[out0], alpha[next0]);
        alpha[next1] = M::max_star(alpha_s + metrics[out1] + app_in, alpha[next1]);
    }

    // Departing branches combined with the stored beta
    let beta_k = &beta[k * num_states..(k + 1) * num_states];
    let mut den_llr_u = -MAX_LOG;
    let mut num_llr_u = -MAX_LOG;
    num_llr_c.fill(-MAX_LOG);
    den_llr_c.fill(-MAX_LOG);

    for (state, &alpha_s) in alpha_prime.iter().enumerate() {
        let [next0, next1] = trellis.next_states(state);
        let [out0, out1] = trellis.output_symbols(state);

        let delta0 = alpha_s + metrics[out0] + beta_k[next0];
        den_llr_u = M::max_star(delta0, den_llr_u);
        route_coded_bits::<M>(delta0, out0, num_llr_c, den_llr_c);

        let delta1 = alpha_s + metrics[out1] + beta_k[next1] + app_in;
        num_llr_u = M::max_star(delta1, num_llr_u);
        route_coded_bits::<M>(delta1, out1, num_llr_c, den_llr_c);
    }

    if stage < block.info_len() {
        data_llr[stage] = num_llr_u - den_llr_u;
    }
    for (i, llr) in coded_llr[nn * stage..nn * k].iter_mut().enumerate() {
        *llr = num_llr_c[i] - den_llr_c[i];
    }

    normalize_into(alpha_prime, alpha);

    if tracing::enabled!(tracing::Level::TRACE) {
        trace!(stage, coded_llr = ?&coded_llr[nn * stage..nn * k], alpha = ?alpha_prime, "forward stage");
    }
}

/// Fold a branch metric into the per coded bit accumulators, MSB first
#[inline]
fn route_coded_bits<M: MaxStar>(delta: f32, symbol: usize, num: &mut [f32], den: &mut [f32]) {
    let mut mask = 1 << (num.len() - 1);
    for (n, d) in num.iter_mut().zip(den.iter_mut()) {
        if symbol & mask != 0 {
            *n = M::max_star(delta, *n);
        } else {
            *d = M::max_star(delta, *d);
        }
        mask >>= 1;
    }
}
