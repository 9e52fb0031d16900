//! Per-stage state metric normalization
//!
//! Log-domain state metrics grow without bound over a long block. Subtracting
//! the state-0 metric after every stage keeps them small. LLRs are differences
//! of sums of equally shifted terms, so the shift never changes an output.

/// Shift `metrics` in place so that state 0 is exactly zero
#[inline]
pub(crate) fn normalize(metrics: &mut [f32]) {
    let reference = metrics[0];
    for m in metrics.iter_mut() {
        *m -= reference;
    }
}

/// Write `src` shifted so that state 0 is exactly zero into `dst`
#[inline]
pub(crate) fn normalize_into(dst: &mut [f32], src: &[f32]) {
    let reference = src[0];
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s - reference;
    }
}
