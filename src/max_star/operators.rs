//! The five max-star operators
//!
//! Each is a zero-sized type so the decoder can be monomorphized over the
//! chosen operator and the recursion loops call it without any dispatch.

use super::constants::*;
use super::{MaxStar, MaxStarKind};

/// Linear-log-MAP: piecewise-linear correction that vanishes past a threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLogMap;

/// Max-log-MAP: no correction at all
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLogMap;

/// Constant-log-MAP: fixed correction for close arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantLogMap;

/// Log-MAP with the correction read from an 8-segment nonuniform table
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLogMap;

/// Log-MAP with the correction evaluated exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMap;

impl MaxStar for LinearLogMap {
    const KIND: MaxStarKind = MaxStarKind::Linear;
    const MAX_ERROR: f32 = 0.08;

    #[inline]
    fn max_star(x: f32, y: f32) -> f32 {
        let diff = y - x;

        if diff > LINEAR_THRESHOLD {
            y
        } else if diff < -LINEAR_THRESHOLD {
            x
        } else if diff > 0.0 {
            y + LINEAR_SLOPE * (diff - LINEAR_THRESHOLD)
        } else {
            x - LINEAR_SLOPE * (diff + LINEAR_THRESHOLD)
        }
    }
}

impl MaxStar for MaxLogMap {
    const KIND: MaxStarKind = MaxStarKind::Max;
    const MAX_ERROR: f32 = 0.70;

    #[inline]
    fn max_star(x: f32, y: f32) -> f32 {
        if x > y {
            x
        } else {
            y
        }
    }
}

impl MaxStar for ConstantLogMap {
    const KIND: MaxStarKind = MaxStarKind::Constant;
    const MAX_ERROR: f32 = 0.30;

    #[inline]
    fn max_star(x: f32, y: f32) -> f32 {
        let diff = y - x;

        if diff > CONSTANT_THRESHOLD {
            y
        } else if diff < -CONSTANT_THRESHOLD {
            x
        } else if diff > 0.0 {
            y + CONSTANT_CORRECTION
        } else {
            x + CONSTANT_CORRECTION
        }
    }
}

impl MaxStar for TableLogMap {
    const KIND: MaxStarKind = MaxStarKind::Table;
    const MAX_ERROR: f32 = 0.01;

    #[inline]
    fn max_star(x: f32, y: f32) -> f32 {
        let correction = table_correction((y - x).abs());
        if x > y {
            x + correction
        } else {
            y + correction
        }
    }
}

impl MaxStar for LogMap {
    const KIND: MaxStarKind = MaxStarKind::Exact;
    const MAX_ERROR: f32 = 0.0;

    #[inline]
    fn max_star(x: f32, y: f32) -> f32 {
        if x > y {
            x + libm::log1pf(libm::expf(y - x))
        } else {
            y + libm::log1pf(libm::expf(x - y))
        }
    }
}

/// Interpolated correction term for a non-negative argument distance
///
/// Segment selection is a balanced decision tree over the boundaries rather
/// than a scan.
#[inline]
fn table_correction(diff: f32) -> f32 {
    let b = &TABLE_BOUNDARY;

    if diff > b[8] {
        return 0.0;
    }

    let segment = if diff > b[4] {
        if diff > b[6] {
            if diff > b[7] { 7 } else { 6 }
        } else if diff > b[5] {
            5
        } else {
            4
        }
    } else if diff > b[2] {
        if diff > b[3] { 3 } else { 2 }
    } else if diff > b[1] {
        1
    } else {
        0
    };

    TABLE_VALUE[segment] + TABLE_SLOPE[segment] * (diff - b[segment])
}
