//! Tuning constants for the approximate max-star operators
//!
//! These are empirical fits against log(1 + exp(-d)) and are kept exactly as
//! published. Do not re-derive them.

#![allow(clippy::excessive_precision)]

/// Magnitude of the "unreachable" state metric
///
/// State metrics are `f32`. The sentinel is `-MAX_LOG`; at this magnitude the
/// f32 spacing is 1.0, so any correction a max-star operator adds to two
/// sentinels is absorbed and the result stays a sentinel. Legitimate metrics
/// must stay several orders of magnitude below this bound.
pub const MAX_LOG: f32 = 1.0e7;

/// Distance beyond which the linear correction is zero
pub const LINEAR_THRESHOLD: f32 = 2.50681740420944;

/// Slope of the linear correction term
pub const LINEAR_SLOPE: f32 = -0.24904163195436;

/// Distance at or below which the constant correction applies
pub const CONSTANT_THRESHOLD: f32 = 1.5;

/// Value of the constant correction
pub const CONSTANT_CORRECTION: f32 = 0.5;

/// Left boundary of each interpolation segment, followed by the cutoff
pub const TABLE_BOUNDARY: [f32; 9] = [
    0.0, 0.4200, 0.8500, 1.3100, 1.8300, 2.4100, 3.1300, 4.0800, 5.6000,
];

/// Slope of each interpolation segment
pub const TABLE_SLOPE: [f32; 8] = [
    -0.44788139700522,
    -0.34691145436176,
    -0.25432579542705,
    -0.17326680196715,
    -0.10822110027877,
    -0.06002650498009,
    -0.02739265095522,
    -0.00860202759280,
];

/// Correction value at the left boundary of each segment
pub const TABLE_VALUE: [f32; 8] = [
    0.68954718055995,
    0.50153699381775,
    0.35256506844219,
    0.23567520254575,
    0.14607646552283,
    0.08360822736113,
    0.04088914377547,
    0.01516612536801,
];
