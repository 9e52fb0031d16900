pub mod branch_metric;
pub mod error;
pub mod max_star;
pub mod siso;
pub mod tracing_init;
pub mod trellis;

pub use branch_metric::{BranchMetric, BranchMetricCache, Correlation};
pub use error::SisoError;
pub use max_star::{MaxStar, MaxStarKind, MAX_LOG};
pub use siso::{decode_blocks, siso, SisoConfig, SisoDecoder, SisoInput, SisoOutput, Termination, Workspace};
pub use trellis::Trellis;
