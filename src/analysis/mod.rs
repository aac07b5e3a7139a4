//! Statistics and geometric selection over decoded implant positions.
//!
//! Two pipelines share the [`PointSet`](crate::PointSet) produced by
//! [`io`](crate::io):
//!
//! - depth reporting ([`DepthReport`]): depths below a reference plane,
//!   per-file means, mean pairwise distance and a depth histogram;
//! - pair classification ([`classify`]): deep pairs inside a separation
//!   window that no other implant approaches.
//!
//! [`analyze_nv`] works on two species of one snapshot instead: nitrogen
//! atoms with three carbon neighbours and the distances between them.

mod classify;
mod depth;
mod distance;
mod error;
mod histogram;
mod nv;
mod report;
mod surface;

pub use classify::{ANGSTROM_PER_NM, Classification, PairCriteria, QualifiedPair, classify};
pub use depth::{DepthSeries, mean};
pub use distance::mean_pairwise_distance;
pub use error::Error;
pub use histogram::{Bin, Histogram, MAX_BINS};
pub use nv::{
    DistanceStats, NvAnalysis, NvCriteria, NvPair, PeriodicCell, analyze_nv, find_nv_candidates,
    pair_distances,
};
pub use report::{
    DepthConfig, DepthReport, DepthReportBuilder, FileOutcome, FileStatus, FileSummary, SkipReason,
};
pub use surface::estimate_surface;
