//! Serializable reports describing how a target stack was built.
//!
//! `TargetReport` is produced once at construction and carries per-plane
//! coverage and intensity statistics, the inter-plane sigma table used by the
//! defocus stage and a timing breakdown of the construction stages.

pub mod targets;
pub mod timing;

pub use targets::{PlaneReport, TargetReport};
pub use timing::{StageTiming, TimingBreakdown};
