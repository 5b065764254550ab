//! Multiplane target stack and loss, wired end to end.
//!
//! Overview
//! - Quantizes the depth map into `N` planes and builds the partitioning mask
//!   stack.
//! - Sharpens the source once and splits it into per-plane in-focus targets.
//! - With the `defocus` scheme, adds out-of-focus bleed from every other
//!   populated plane, then scales the whole stack by the multiplier.
//! - Freezes masks and targets; `evaluate` and `gradient` only read them.
//!
//! Modules
//! - [`params`] – configuration shared by the library and the CLI.
//! - `pipeline` – the [`MultiplaneLoss`] implementation.

pub mod params;
mod pipeline;

pub use params::{MultiplaneParams, Scheme};
pub use pipeline::MultiplaneLoss;
