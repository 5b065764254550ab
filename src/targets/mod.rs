//! Per-plane target synthesis.
//!
//! Two stages, each returning a fresh stack:
//! - [`synthesize_sharp`]: in-focus content of every plane.
//! - [`apply_defocus`]: out-of-focus bleed from the other planes.

pub mod defocus;
pub mod sharp;

pub use defocus::{apply_defocus, BlurParams};
pub use sharp::synthesize_sharp;
