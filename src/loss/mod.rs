//! Weighted four-term loss between a candidate image and a plane target.
//!
//! - direct: MSE over the whole image.
//! - masked: MSE restricted to the selected plane's mask.
//! - correlation: MSE between `image·target` and `target·target`.
//! - edge: MSE between masked Sobel magnitudes.
//!
//! The evaluator also returns the analytic gradient with respect to the
//! candidate image for `mean` and `sum` reductions.

pub mod evaluator;
pub mod params;

pub use evaluator::{LossEvaluator, LossTerms, LossValue};
pub use params::{LossWeights, Reduction};
