#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod depth;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod loss;
pub mod multiplane;
pub mod stack;
pub mod targets;

// Building blocks – public, but considered unstable internals.
pub mod config;
pub mod filters;

// --- High-level re-exports -------------------------------------------------

// Main entry point: frozen targets + loss.
pub use crate::multiplane::{MultiplaneLoss, MultiplaneParams, Scheme};

// Stage-level operations for callers composing their own pipeline.
pub use crate::depth::{quantize_depth, QuantizedDepth};
pub use crate::targets::{apply_defocus, synthesize_sharp, BlurParams};

pub use crate::device::Device;
pub use crate::error::MultiplaneError;
pub use crate::loss::{LossEvaluator, LossTerms, LossValue, LossWeights, Reduction};
pub use crate::stack::{MaskStack, PlaneStack, TargetStack};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use multiplane_targets::image::ImageF32;
/// use multiplane_targets::prelude::*;
///
/// # fn main() -> Result<(), MultiplaneError> {
/// let (w, h) = (64usize, 64usize);
/// let image = ImageF32::filled(w, h, 0.5);
/// let depth = ImageF32::from_fn(w, h, |x, _| x as f32 / (w - 1) as f32);
///
/// let loss = MultiplaneLoss::new(&image, &depth, MultiplaneParams::default(), Device::Cpu)?;
/// let (targets, _depth) = loss.get_targets();
/// let value = loss.evaluate(&image, targets.plane(0)?, Some(0))?;
/// println!("loss={:?}", value.scalar());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{Device, LossValue, MultiplaneError, MultiplaneLoss, MultiplaneParams};
}
