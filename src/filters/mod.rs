//! Linear filters used to build and score target stacks.
//!
//! - Separable convolution with explicit border handling (`Reflect`,
//!   `Replicate`, `Zero`), parallelised per output row via [`Device`].
//! - Normalised Gaussian taps for unsharp masking and the unnormalised
//!   sampled point-spread used to simulate defocus.
//! - Sobel gradient magnitude with its adjoint, so the edge-aware loss term
//!   can be differentiated with respect to the candidate image.
//!
//! [`Device`]: crate::device::Device

pub mod gaussian;
pub mod separable;
pub mod sobel;
pub mod unsharp;

pub use gaussian::{defocus_kernel, gaussian_kernel};
pub use separable::{convolve_separable, Border, Kernel1D, SeparableFilter};
pub use sobel::{sobel_magnitude, SobelField};
pub use unsharp::unsharp_mask;
