//! Gaussian taps.
//!
//! Two flavours are needed:
//!
//! - [`gaussian_kernel`]: integer offsets `-(n/2)..=n/2`, normalised to unit
//!   sum. Used by the unsharp mask.
//! - [`defocus_kernel`]: the continuous density `N(0, σ²)` sampled on
//!   `linspace(-L/2, L/2, L)`. The outer product of two such kernels is the
//!   sampled 2D point-spread `exp(-(x² + y²) / 2σ²) / (2πσ²)`. Wide spreads
//!   keep their sampled mass (below one, since the extent truncates them);
//!   narrow spreads whose samples sum above one are rescaled to unit mass, so
//!   a defocused region never gains light.
use super::separable::Kernel1D;
use std::f32::consts::PI;

/// Smallest sigma for which the defocus kernel is evaluated. Narrower
/// spreads contribute nothing.
pub const MIN_DEFOCUS_SIGMA: f32 = 1e-5;

/// Normalised Gaussian with `size` taps at integer offsets around the centre.
///
/// Even sizes are shifted by half a pixel so the taps stay symmetric.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Kernel1D {
    let half = (size / 2) as f32;
    let shift = if size % 2 == 0 { 0.5 } else { 0.0 };
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half + shift;
            (-(x * x) / denom).exp()
        })
        .collect();
    let total: f32 = raw.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Kernel1D::new(raw);
    }
    Kernel1D::new(raw.into_iter().map(|v| v / total).collect())
}

/// Sampled 1D defocus density with `length` taps spanning `[-length/2, length/2]`.
///
/// The taps are divided by their sum when it exceeds one. Returns `None` when
/// `sigma <= MIN_DEFOCUS_SIGMA` or `length == 0`.
pub fn defocus_kernel(length: usize, sigma: f32) -> Option<Kernel1D> {
    if length == 0 || !(sigma > MIN_DEFOCUS_SIGMA) {
        return None;
    }
    let extent = length as f32;
    let start = -extent / 2.0;
    let step = if length > 1 {
        extent / (length - 1) as f32
    } else {
        0.0
    };
    let norm = 1.0 / ((2.0 * PI).sqrt() * sigma);
    let denom = 2.0 * sigma * sigma;
    let taps: Vec<f32> = (0..length)
        .map(|i| {
            let x = start + step * i as f32;
            norm * (-(x * x) / denom).exp()
        })
        .collect();
    let mass: f32 = taps.iter().sum();
    if mass > 1.0 {
        return Some(Kernel1D::new(taps.into_iter().map(|t| t / mass).collect()));
    }
    Some(Kernel1D::new(taps))
}
