//! Defocus bleed between focal planes.
//!
//! Each plane `i` receives, inside every other populated plane `j`, the
//! in-focus composite of the whole scene blurred by a Gaussian whose sigma
//! grows with `|i - j|`:
//!
//! ```text
//! sigma(i, j) = |i - j| / N * target_blur_size * blur_ratio
//! target[i]   = sharp[i] + Σ_{j ≠ i, mass(mask[j]) > 0} (G_sigma(i,j) * composite) · mask[j]
//! ```
//!
//! The composite, rather than plane `j` alone, is blurred so that light
//! spreading across depth boundaries mixes the way an out-of-focus view does.
//! This is a visual approximation of the circle of confusion, not an optical
//! simulation.
//!
//! Sigma only depends on the plane distance, so each distinct `|i - j|` is
//! blurred once and shared by every pair at that distance. The kernel extent
//! is fixed at `target_blur_size`; see [`defocus_kernel`] for the sampling.
use crate::device::Device;
use crate::error::{ensure_shape, MultiplaneError, Result};
use crate::filters::gaussian::defocus_kernel;
use crate::filters::separable::{convolve_separable, Border};
use crate::image::ImageF32;
use crate::stack::{MaskStack, PlaneStack, TargetStack};
use log::debug;
use serde::{Deserialize, Serialize};

/// Keeps the per-plane sigma offsets finite for single-plane stacks.
const OFFSET_EPS: f32 = 1e-10;

/// Parameters controlling the defocus spread.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    /// Kernel extent in pixels (both axes); also the sigma scale.
    #[serde(alias = "defocus_blur_size")]
    pub target_blur_size: usize,
    /// Fraction in `[0, 1]` of the full sigma applied between planes.
    pub blur_ratio: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            target_blur_size: 10,
            blur_ratio: 0.25,
        }
    }
}

impl BlurParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.blur_ratio) {
            return Err(MultiplaneError::InvalidParameter {
                name: "blur_ratio",
                value: self.blur_ratio,
            });
        }
        if self.target_blur_size == 0 {
            return Err(MultiplaneError::InvalidParameter {
                name: "target_blur_size",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Blur sigma used when plane `j` bleeds into plane `i` of an `n`-plane stack.
    pub fn sigma(&self, i: usize, j: usize, n: usize) -> f32 {
        if n == 0 {
            return 0.0;
        }
        i.abs_diff(j) as f32 / n as f32 * self.target_blur_size as f32 * self.blur_ratio
    }

    /// Signed blur offsets of every plane as seen from plane `i`:
    /// `linspace(0, L, n) - i * L / (n - 1 + ε)`.
    pub fn sigma_offsets(&self, i: usize, n: usize) -> Vec<f32> {
        let extent = self.target_blur_size as f32;
        let step = if n > 1 { extent / (n - 1) as f32 } else { 0.0 };
        let shift = i as f32 * extent / ((n as f32 - 1.0) + OFFSET_EPS);
        (0..n).map(|k| k as f32 * step - shift).collect()
    }
}

/// Add defocus bleed from every other populated plane to each plane of `sharp`.
///
/// Returns a new stack; `sharp` is left untouched.
pub fn apply_defocus(
    sharp: &TargetStack,
    masks: &MaskStack,
    blur: &BlurParams,
    device: Device,
) -> Result<TargetStack> {
    blur.validate()?;
    if masks.len() != sharp.len() {
        return Err(MultiplaneError::PlaneCountMismatch {
            expected: sharp.len(),
            found: masks.len(),
        });
    }
    ensure_shape("mask stack", sharp.dims(), masks.dims())?;

    let n = sharp.len();
    let populated: Vec<bool> = masks.iter().map(|m| m.sum() > 0.0).collect();
    let composite = sharp.composite();

    // distance d = |i - j| in 1..n; index 0 unused
    let blurred: Vec<Option<ImageF32>> = device.map_planes(n, |d| {
        if d == 0 {
            return None;
        }
        let needed = (0..n).any(|j| populated[j] && (j >= d || j + d < n));
        if !needed {
            return None;
        }
        let sigma = blur.sigma(0, d, n);
        match defocus_kernel(blur.target_blur_size, sigma) {
            Some(kernel) => Some(convolve_separable(&composite, &kernel, Border::Zero, device)),
            None => {
                debug!("apply_defocus: distance {d} has negligible sigma {sigma:.3e}, no bleed");
                None
            }
        }
    });

    let planes = device.map_planes(n, |i| {
        let mut target = sharp.planes()[i].clone();
        for (j, mask) in masks.iter().enumerate() {
            if j == i || !populated[j] {
                continue;
            }
            if let Some(spread) = &blurred[i.abs_diff(j)] {
                target.add_assign(&spread.mul(mask));
            }
        }
        target
    });
    debug!(
        "apply_defocus: {n} planes, blur size {}, ratio {}",
        blur.target_blur_size, blur.blur_ratio
    );
    let (w, h) = sharp.dims();
    Ok(PlaneStack::from_parts(w, h, planes))
}
