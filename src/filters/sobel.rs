//! Sobel gradient magnitude and its adjoint.
//!
//! - Correlates the normalised 3×3 Sobel pair (`X` and `Y`, scaled by 1/8)
//!   with border clamping (replicate).
//! - Magnitude is `sqrt(gx² + gy² + ε)`; the ε keeps flat regions
//!   differentiable and bounds the magnitude away from zero.
//! - [`SobelField::backward`] maps a per-pixel derivative with respect to the
//!   magnitude back onto the input pixels.
//!
//! Complexity: O(W·H) per pass.
use crate::device::Device;
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
const SOBEL_NORM: f32 = 1.0 / 8.0;

/// Added under the square root of the gradient magnitude.
pub const MAGNITUDE_EPS: f32 = 1e-6;

/// Per-pixel Sobel derivatives and magnitude.
#[derive(Clone, Debug)]
pub struct SobelField {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// `sqrt(gx² + gy² + ε)`
    pub mag: ImageF32,
}

#[inline]
fn neighbours(i: usize, n: usize) -> [usize; 3] {
    [i.saturating_sub(1), i, (i + 1).min(n - 1)]
}

/// Compute normalised Sobel derivatives and magnitude of `l`.
pub fn sobel_magnitude(l: &ImageF32, device: Device) -> SobelField {
    let (w, h) = l.dims();
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        let mag = ImageF32::new(w, h);
        return SobelField { gx, gy, mag };
    }

    let correlate = |kernel: &Kernel3, y: usize, row: &mut [f32]| {
        let y_idx = neighbours(y, h);
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        for (x, out) in row.iter_mut().enumerate() {
            let x_idx = neighbours(x, w);
            let mut sum = 0.0;
            for (k_row, src) in kernel.iter().zip(rows.iter()) {
                sum += src[x_idx[0]] * k_row[0] + src[x_idx[1]] * k_row[1] + src[x_idx[2]] * k_row[2];
            }
            *out = sum * SOBEL_NORM;
        }
    };
    device.fill_rows(&mut gx, |y, row| correlate(&SOBEL_KERNEL_X, y, row));
    device.fill_rows(&mut gy, |y, row| correlate(&SOBEL_KERNEL_Y, y, row));

    let mag = gx.zip_map(&gy, |a, b| (a * a + b * b + MAGNITUDE_EPS).sqrt());
    SobelField { gx, gy, mag }
}

impl SobelField {
    /// Given `d_mag = ∂L/∂mag` per pixel, return `∂L/∂input`.
    ///
    /// Applies the transpose of the clamped correlation, so border pixels
    /// collect the contributions of every tap that was clamped onto them.
    pub fn backward(&self, d_mag: &ImageF32) -> ImageF32 {
        let (w, h) = self.mag.dims();
        let mut grad = ImageF32::new(w, h);
        if w == 0 || h == 0 {
            return grad;
        }
        for y in 0..h {
            let y_idx = neighbours(y, h);
            for x in 0..w {
                let up = d_mag.get(x, y);
                if up == 0.0 {
                    continue;
                }
                let m = self.mag.get(x, y);
                let ux = up * self.gx.get(x, y) / m * SOBEL_NORM;
                let uy = up * self.gy.get(x, y) / m * SOBEL_NORM;
                let x_idx = neighbours(x, w);
                for (ky, &sy) in y_idx.iter().enumerate() {
                    let out_row = grad.row_mut(sy);
                    for (kx, &sx) in x_idx.iter().enumerate() {
                        out_row[sx] += SOBEL_KERNEL_X[ky][kx] * ux + SOBEL_KERNEL_Y[ky][kx] * uy;
                    }
                }
            }
        }
        grad
    }
}
