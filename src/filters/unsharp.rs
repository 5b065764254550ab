use super::gaussian::gaussian_kernel;
use super::separable::{convolve_separable, Border};
use crate::device::Device;
use crate::image::ImageF32;

/// Kernel extent used when sharpening plane targets.
pub const SHARPEN_KERNEL_SIZE: usize = 9;
/// Gaussian sigma used when sharpening plane targets.
pub const SHARPEN_SIGMA: f32 = 5.0;

/// Unsharp mask: `src + (src - G(src)) = 2·src - G(src)`.
///
/// `G` is a normalised `size × size` Gaussian with reflected borders.
pub fn unsharp_mask(src: &ImageF32, size: usize, sigma: f32, device: Device) -> ImageF32 {
    let kernel = gaussian_kernel(size, sigma);
    let blurred = convolve_separable(src, &kernel, Border::Reflect, device);
    src.zip_map(&blurred, |s, b| s + (s - b))
}
