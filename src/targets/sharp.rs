use crate::device::Device;
use crate::error::{ensure_shape, Result};
use crate::filters::unsharp::{unsharp_mask, SHARPEN_KERNEL_SIZE, SHARPEN_SIGMA};
use crate::image::ImageF32;
use crate::stack::{MaskStack, PlaneStack, TargetStack};
use log::debug;

/// In-focus content per plane: the unsharp-masked source restricted to each
/// plane's mask, zero elsewhere.
///
/// The full image is sharpened once, before masking, so plane borders see the
/// same neighbourhood as the interior.
pub fn synthesize_sharp(image: &ImageF32, masks: &MaskStack, device: Device) -> Result<TargetStack> {
    ensure_shape("source image", masks.dims(), image.dims())?;
    let sharpened = unsharp_mask(image, SHARPEN_KERNEL_SIZE, SHARPEN_SIGMA, device);
    let planes = device.map_planes(masks.len(), |i| sharpened.mul(&masks.planes()[i]));
    debug!(
        "synthesize_sharp: {} planes from {}x{} source",
        planes.len(),
        image.w,
        image.h
    );
    let (w, h) = masks.dims();
    Ok(PlaneStack::from_parts(w, h, planes))
}
