#![allow(dead_code)]

use multiplane_targets::image::ImageF32;

/// Generates a simple high-contrast checkerboard image in `[0, 1]`.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    ImageF32::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) & 1 == 0 {
            32.0 / 255.0
        } else {
            220.0 / 255.0
        }
    })
}

/// Depth map split into four `size/2 × size/2` blocks at depths
/// `0, 1/3, 2/3, 1` (row-major: top-left, top-right, bottom-left, bottom-right).
pub fn quadrant_depth(size: usize) -> ImageF32 {
    assert!(size >= 2 && size % 2 == 0, "size must be even");
    let half = size / 2;
    ImageF32::from_fn(size, size, |x, y| {
        let block = (y / half) * 2 + (x / half);
        block as f32 / 3.0
    })
}

/// Smooth horizontal depth ramp from 0 (left) to 1 (right) with a mild
/// vertical wobble so plane borders are not straight.
pub fn wavy_ramp(width: usize, height: usize) -> ImageF32 {
    let span = (width.max(2) - 1) as f32;
    ImageF32::from_fn(width, height, |x, y| {
        let wobble = 0.08 * (y as f32 * 0.7).sin();
        (x as f32 / span + wobble).clamp(0.0, 1.0)
    })
}
