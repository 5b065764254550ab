//! Depth quantization into discrete focal planes.
//!
//! A continuous depth map in `[0, 1]` is scaled by `N - 1` and rounded
//! half-to-even, so `0.5 → 0`, `1.5 → 2`, `2.5 → 2`. Samples outside `[0, 1]`
//! are clamped (and counted in a single `warn!`); NaN or infinite samples are
//! rejected. The resulting indices partition the image: each pixel belongs to
//! exactly one plane mask.
use crate::device::Device;
use crate::error::{MultiplaneError, Result};
use crate::image::{ImageF32, ImageView};
use crate::stack::{MaskStack, PlaneStack};
use log::{debug, warn};

/// Per-pixel plane index in `0..planes`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantizedDepth {
    w: usize,
    h: usize,
    planes: usize,
    indices: Vec<u32>,
}

/// Quantize `depth` into `planes` discrete levels.
pub fn quantize_depth(depth: &ImageF32, planes: usize) -> Result<QuantizedDepth> {
    if planes == 0 {
        return Err(MultiplaneError::InvalidPlaneCount(planes));
    }
    let scale = (planes - 1) as f32;
    let mut indices = Vec::with_capacity(depth.len());
    let mut clamped = 0usize;
    for (y, row) in depth.rows().enumerate() {
        for (x, &d) in row.iter().enumerate() {
            if !d.is_finite() {
                return Err(MultiplaneError::NonFiniteDepth { x, y });
            }
            if !(0.0..=1.0).contains(&d) {
                clamped += 1;
            }
            let level = (d.clamp(0.0, 1.0) * scale).round_ties_even();
            indices.push(level as u32);
        }
    }
    if clamped > 0 {
        warn!("quantize_depth: clamped {clamped} depth samples outside [0, 1]");
    }
    debug!(
        "quantize_depth: {}x{} into {} planes",
        depth.w, depth.h, planes
    );
    Ok(QuantizedDepth {
        w: depth.w,
        h: depth.h,
        planes,
        indices,
    })
}

impl QuantizedDepth {
    #[inline]
    pub fn planes(&self) -> usize {
        self.planes
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Plane index at (x, y).
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> u32 {
        self.indices[y * self.w + x]
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of pixels assigned to `plane`.
    pub fn coverage(&self, plane: usize) -> usize {
        self.indices.iter().filter(|&&i| i as usize == plane).count()
    }

    /// Indices divided by `N - 1`, i.e. depth snapped back into `[0, 1]`.
    /// A single-plane stack maps everything to 0.
    pub fn normalized(&self) -> ImageF32 {
        let denom = self.planes.saturating_sub(1).max(1) as f32;
        let data = self.indices.iter().map(|&i| i as f32 / denom).collect();
        ImageF32 {
            w: self.w,
            h: self.h,
            stride: self.w,
            data,
        }
    }

    /// Binary masks, one per plane; plane `i` is 1 where the index equals `i`.
    pub fn masks(&self, device: Device) -> MaskStack {
        let planes = device.map_planes(self.planes, |plane| {
            let data = self
                .indices
                .iter()
                .map(|&i| if i as usize == plane { 1.0 } else { 0.0 })
                .collect();
            ImageF32 {
                w: self.w,
                h: self.h,
                stride: self.w,
                data,
            }
        });
        PlaneStack::from_parts(self.w, self.h, planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_to_even() {
        // N = 5 → scale 4: exact ties at 0.5, 1.5, 2.5 and 3.5
        let depth = ImageF32::from_vec(4, 1, vec![0.125, 0.375, 0.625, 0.875]).unwrap();
        let q = quantize_depth(&depth, 5).unwrap();
        assert_eq!(q.indices(), &[0, 2, 2, 4]);
    }

    #[test]
    fn out_of_range_depth_is_clamped() {
        let depth = ImageF32::from_vec(2, 1, vec![-0.4, 1.7]).unwrap();
        let q = quantize_depth(&depth, 5).unwrap();
        assert_eq!(q.indices(), &[0, 4]);
    }

    #[test]
    fn non_finite_depth_fails_fast() {
        let mut depth = ImageF32::filled(3, 3, 0.5);
        depth.set(2, 1, f32::NAN);
        assert_eq!(
            quantize_depth(&depth, 3),
            Err(MultiplaneError::NonFiniteDepth { x: 2, y: 1 })
        );
    }

    #[test]
    fn zero_planes_is_rejected() {
        let depth = ImageF32::filled(2, 2, 0.5);
        assert_eq!(
            quantize_depth(&depth, 0),
            Err(MultiplaneError::InvalidPlaneCount(0))
        );
    }

    #[test]
    fn single_plane_collapses_everything() {
        let depth = ImageF32::from_fn(4, 4, |x, y| (x + y) as f32 / 6.0);
        let q = quantize_depth(&depth, 1).unwrap();
        assert_eq!(q.coverage(0), 16);
        assert!(q.normalized().data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn masks_partition_the_image() {
        let depth = ImageF32::from_fn(7, 5, |x, y| ((x * 3 + y) % 11) as f32 / 10.0);
        let q = quantize_depth(&depth, 4).unwrap();
        let masks = q.masks(Device::Parallel);
        assert_eq!(masks.len(), 4);
        for y in 0..5 {
            for x in 0..7 {
                let total: f32 = masks.iter().map(|m| m.get(x, y)).sum();
                assert_eq!(total, 1.0);
                let owner = q.index(x, y) as usize;
                assert_eq!(masks.plane(owner).unwrap().get(x, y), 1.0);
            }
        }
    }
}
