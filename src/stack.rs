//! `N × H × W` stacks of equally sized planes.
//!
//! The same container holds the binary mask stack produced by depth
//! quantization and the target stack consumed by the optimiser. Stacks are
//! built once and then only read; transforms return new stacks.
use crate::error::{ensure_shape, MultiplaneError, Result};
use crate::image::ImageF32;

#[derive(Clone, Debug, PartialEq)]
pub struct PlaneStack {
    w: usize,
    h: usize,
    planes: Vec<ImageF32>,
}

/// Binary per-plane membership; every pixel is set in exactly one plane.
pub type MaskStack = PlaneStack;
/// Per-plane target intensities.
pub type TargetStack = PlaneStack;

impl PlaneStack {
    /// Assemble a stack, checking that every plane matches `w × h`.
    pub fn from_planes(w: usize, h: usize, planes: Vec<ImageF32>) -> Result<Self> {
        for plane in &planes {
            ensure_shape("stack plane", (w, h), plane.dims())?;
        }
        Ok(Self { w, h, planes })
    }

    /// Caller guarantees every plane is `w × h`.
    pub(crate) fn from_parts(w: usize, h: usize, planes: Vec<ImageF32>) -> Self {
        debug_assert!(planes.iter().all(|p| p.dims() == (w, h)));
        Self { w, h, planes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Borrow plane `i`, failing with `PlaneOutOfRange` past the end.
    pub fn plane(&self, i: usize) -> Result<&ImageF32> {
        self.planes.get(i).ok_or(MultiplaneError::PlaneOutOfRange {
            plane: i,
            planes: self.planes.len(),
        })
    }

    pub fn planes(&self) -> &[ImageF32] {
        &self.planes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageF32> {
        self.planes.iter()
    }

    /// Sum of all planes: the fully in-focus rendering of the scene.
    pub fn composite(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.w, self.h);
        for plane in &self.planes {
            out.add_assign(plane);
        }
        out
    }

    /// Every plane multiplied by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            w: self.w,
            h: self.h,
            planes: self.planes.iter().map(|p| p.scaled(k)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlaneStack {
    type Item = &'a ImageF32;
    type IntoIter = std::slice::Iter<'a, ImageF32>;

    fn into_iter(self) -> Self::IntoIter {
        self.planes.iter()
    }
}
