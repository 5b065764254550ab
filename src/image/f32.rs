//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Every plane of a mask or target stack is one of these. Provides row access,
//! a contiguous slice and a handful of pixelwise helpers used by the target
//! pipeline and the loss.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap row-major samples. Returns `None` when `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(w: usize, h: usize, f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut out = Self::new(w, h);
        out.fill_with(f);
        out
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// `(width, height)` pair, handy for shape checks.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.w * self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all samples, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Pixelwise product with another image of the same shape.
    pub fn mul(&self, other: &ImageF32) -> ImageF32 {
        self.zip_map(other, |a, b| a * b)
    }

    /// Every sample multiplied by `k`.
    pub fn scaled(&self, k: f32) -> ImageF32 {
        self.map(|v| v * k)
    }

    /// In-place `self += other`.
    pub fn add_assign(&mut self, other: &ImageF32) {
        debug_assert!(self.same_shape(other));
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst += src;
        }
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> ImageF32 {
        ImageF32 {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn zip_map(&self, other: &ImageF32, f: impl Fn(f32, f32) -> f32) -> ImageF32 {
        debug_assert_eq!(self.dims(), other.dims());
        ImageF32 {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Largest absolute pixel difference; `f32::INFINITY` on shape mismatch.
    pub fn max_abs_diff(&self, other: &ImageF32) -> f32 {
        if self.dims() != other.dims() {
            return f32::INFINITY;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(ImageF32::from_vec(3, 2, vec![0.0; 5]).is_none());
        let img = ImageF32::from_vec(3, 2, vec![1.0; 6]).unwrap();
        assert_eq!(img.dims(), (3, 2));
    }

    #[test]
    fn pixelwise_helpers_match_manual_math() {
        let a = ImageF32::from_fn(4, 3, |x, y| (x + y) as f32);
        let b = ImageF32::filled(4, 3, 2.0);
        let prod = a.mul(&b);
        assert_eq!(prod.get(3, 2), 10.0);
        assert_eq!(a.scaled(0.5).get(2, 2), 2.0);
        let mut acc = a.clone();
        acc.add_assign(&b);
        assert_eq!(acc.get(0, 0), 2.0);
        assert_eq!(a.sum(), 30.0);
        assert_eq!(acc.max_abs_diff(&a), 2.0);
    }
}
