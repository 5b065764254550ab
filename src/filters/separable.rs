use crate::device::Device;
use crate::image::{ImageF32, ImageView};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order).
    fn taps(&self) -> &[f32];

    /// Index of the tap aligned with the output sample.
    ///
    /// Defaults to `(len - 1) / 2`, which centres odd kernels and leans left
    /// on even ones (the usual "same" padding split).
    fn origin(&self) -> usize {
        self.taps().len().saturating_sub(1) / 2
    }
}

/// Owned 1D kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel1D {
    taps: Vec<f32>,
}

impl Kernel1D {
    pub fn new(taps: Vec<f32>) -> Self {
        Self { taps }
    }

    pub fn sum(&self) -> f32 {
        self.taps.iter().sum()
    }
}

impl SeparableFilter for Kernel1D {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// How samples outside the image are synthesised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
    /// Mirror about the edge sample without repeating it (`dcb|abcd|cba`).
    Reflect,
    /// Repeat the edge sample (`aaa|abcd|ddd`).
    Replicate,
    /// Treat everything outside as zero.
    Zero,
}

impl Border {
    /// Map a possibly out-of-range coordinate onto `0..n`; `None` reads as zero.
    #[inline]
    pub fn resolve(self, i: isize, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let last = n as isize - 1;
        match self {
            Border::Zero => (0..=last).contains(&i).then_some(i as usize),
            Border::Replicate => Some(i.clamp(0, last) as usize),
            Border::Reflect => {
                if last == 0 {
                    return Some(0);
                }
                let period = 2 * last;
                let m = i.rem_euclid(period);
                let r = if m > last { period - m } else { m };
                Some(r as usize)
            }
        }
    }
}

/// Correlate `src` with `filter` along x, then along y.
///
/// `out(x, y) = Σ_k Σ_l t[k] t[l] src(x + k - o, y + l - o)` with `o` the
/// filter origin and out-of-range samples resolved by `border`.
pub fn convolve_separable<F: SeparableFilter + ?Sized>(
    src: &ImageF32,
    filter: &F,
    border: Border,
    device: Device,
) -> ImageF32 {
    let (w, h) = src.dims();
    let taps = filter.taps();
    let origin = filter.origin() as isize;

    let mut horiz = ImageF32::new(w, h);
    device.fill_rows(&mut horiz, |y, row| {
        let src_row = src.row(y);
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                if let Some(sx) = border.resolve(x as isize + k as isize - origin, w) {
                    acc += t * src_row[sx];
                }
            }
            *out = acc;
        }
    });

    let mut out = ImageF32::new(w, h);
    device.fill_rows(&mut out, |y, row| {
        for (k, &t) in taps.iter().enumerate() {
            if let Some(sy) = border.resolve(y as isize + k as isize - origin, h) {
                for (dst, &s) in row.iter_mut().zip(horiz.row(sy)) {
                    *dst += t * s;
                }
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_modes_resolve_as_documented() {
        let n = 4;
        assert_eq!(Border::Reflect.resolve(-1, n), Some(1));
        assert_eq!(Border::Reflect.resolve(-3, n), Some(3));
        assert_eq!(Border::Reflect.resolve(4, n), Some(2));
        assert_eq!(Border::Reflect.resolve(9, n), Some(3));
        assert_eq!(Border::Replicate.resolve(-2, n), Some(0));
        assert_eq!(Border::Replicate.resolve(7, n), Some(3));
        assert_eq!(Border::Zero.resolve(-1, n), None);
        assert_eq!(Border::Zero.resolve(3, n), Some(3));
        assert_eq!(Border::Reflect.resolve(5, 1), Some(0));
        assert_eq!(Border::Replicate.resolve(0, 0), None);
    }

    #[test]
    fn identity_kernel_is_a_no_op() {
        let img = ImageF32::from_fn(5, 4, |x, y| (x * 3 + y) as f32);
        let identity = Kernel1D::new(vec![0.0, 1.0, 0.0]);
        for border in [Border::Reflect, Border::Replicate, Border::Zero] {
            let out = convolve_separable(&img, &identity, border, Device::Cpu);
            assert_eq!(out, img);
        }
    }

    #[test]
    fn box_filter_with_zero_border_loses_mass_at_edges() {
        let img = ImageF32::filled(6, 6, 1.0);
        let boxf = Kernel1D::new(vec![1.0 / 3.0; 3]);
        let zero = convolve_separable(&img, &boxf, Border::Zero, Device::Cpu);
        let replicate = convolve_separable(&img, &boxf, Border::Replicate, Device::Cpu);
        assert!((zero.get(3, 3) - 1.0).abs() < 1e-6);
        assert!((zero.get(0, 0) - 4.0 / 9.0).abs() < 1e-6);
        assert!((replicate.get(0, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn even_kernel_leans_left() {
        let mut img = ImageF32::new(5, 1);
        img.set(2, 0, 1.0);
        // taps [a, b] with origin 0: out(x) = a*src(x) + b*src(x+1)
        let k = Kernel1D::new(vec![1.0, 2.0]);
        assert_eq!(k.origin(), 0);
        let out = convolve_separable(&img, &k, Border::Zero, Device::Cpu);
        // vertical pass on a single row keeps only the origin tap
        assert_eq!(out.get(1, 0), 2.0);
        assert_eq!(out.get(2, 0), 1.0);
        assert_eq!(out.get(3, 0), 0.0);
    }
}
