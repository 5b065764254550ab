use super::params::{LossWeights, Reduction};
use crate::device::Device;
use crate::error::{ensure_shape, MultiplaneError, Result};
use crate::filters::sobel::sobel_magnitude;
use crate::image::ImageF32;

/// A reduced loss: a scalar for `mean`/`sum`, a per-pixel map for `none`.
#[derive(Clone, Debug, PartialEq)]
pub enum LossValue {
    Scalar(f32),
    Map(ImageF32),
}

impl LossValue {
    pub fn scalar(&self) -> Option<f32> {
        match self {
            LossValue::Scalar(v) => Some(*v),
            LossValue::Map(_) => None,
        }
    }

    pub fn map(&self) -> Option<&ImageF32> {
        match self {
            LossValue::Map(m) => Some(m),
            LossValue::Scalar(_) => None,
        }
    }
}

/// The four weighted terms and their sum.
#[derive(Clone, Debug, PartialEq)]
pub struct LossTerms {
    pub direct: LossValue,
    pub masked: LossValue,
    pub correlation: LossValue,
    pub edge: LossValue,
    pub total: LossValue,
}

/// Scores candidate images against a target inside a plane mask.
#[derive(Clone, Copy, Debug, Default)]
pub struct LossEvaluator {
    pub weights: LossWeights,
    pub reduction: Reduction,
    pub device: Device,
}

impl LossEvaluator {
    pub fn new(weights: LossWeights, reduction: Reduction) -> Self {
        Self {
            weights,
            reduction,
            device: Device::default(),
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Weighted sum of the four terms.
    pub fn evaluate(&self, image: &ImageF32, target: &ImageF32, mask: &ImageF32) -> Result<LossValue> {
        Ok(self.evaluate_terms(image, target, mask)?.total)
    }

    /// Every weighted term separately, plus their sum.
    pub fn evaluate_terms(
        &self,
        image: &ImageF32,
        target: &ImageF32,
        mask: &ImageF32,
    ) -> Result<LossTerms> {
        check_shapes(image, target, mask)?;
        let w = &self.weights;

        let direct = self.term(w.direct, image, || {
            image.zip_map(target, |i, t| (i - t) * (i - t))
        });
        let masked = self.term(w.masked, image, || {
            let diff = image.zip_map(target, |i, t| i - t);
            diff.zip_map(mask, |d, m| (d * m) * (d * m))
        });
        let correlation = self.term(w.correlation, image, || {
            image.zip_map(target, |i, t| {
                let e = i * t - t * t;
                e * e
            })
        });
        let edge = self.term(w.edge, image, || {
            let si = sobel_magnitude(image, self.device).mag.mul(mask);
            let st = sobel_magnitude(target, self.device).mag.mul(mask);
            si.zip_map(&st, |a, b| (a - b) * (a - b))
        });

        let total = match self.reduction {
            Reduction::None => {
                let mut acc = ImageF32::new(image.w, image.h);
                for term in [&direct, &masked, &correlation, &edge] {
                    if let LossValue::Map(m) = term {
                        acc.add_assign(m);
                    }
                }
                LossValue::Map(acc)
            }
            Reduction::Mean | Reduction::Sum => {
                let sum: f32 = [&direct, &masked, &correlation, &edge]
                    .iter()
                    .filter_map(|t| t.scalar())
                    .sum();
                LossValue::Scalar(sum)
            }
        };

        Ok(LossTerms {
            direct,
            masked,
            correlation,
            edge,
            total,
        })
    }

    /// Derivative of the scalar loss with respect to `image`.
    ///
    /// Fails with `UnsupportedReduction` for `Reduction::None`, which has no
    /// scalar to differentiate.
    pub fn gradient(&self, image: &ImageF32, target: &ImageF32, mask: &ImageF32) -> Result<ImageF32> {
        check_shapes(image, target, mask)?;
        let scale = match self.reduction {
            Reduction::Mean => 1.0 / image.len().max(1) as f32,
            Reduction::Sum => 1.0,
            Reduction::None => return Err(MultiplaneError::UnsupportedReduction("gradient")),
        };
        let w = self.weights;
        let k = 2.0 * scale;

        let mut grad = ImageF32::new(image.w, image.h);
        for (idx, g) in grad.data.iter_mut().enumerate() {
            let i = image.data[idx];
            let t = target.data[idx];
            let m = mask.data[idx];
            let d = i - t;
            *g = k * (w.direct * d + w.masked * m * m * d + w.correlation * (i * t - t * t) * t);
        }

        if w.edge != 0.0 {
            let field = sobel_magnitude(image, self.device);
            let target_mag = sobel_magnitude(target, self.device).mag;
            let d_mag = ImageF32 {
                w: image.w,
                h: image.h,
                stride: image.w,
                data: field
                    .mag
                    .data
                    .iter()
                    .zip(target_mag.data.iter())
                    .zip(mask.data.iter())
                    .map(|((&si, &st), &m)| k * w.edge * m * m * (si - st))
                    .collect(),
            };
            grad.add_assign(&field.backward(&d_mag));
        }
        Ok(grad)
    }

    /// Weighted, reduced term. Zero weights skip `errors` entirely.
    fn term(&self, weight: f32, like: &ImageF32, errors: impl FnOnce() -> ImageF32) -> LossValue {
        if weight == 0.0 {
            return match self.reduction {
                Reduction::None => LossValue::Map(ImageF32::new(like.w, like.h)),
                _ => LossValue::Scalar(0.0),
            };
        }
        let errors = errors();
        match self.reduction {
            Reduction::None => LossValue::Map(errors.scaled(weight)),
            Reduction::Sum => LossValue::Scalar(weight * errors.sum() as f32),
            Reduction::Mean => {
                let n = errors.len().max(1) as f64;
                LossValue::Scalar(weight * (errors.sum() / n) as f32)
            }
        }
    }
}

fn check_shapes(image: &ImageF32, target: &ImageF32, mask: &ImageF32) -> Result<()> {
    ensure_shape("target", image.dims(), target.dims())?;
    ensure_shape("mask", image.dims(), mask.dims())
}
