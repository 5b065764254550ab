use super::timing::TimingBreakdown;
use crate::depth::QuantizedDepth;
use crate::image::ImageF32;
use crate::multiplane::{MultiplaneParams, Scheme};
use crate::stack::TargetStack;
use serde::{Deserialize, Serialize};

/// Statistics for a single focal plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneReport {
    pub plane_index: usize,
    /// Pixels whose quantized depth selects this plane.
    pub coverage_px: usize,
    pub coverage_fraction: f32,
    /// Mean of the in-focus target over the whole image.
    pub sharp_mean: f32,
    /// Mean of the final (defocused, scaled) target over the whole image.
    pub target_mean: f32,
    pub target_max: f32,
    /// Sigma used when plane `j` bleeds into this plane, indexed by `j`.
    pub defocus_sigmas: Vec<f32>,
    /// Signed per-plane sigma offsets relative to this plane.
    pub sigma_offsets: Vec<f32>,
}

/// Construction summary of a target stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub width: usize,
    pub height: usize,
    pub number_of_planes: usize,
    pub scheme: Scheme,
    pub multiplier: f32,
    pub planes: Vec<PlaneReport>,
    pub timing: TimingBreakdown,
}

fn mean(img: &ImageF32) -> f32 {
    (img.sum() / img.len().max(1) as f64) as f32
}

impl TargetReport {
    pub fn from_stacks(
        depth: &QuantizedDepth,
        sharp: &TargetStack,
        targets: &TargetStack,
        params: &MultiplaneParams,
        timing: TimingBreakdown,
    ) -> Self {
        let (width, height) = depth.dims();
        let n = depth.planes();
        let total = (width * height).max(1) as f32;
        let blur = params.blur();
        let planes = sharp
            .iter()
            .zip(targets.iter())
            .enumerate()
            .map(|(i, (s, t))| {
                let coverage_px = depth.coverage(i);
                PlaneReport {
                    plane_index: i,
                    coverage_px,
                    coverage_fraction: coverage_px as f32 / total,
                    sharp_mean: mean(s),
                    target_mean: mean(t),
                    target_max: t.data.iter().copied().fold(f32::NEG_INFINITY, f32::max),
                    defocus_sigmas: (0..n).map(|j| blur.sigma(i, j, n)).collect(),
                    sigma_offsets: blur.sigma_offsets(i, n),
                }
            })
            .collect();
        Self {
            width,
            height,
            number_of_planes: n,
            scheme: params.scheme,
            multiplier: params.multiplier,
            planes,
            timing,
        }
    }
}
