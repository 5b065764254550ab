//! Parameter types configuring target synthesis and the loss.
//!
//! Defaults reproduce the reference settings: four planes, a 10 px defocus
//! kernel at a quarter of the full sigma, weights `[1.0, 2.1, 0.6, 0.0]`, the
//! `defocus` scheme and `mean` reduction.

use crate::error::{MultiplaneError, Result};
use crate::loss::{LossWeights, Reduction};
use crate::targets::BlurParams;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether defocus bleed is simulated on top of the sharp targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Defocus,
    /// Sharp, mask-restricted targets only. Any unrecognised scheme name
    /// lands here.
    #[serde(other)]
    Naive,
}

impl FromStr for Scheme {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("defocus") {
            Scheme::Defocus
        } else {
            Scheme::Naive
        })
    }
}

/// Construction-time parameters of a [`MultiplaneLoss`](super::MultiplaneLoss).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplaneParams {
    /// Number of focal planes (>= 1).
    pub number_of_planes: usize,
    /// Defocus kernel extent in pixels.
    #[serde(alias = "defocus_blur_size")]
    pub target_blur_size: usize,
    /// Fraction in `[0, 1]` of the full inter-plane sigma.
    pub blur_ratio: f32,
    /// Scale applied to the whole target stack after synthesis.
    pub multiplier: f32,
    /// Loss term weights.
    pub weights: LossWeights,
    pub scheme: Scheme,
    pub reduction: Reduction,
}

impl Default for MultiplaneParams {
    fn default() -> Self {
        let blur = BlurParams::default();
        Self {
            number_of_planes: 4,
            target_blur_size: blur.target_blur_size,
            blur_ratio: blur.blur_ratio,
            multiplier: 1.0,
            weights: LossWeights::default(),
            scheme: Scheme::default(),
            reduction: Reduction::default(),
        }
    }
}

impl MultiplaneParams {
    pub fn blur(&self) -> BlurParams {
        BlurParams {
            target_blur_size: self.target_blur_size,
            blur_ratio: self.blur_ratio,
        }
    }

    /// Reject parameter combinations that cannot produce a target stack.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_planes == 0 {
            return Err(MultiplaneError::InvalidPlaneCount(0));
        }
        if !self.multiplier.is_finite() {
            return Err(MultiplaneError::InvalidParameter {
                name: "multiplier",
                value: self.multiplier,
            });
        }
        self.weights.validate()?;
        if self.scheme == Scheme::Defocus {
            self.blur().validate()?;
        }
        Ok(())
    }
}
