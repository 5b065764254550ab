use crate::error::{MultiplaneError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Weights of the direct, masked, correlation and edge terms.
///
/// Serialized as a plain `[direct, masked, correlation, edge]` array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct LossWeights {
    pub direct: f32,
    pub masked: f32,
    pub correlation: f32,
    pub edge: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            direct: 1.0,
            masked: 2.1,
            correlation: 0.6,
            edge: 0.0,
        }
    }
}

impl From<[f32; 4]> for LossWeights {
    fn from(w: [f32; 4]) -> Self {
        Self {
            direct: w[0],
            masked: w[1],
            correlation: w[2],
            edge: w[3],
        }
    }
}

impl From<LossWeights> for [f32; 4] {
    fn from(w: LossWeights) -> Self {
        [w.direct, w.masked, w.correlation, w.edge]
    }
}

impl LossWeights {
    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("weights.direct", self.direct),
            ("weights.masked", self.masked),
            ("weights.correlation", self.correlation),
            ("weights.edge", self.edge),
        ];
        for (name, value) in named {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MultiplaneError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// How per-pixel squared errors are collapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    #[default]
    Mean,
    Sum,
    /// Keep the per-pixel map.
    None,
}

impl FromStr for Reduction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Reduction::Mean),
            "sum" => Ok(Reduction::Sum),
            "none" => Ok(Reduction::None),
            other => Err(format!(
                "Unknown reduction '{other}' (expected mean, sum or none)"
            )),
        }
    }
}
