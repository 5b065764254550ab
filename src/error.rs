/// Failures surfaced by target synthesis and loss evaluation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MultiplaneError {
    /// The plane count must be at least one.
    #[error("number of planes must be >= 1, got {0}")]
    InvalidPlaneCount(usize),
    /// Two stacks that must hold the same number of planes do not.
    #[error("stack has {found} planes, expected {expected}")]
    PlaneCountMismatch { expected: usize, found: usize },
    /// A numeric parameter is outside its valid range.
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f32 },
    /// Two inputs that must share a `width × height` grid do not.
    #[error(
        "{what} has shape {}x{}, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// The depth map holds a NaN or infinite sample.
    #[error("depth sample at ({x}, {y}) is not finite")]
    NonFiniteDepth { x: usize, y: usize },
    /// The selected plane does not exist in the stack.
    #[error("plane {plane} out of range for a stack of {planes} planes")]
    PlaneOutOfRange { plane: usize, planes: usize },
    /// Evaluation was requested without a plane selector.
    #[error("a concrete plane index is required")]
    MissingPlane,
    /// The requested operation needs a scalar loss (`mean` or `sum`).
    #[error("{0} requires a `mean` or `sum` reduction")]
    UnsupportedReduction(&'static str),
}

pub type Result<T> = std::result::Result<T, MultiplaneError>;

/// Check that `found` covers the same grid as `expected`.
pub(crate) fn ensure_shape(
    what: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(MultiplaneError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}
