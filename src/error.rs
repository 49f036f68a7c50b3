//! Error types for the RRT planners.

use std::fmt;

/// Errors raised by geometry primitives and planners.
#[derive(Debug, Clone, PartialEq)]
pub enum RrtError {
    /// Two points (or a point and a space) do not share the same axis set.
    DimensionMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A parameter is out of range (zero samples, empty candidate set, ...).
    InvalidArgument(String),
    /// Projection towards a point identical to the origin of the projection.
    DegenerateDirection,
}

impl RrtError {
    pub(crate) fn dimension_mismatch<'a, A, B>(expected: A, found: B) -> Self
    where
        A: IntoIterator<Item = &'a String>,
        B: IntoIterator<Item = &'a String>,
    {
        RrtError::DimensionMismatch {
            expected: expected.into_iter().cloned().collect(),
            found: found.into_iter().cloned().collect(),
        }
    }
}

impl fmt::Display for RrtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RrtError::DimensionMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected axes [{}] ({}), found [{}] ({})",
                expected.join(", "),
                expected.len(),
                found.join(", "),
                found.len()
            ),
            RrtError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            RrtError::DegenerateDirection => {
                write!(f, "Degenerate direction: cannot project towards an identical point")
            }
        }
    }
}

impl std::error::Error for RrtError {}

/// Result type alias for planner operations
pub type RrtResult<T> = Result<T, RrtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RrtError::InvalidArgument("n (0) must be > 0".to_string());
        assert_eq!(format!("{}", err), "Invalid argument: n (0) must be > 0");
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let xy = vec!["x".to_string(), "y".to_string()];
        let xyz = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let err = RrtError::dimension_mismatch(&xy, &xyz);
        assert_eq!(
            format!("{}", err),
            "Dimension mismatch: expected axes [x, y] (2), found [x, y, z] (3)"
        );
    }
}
