use crate::error::{RrtError, RrtResult};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Configuration shared by all planner variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig<F: Float> {
    /// Step size: distance from the nearest node to every new configuration.
    pub epsilon: F,
    /// Iteration budget. Reaching it without a solution is a normal outcome.
    pub limit: usize,
    /// Number of samples drawn per iteration by the multi-sample variant.
    pub samples_per_iteration: usize,
    /// Also reject edges whose straight segment crosses an obstacle.
    pub check_edges: bool,
    /// Tag passed to the edge observer for the (forward) tree.
    pub forward_tag: String,
    /// Tag passed to the edge observer for the backward tree of the connect variant.
    pub backward_tag: String,
}

impl<F: Float> Default for PlannerConfig<F> {
    fn default() -> Self {
        Self {
            epsilon: F::one(),
            limit: 5000,
            samples_per_iteration: 3,
            check_edges: false,
            forward_tag: "red".to_string(),
            backward_tag: "green".to_string(),
        }
    }
}

impl<F: Float> PlannerConfig<F> {
    pub fn new(epsilon: F, limit: usize) -> Self {
        Self {
            epsilon,
            limit,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> RrtResult<()> {
        if !(self.epsilon.is_finite() && self.epsilon > F::zero()) {
            return Err(RrtError::InvalidArgument(format!(
                "epsilon ({}) must be finite and > 0",
                self.epsilon.to_f64().unwrap_or(f64::NAN)
            )));
        }
        if self.samples_per_iteration == 0 {
            return Err(RrtError::InvalidArgument(
                "samples_per_iteration must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
