use crate::error::RrtResult;
use crate::geometry::{Point, Space};
use num_traits::Float;

/// Checks if a state or edge is valid (i.e., not in collision).
pub trait ValidityChecker<F: Float> {
    /// Checks if a state is valid (i.e., inside the domain and outside every obstacle).
    ///
    /// Parameters:
    /// - `state`: The state to check.
    ///
    /// Returns:
    /// Whether the state is valid.
    fn is_state_valid(&self, state: &Point<F>) -> RrtResult<bool>;

    /// Checks if an edge is valid (i.e., does not cross any obstacle).
    ///
    /// Parameters:
    /// - `a`: The start point of the edge.
    /// - `b`: The end point of the edge.
    ///
    /// Returns:
    /// Whether the edge is valid.
    fn is_edge_valid(&self, a: &Point<F>, b: &Point<F>) -> RrtResult<bool>;
}

/// Validity checker for a box-shaped domain with box-shaped obstacles.
#[derive(Clone, Debug)]
pub struct BoxValidityChecker<F: Float> {
    domain: Space<F>,
    obstacles: Vec<Space<F>>,
}

impl<F: Float> BoxValidityChecker<F> {
    pub fn new(domain: Space<F>, obstacles: Vec<Space<F>>) -> Self {
        Self { domain, obstacles }
    }

    pub fn domain(&self) -> &Space<F> {
        &self.domain
    }

    pub fn obstacles(&self) -> &[Space<F>] {
        &self.obstacles
    }
}

impl<F: Float> ValidityChecker<F> for BoxValidityChecker<F> {
    fn is_state_valid(&self, state: &Point<F>) -> RrtResult<bool> {
        is_valid(state, &self.domain, &self.obstacles)
    }

    fn is_edge_valid(&self, a: &Point<F>, b: &Point<F>) -> RrtResult<bool> {
        for obstacle in &self.obstacles {
            if obstacle.intersects_segment(a, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// A point is valid iff it lies inside `domain` and outside every obstacle.
pub fn is_valid<F: Float>(
    point: &Point<F>,
    domain: &Space<F>,
    obstacles: &[Space<F>],
) -> RrtResult<bool> {
    if !domain.within(point)? {
        return Ok(false);
    }
    for obstacle in obstacles {
        if obstacle.within(point)? {
            return Ok(false);
        }
    }
    Ok(true)
}
