pub mod config;
pub mod neighbors;
pub mod observer;
pub mod rrt;
pub mod rrt_connect;
pub mod tree;
pub mod validity_checker;

pub use config::PlannerConfig;
pub use neighbors::{nearest, within_radius};
pub use observer::EdgeObserver;
pub use rrt::{project_toward, PlanResult, Planner};
pub use rrt_connect::ConnectResult;
pub use tree::{Forest, NodeId, TreeId, TreeNode};
pub use validity_checker::{is_valid, BoxValidityChecker, ValidityChecker};

use crate::error::RrtResult;
use crate::geometry::{Point, Space};
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use std::fmt::Debug;

/// Runs basic RRT with an entropy-seeded sampler and default options.
pub fn plan_basic<F: Float + SampleUniform + Debug + 'static>(
    start: &Point<F>,
    goal: &Point<F>,
    domain: Space<F>,
    epsilon: F,
    limit: usize,
    obstacles: Vec<Space<F>>,
) -> RrtResult<PlanResult<F>> {
    Planner::new(domain, obstacles, PlannerConfig::new(epsilon, limit))?.plan_basic(start, goal)
}

/// Runs the goal-biased variant, drawing `n` samples per iteration.
pub fn plan_multi<F: Float + SampleUniform + Debug + 'static>(
    start: &Point<F>,
    goal: &Point<F>,
    domain: Space<F>,
    epsilon: F,
    limit: usize,
    obstacles: Vec<Space<F>>,
    n: usize,
) -> RrtResult<PlanResult<F>> {
    let config = PlannerConfig {
        samples_per_iteration: n,
        ..PlannerConfig::new(epsilon, limit)
    };
    Planner::new(domain, obstacles, config)?.plan_multi(start, goal)
}

/// Runs RRT-connect with an entropy-seeded sampler and default options.
pub fn plan_connect<F: Float + SampleUniform + Debug + 'static>(
    start: &Point<F>,
    goal: &Point<F>,
    domain: Space<F>,
    epsilon: F,
    limit: usize,
    obstacles: Vec<Space<F>>,
) -> RrtResult<ConnectResult<F>> {
    Planner::new(domain, obstacles, PlannerConfig::new(epsilon, limit))?.plan_connect(start, goal)
}
