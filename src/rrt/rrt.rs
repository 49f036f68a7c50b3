use crate::error::{RrtError, RrtResult};
use crate::geometry::{Point, Space};
use crate::rrt::config::PlannerConfig;
use crate::rrt::neighbors::nearest;
use crate::rrt::observer::EdgeObserver;
use crate::rrt::tree::{Forest, NodeId, TreeId};
use crate::rrt::validity_checker::{BoxValidityChecker, ValidityChecker};
use log::{debug, trace};
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use std::fmt::Debug;

/// Moves exactly `step` from `q_near` along the straight line towards `q_sample`.
///
/// Fails with `DegenerateDirection` if both points coincide, or if `step` is
/// too small to move `q_near` at its floating-point magnitude.
pub fn project_toward<F: Float>(q_near: &Point<F>, q_sample: &Point<F>, step: F) -> RrtResult<Point<F>> {
    let direction = q_sample.try_sub(q_near)?;
    let length = direction.norm();
    if length == F::zero() || !length.is_finite() {
        return Err(RrtError::DegenerateDirection);
    }
    let projected = q_near.try_add(&(direction / length * step))?;
    if &projected == q_near {
        return Err(RrtError::DegenerateDirection);
    }
    Ok(projected)
}

/// Outcome of a single-tree planning run.
pub struct PlanResult<F: Float> {
    /// All nodes grown during the run.
    pub forest: Forest<F>,
    /// The tree rooted at the start configuration.
    pub tree: TreeId,
    /// The goal-snap node, if the goal was reached within the iteration limit.
    pub goal: Option<NodeId>,
}

impl<F: Float> PlanResult<F> {
    pub fn solved(&self) -> bool {
        self.goal.is_some()
    }

    pub fn node_count(&self) -> usize {
        self.forest.tree_size(self.tree)
    }

    /// Returns the path from the start to the goal, if a solution was found.
    pub fn path(&self) -> RrtResult<Option<Vec<Point<F>>>> {
        self.goal.map(|goal| self.forest.path(goal)).transpose()
    }

    /// Returns the length of the path from the start to the goal, if a solution was found.
    pub fn cost(&self) -> RrtResult<Option<F>> {
        self.goal
            .map(|goal| self.forest.traceback(goal).map(|(_, cost)| cost))
            .transpose()
    }
}

/// How the single-tree variants pick the point to grow towards.
#[derive(Clone, Copy, Debug)]
enum Sampling {
    /// One uniform sample per iteration.
    Uniform,
    /// The sample closest to the goal out of `n` uniform samples.
    BestOf(usize),
}

/// A Rapidly-exploring Random Tree (RRT) planner.
///
/// One planner holds the problem definition (domain, validity checker),
/// the configuration and the sampler. Every `plan_*` call grows fresh trees;
/// consecutive calls continue the same random stream.
pub struct Planner<F: Float> {
    domain: Space<F>,
    validity_checker: Box<dyn ValidityChecker<F>>,
    config: PlannerConfig<F>,
    rng: ChaChaRng,
    observer: Option<Box<dyn EdgeObserver<F>>>,
}

impl<F: Float + SampleUniform + Debug + 'static> Planner<F> {
    /// Constructs a new planner.
    ///
    /// Parameters:
    /// - `domain`: The configuration space samples are drawn from.
    /// - `obstacles`: Forbidden boxes, each with the same axes as `domain`.
    /// - `config`: Step size, iteration budget and variant parameters.
    ///
    /// The sampler is seeded from entropy; use [`Planner::with_seed`] for
    /// reproducible runs.
    pub fn new(domain: Space<F>, obstacles: Vec<Space<F>>, config: PlannerConfig<F>) -> RrtResult<Self> {
        config.validate()?;
        for obstacle in &obstacles {
            if !obstacle.axes().eq(domain.axes()) {
                return Err(RrtError::dimension_mismatch(domain.axes(), obstacle.axes()));
            }
        }
        Ok(Self {
            validity_checker: Box::new(BoxValidityChecker::new(domain.clone(), obstacles)),
            domain,
            config,
            rng: ChaChaRng::from_entropy(),
            observer: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaChaRng::seed_from_u64(seed);
        self
    }

    /// Replaces the default domain/obstacle validity checker.
    pub fn with_validity_checker(mut self, validity_checker: Box<dyn ValidityChecker<F>>) -> Self {
        self.validity_checker = validity_checker;
        self
    }

    pub fn with_observer<O: EdgeObserver<F> + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn domain(&self) -> &Space<F> {
        &self.domain
    }

    pub fn config(&self) -> &PlannerConfig<F> {
        &self.config
    }

    /// Basic RRT: grows towards one uniform sample per iteration.
    pub fn plan_basic(&mut self, start: &Point<F>, goal: &Point<F>) -> RrtResult<PlanResult<F>> {
        self.grow_single_tree(start, goal, Sampling::Uniform)
    }

    /// Goal-biased RRT: each iteration draws `samples_per_iteration` samples and
    /// grows towards the one closest to the goal.
    pub fn plan_multi(&mut self, start: &Point<F>, goal: &Point<F>) -> RrtResult<PlanResult<F>> {
        let n = self.config.samples_per_iteration;
        self.grow_single_tree(start, goal, Sampling::BestOf(n))
    }

    /// Fails with `DimensionMismatch` unless start, goal and domain share one axis set.
    pub(crate) fn check_endpoints(&self, start: &Point<F>, goal: &Point<F>) -> RrtResult<()> {
        start.check_axes(goal)?;
        self.domain.check_axes(start)
    }

    fn grow_single_tree(
        &mut self,
        start: &Point<F>,
        goal: &Point<F>,
        sampling: Sampling,
    ) -> RrtResult<PlanResult<F>> {
        self.check_endpoints(start, goal)?;
        debug!(
            "RRT ({:?}): epsilon={:?}, limit={}",
            sampling, self.config.epsilon, self.config.limit
        );

        let mut forest = Forest::new();
        let tree = forest.plant(start.clone());
        let tag = self.config.forward_tag.clone();

        for iteration in 0..self.config.limit {
            let sample = match sampling {
                Sampling::Uniform => self.domain.sample(&mut self.rng),
                Sampling::BestOf(n) => {
                    let samples = self.domain.sample_n(n, &mut self.rng)?;
                    nearest(goal, &samples, |p| p)?.clone()
                }
            };

            let new_node = match self.extend(&mut forest, tree, &sample, &tag)? {
                Some(node) => node,
                None => continue,
            };

            if let Some(goal_node) = self.reach_goal(&mut forest, new_node, goal)? {
                debug!(
                    "RRT ({:?}): goal reached after {} iterations, {} nodes, cost {:?}",
                    sampling,
                    iteration + 1,
                    forest.tree_size(tree),
                    forest.node(goal_node).cost()
                );
                return Ok(PlanResult {
                    forest,
                    tree,
                    goal: Some(goal_node),
                });
            }
        }

        debug!(
            "RRT ({:?}): no solution within {} iterations, {} nodes",
            sampling,
            self.config.limit,
            forest.tree_size(tree)
        );
        Ok(PlanResult {
            forest,
            tree,
            goal: None,
        })
    }

    /// Expands `tree` by one step towards `sample`.
    ///
    /// Each step consists of the following:
    /// 1. Find the nearest node in the tree to the sample.
    /// 2. Project a new configuration `epsilon` away from it towards the sample.
    /// 3. Add the new configuration as a child of the nearest node if it is valid.
    ///
    /// Returns the new node, or `None` if nothing was added. A sample that
    /// coincides with its nearest node is skipped.
    pub(crate) fn extend(
        &mut self,
        forest: &mut Forest<F>,
        tree: TreeId,
        sample: &Point<F>,
        tag: &str,
    ) -> RrtResult<Option<NodeId>> {
        let nodes: &Forest<F> = forest;
        let nearest_id = *nearest(sample, nodes.members(tree), |id| nodes.node(*id).data())?;
        let nearest_node = forest.node(nearest_id);

        let new_state = match project_toward(nearest_node.data(), sample, self.config.epsilon) {
            Ok(state) => state,
            Err(RrtError::DegenerateDirection) => {
                trace!("sample coincides with node {:?}, skipping", nearest_id);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // If the new point or edge is invalid, return.
        if !self.validity_checker.is_state_valid(&new_state)? {
            return Ok(None);
        }
        if self.config.check_edges
            && !self
                .validity_checker
                .is_edge_valid(nearest_node.data(), &new_state)?
        {
            return Ok(None);
        }

        let cost = nearest_node.cost() + self.config.epsilon;
        let new_id = forest.add_child(nearest_id, new_state, cost);
        trace!("added node {:?} under {:?} (cost {:?})", new_id, nearest_id, cost);

        if let Some(observer) = self.observer.as_mut() {
            observer.edge_added(forest.node(nearest_id).data(), forest.node(new_id).data(), tag);
        }
        Ok(Some(new_id))
    }

    /// Adds the goal-snap node under `node` if the goal is strictly closer than `epsilon`.
    fn reach_goal(
        &self,
        forest: &mut Forest<F>,
        node: NodeId,
        goal: &Point<F>,
    ) -> RrtResult<Option<NodeId>> {
        let last = forest.node(node);
        let distance = goal.distance(last.data())?;
        if !(distance < self.config.epsilon) {
            return Ok(None);
        }
        if self.config.check_edges && !self.validity_checker.is_edge_valid(last.data(), goal)? {
            return Ok(None);
        }
        let cost = last.cost() + distance;
        Ok(Some(forest.add_child(node, goal.clone(), cost)))
    }

    pub(crate) fn sample(&mut self) -> Point<F> {
        self.domain.sample(&mut self.rng)
    }

    pub(crate) fn validity_checker(&self) -> &dyn ValidityChecker<F> {
        self.validity_checker.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn xy(x: f64, y: f64) -> Point<f64> {
        Point::new([("x", x), ("y", y)]).unwrap()
    }

    fn open_planner(epsilon: f64, limit: usize) -> Planner<f64> {
        let domain = Space::new([("x", (0.0, 10.0)), ("y", (0.0, 10.0))]).unwrap();
        Planner::new(domain, Vec::new(), PlannerConfig::new(epsilon, limit))
            .unwrap()
            .with_seed(42)
    }

    /// Every non-root node's cost is its parent's cost plus the edge length.
    fn assert_costs_consistent(forest: &Forest<f64>, tree: TreeId) {
        for &id in forest.members(tree) {
            let node = forest.node(id);
            match node.parent() {
                None => assert_eq!(node.cost(), 0.0),
                Some(parent) => {
                    let parent = forest.node(parent);
                    let edge = parent.data().distance(node.data()).unwrap();
                    assert!((node.cost() - (parent.cost() + edge)).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_project_toward_distance() {
        let near = xy(1.0, 1.0);
        for target in [xy(4.0, 5.0), xy(1.0, 1.1), xy(-3.0, 0.0)] {
            let projected = project_toward(&near, &target, 0.7).unwrap();
            assert!((near.distance(&projected).unwrap() - 0.7).abs() < 1e-12);
        }
        let projected = project_toward(&near, &xy(4.0, 5.0), 1.0).unwrap();
        assert!((projected.get("x").unwrap() - 1.6).abs() < 1e-12);
        assert!((projected.get("y").unwrap() - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_project_toward_degenerate() {
        let p = xy(2.0, 3.0);
        assert_eq!(project_toward(&p, &p.clone(), 1.0), Err(RrtError::DegenerateDirection));
    }

    #[test]
    fn test_project_toward_large_coordinates() {
        let near = xy(-1e200, -1e200);
        let projected = project_toward(&near, &xy(1e200, 1e200), 1e199).unwrap();
        let moved = near.distance(&projected).unwrap();
        assert!((moved / 1e199 - 1.0).abs() < 1e-9);
        // A unit step vanishes next to coordinates of magnitude 1e200.
        assert_eq!(
            project_toward(&near, &xy(1e200, 1e200), 1.0),
            Err(RrtError::DegenerateDirection)
        );
    }

    #[test]
    fn test_large_domain_keeps_cost_invariant() {
        let domain = Space::new([("x", (-1e200, 1e200)), ("y", (-1e200, 1e200))]).unwrap();
        let mut planner = Planner::new(domain, Vec::new(), PlannerConfig::new(1e199, 300))
            .unwrap()
            .with_seed(8);
        let result = planner.plan_basic(&xy(0.0, 0.0), &xy(9e199, 9e199)).unwrap();
        assert!(result.node_count() > 1);
        for &id in result.forest.members(result.tree) {
            let node = result.forest.node(id);
            if let Some(parent) = node.parent() {
                let parent = result.forest.node(parent);
                let edge = parent.data().distance(node.data()).unwrap();
                assert!(edge > 0.0);
                assert!(((parent.cost() + edge) / node.cost() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_planner_rejects_bad_config() {
        let domain = Space::new([("x", (0.0, 1.0))]).unwrap();
        assert!(matches!(
            Planner::new(domain, Vec::new(), PlannerConfig::new(0.0, 10)),
            Err(RrtError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_planner_rejects_mismatched_obstacle() {
        let domain = Space::new([("x", (0.0, 1.0)), ("y", (0.0, 1.0))]).unwrap();
        let obstacle = Space::new([("x", (0.0, 1.0))]).unwrap();
        assert!(matches!(
            Planner::new(domain, vec![obstacle], PlannerConfig::new(0.1, 10)),
            Err(RrtError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_basic_costs_and_goal_snap() {
        let mut planner = open_planner(1.0, 10_000);
        let goal = xy(10.0, 10.0);
        let result = planner.plan_basic(&xy(0.0, 0.0), &goal).unwrap();
        let goal_node = result.goal.expect("open space should be solved");

        assert_costs_consistent(&result.forest, result.tree);
        let node = result.forest.node(goal_node);
        assert_eq!(node.data(), &goal);
        let parent = result.forest.node(node.parent().unwrap());
        assert!(parent.data().distance(&goal).unwrap() < 1.0);

        // Every ordinary edge is exactly epsilon long.
        for &id in result.forest.members(result.tree) {
            if id == goal_node {
                continue;
            }
            if let Some(p) = result.forest.node(id).parent() {
                let edge = result.forest.node(p).data().distance(result.forest.node(id).data());
                assert!((edge.unwrap() - 1.0).abs() < 1e-9);
            }
        }

        let (_, traced) = result.forest.traceback(goal_node).unwrap();
        assert!((traced - node.cost()).abs() < 1e-9);
        assert_eq!(result.cost().unwrap(), Some(traced));
    }

    #[test]
    fn test_multi_solves_open_space() {
        let mut planner = open_planner(0.5, 10_000);
        let result = planner.plan_multi(&xy(1.0, 1.0), &xy(9.0, 9.0)).unwrap();
        assert!(result.solved());
        assert_costs_consistent(&result.forest, result.tree);
        let path = result.path().unwrap().unwrap();
        assert_eq!(path.first(), Some(&xy(1.0, 1.0)));
        assert_eq!(path.last(), Some(&xy(9.0, 9.0)));
    }

    #[test]
    fn test_multi_grows_towards_goal() {
        // With many samples per iteration the chosen one lies close to the goal,
        // so the very first edge from the start points along the diagonal.
        let edges = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&edges);
        let domain = Space::new([("x", (0.0, 10.0)), ("y", (0.0, 10.0))]).unwrap();
        let config = PlannerConfig {
            samples_per_iteration: 500,
            ..PlannerConfig::new(1.0, 1)
        };
        let mut planner = Planner::new(domain, Vec::new(), config)
            .unwrap()
            .with_seed(31)
            .with_observer(move |from: &Point<f64>, to: &Point<f64>, _: &str| {
                sink.borrow_mut().push((from.clone(), to.clone()));
            });
        let start = xy(0.0, 0.0);
        planner.plan_multi(&start, &xy(10.0, 10.0)).unwrap();

        let edges = edges.borrow();
        assert_eq!(edges.len(), 1);
        let (from, to) = &edges[0];
        assert_eq!(from, &start);
        let step = to.try_sub(from).unwrap();
        let cos = (step.get("x").unwrap() + step.get("y").unwrap()) / (2f64.sqrt() * step.norm());
        // Within ten degrees of the direction to the goal.
        assert!(cos > 10f64.to_radians().cos());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut planner = open_planner(0.5, 2000);
            let result = planner.plan_basic(&xy(0.0, 0.0), &xy(10.0, 10.0)).unwrap();
            (result.node_count(), result.cost().unwrap())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_limit_zero_returns_root_only() {
        let mut planner = open_planner(1.0, 0);
        let result = planner.plan_basic(&xy(0.0, 0.0), &xy(10.0, 10.0)).unwrap();
        assert!(!result.solved());
        assert_eq!(result.node_count(), 1);
        assert_eq!(result.path().unwrap(), None);
    }

    #[test]
    fn test_observer_sees_every_edge() {
        let edges = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&edges);
        let mut planner = open_planner(1.0, 200).with_observer(
            move |from: &Point<f64>, to: &Point<f64>, tag: &str| {
                sink.borrow_mut().push((from.clone(), to.clone(), tag.to_string()));
            },
        );
        let result = planner.plan_basic(&xy(0.0, 0.0), &xy(10.0, 10.0)).unwrap();

        let edges = edges.borrow();
        // The goal-snap edge is not reported.
        let expected = result.node_count() - 1 - usize::from(result.solved());
        assert_eq!(edges.len(), expected);
        assert!(edges.iter().all(|(_, _, tag)| tag == "red"));
    }

    #[test]
    fn test_edge_checking_blocks_thin_wall() {
        // A wall thinner than epsilon: points never land inside it, but edges cross it.
        let domain = Space::new([("x", (0.0, 10.0)), ("y", (0.0, 10.0))]).unwrap();
        let wall = Space::new([("x", (4.95, 5.05)), ("y", (0.0, 10.0))]).unwrap();
        let config = PlannerConfig {
            check_edges: true,
            ..PlannerConfig::new(1.0, 3000)
        };
        let mut planner = Planner::new(domain, vec![wall], config).unwrap().with_seed(3);
        let result = planner.plan_basic(&xy(1.0, 5.0), &xy(9.0, 5.0)).unwrap();
        assert!(!result.solved());
        for &id in result.forest.members(result.tree) {
            assert!(result.forest.node(id).data().get("x").unwrap() < 4.95);
        }
    }
}
