use crate::error::RrtResult;
use crate::geometry::Point;
use crate::rrt::rrt::Planner;
use crate::rrt::tree::{Forest, NodeId, TreeId};
use log::debug;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use std::fmt::Debug;

/// Outcome of a bidirectional planning run.
pub struct ConnectResult<F: Float> {
    /// All nodes of both trees.
    pub forest: Forest<F>,
    /// The tree rooted at the start configuration.
    pub forward: TreeId,
    /// The tree rooted at the goal configuration.
    pub backward: TreeId,
    /// The former backward root, reachable from the forward root once the
    /// trees are connected.
    pub goal: Option<NodeId>,
}

impl<F: Float> ConnectResult<F> {
    pub fn solved(&self) -> bool {
        self.goal.is_some()
    }

    /// Combined size of both trees.
    pub fn node_count(&self) -> usize {
        self.forest.tree_size(self.forward) + self.forest.tree_size(self.backward)
    }

    /// Returns the path from the start to the goal, if the trees were connected.
    pub fn path(&self) -> RrtResult<Option<Vec<Point<F>>>> {
        self.goal.map(|goal| self.forest.path(goal)).transpose()
    }

    /// Returns the length of the path from the start to the goal, if the trees were connected.
    pub fn cost(&self) -> RrtResult<Option<F>> {
        self.goal
            .map(|goal| self.forest.traceback(goal).map(|(_, cost)| cost))
            .transpose()
    }
}

impl<F: Float + SampleUniform + Debug + 'static> Planner<F> {
    /// RRT-connect: grows one tree from the start and one from the goal and
    /// merges them as soon as a pair of nodes is closer than `epsilon`.
    ///
    /// Each iteration extends the forward tree, then the backward tree, each
    /// towards its own uniform sample, then scans all (forward, backward)
    /// pairs in discovery order. On the first close pair the backward tree is
    /// grafted under the forward node (see [`Forest::graft`]).
    pub fn plan_connect(&mut self, start: &Point<F>, goal: &Point<F>) -> RrtResult<ConnectResult<F>> {
        self.check_endpoints(start, goal)?;
        debug!(
            "RRT-connect: epsilon={:?}, limit={}",
            self.config().epsilon,
            self.config().limit
        );

        let mut forest = Forest::new();
        let forward = forest.plant(start.clone());
        let backward = forest.plant(goal.clone());
        let goal_node = forest.root(backward);
        let forward_tag = self.config().forward_tag.clone();
        let backward_tag = self.config().backward_tag.clone();

        for iteration in 0..self.config().limit {
            // Grow both forward and backward by one.
            for (tree, tag) in [(forward, &forward_tag), (backward, &backward_tag)] {
                let sample = self.sample();
                self.extend(&mut forest, tree, &sample, tag)?;
            }

            if let Some((f_node, b_node)) = self.find_connection(&forest, forward, backward)? {
                forest.graft(f_node, b_node)?;
                debug!(
                    "RRT-connect: trees connected after {} iterations at {:?} -> {:?}, {} + {} nodes",
                    iteration + 1,
                    f_node,
                    b_node,
                    forest.tree_size(forward),
                    forest.tree_size(backward)
                );
                return Ok(ConnectResult {
                    forest,
                    forward,
                    backward,
                    goal: Some(goal_node),
                });
            }
        }

        debug!(
            "RRT-connect: no connection within {} iterations, {} + {} nodes",
            self.config().limit,
            forest.tree_size(forward),
            forest.tree_size(backward)
        );
        Ok(ConnectResult {
            forest,
            forward,
            backward,
            goal: None,
        })
    }

    /// First (forward, backward) pair closer than `epsilon`, forward nodes in
    /// the outer loop, both in discovery order.
    fn find_connection(
        &self,
        forest: &Forest<F>,
        forward: TreeId,
        backward: TreeId,
    ) -> RrtResult<Option<(NodeId, NodeId)>> {
        let epsilon = self.config().epsilon;
        for &f_node in forest.members(forward) {
            let f_point = forest.node(f_node).data();
            for &b_node in forest.members(backward) {
                let b_point = forest.node(b_node).data();
                if !(b_point.distance(f_point)? < epsilon) {
                    continue;
                }
                if self.config().check_edges
                    && !self.validity_checker().is_edge_valid(f_point, b_point)?
                {
                    continue;
                }
                return Ok(Some((f_node, b_node)));
            }
        }
        Ok(None)
    }
}
