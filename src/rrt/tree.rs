use crate::error::{RrtError, RrtResult};
use crate::geometry::Point;
use num_traits::Float;
use std::collections::VecDeque;

/// Index of a node inside a [`Forest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of a tree inside a [`Forest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(usize);

/// A node in a search tree.
#[derive(Clone, Debug)]
pub struct TreeNode<F: Float> {
    /// The index of the parent node (None if the node is a root).
    parent: Option<NodeId>,
    /// The indices of the children nodes, in creation order.
    children: Vec<NodeId>,
    /// The configuration this node represents.
    data: Point<F>,
    /// Cost from the root to this node.
    cost: F,
    /// The tree this node was grown in.
    tree: TreeId,
}

impl<F: Float> TreeNode<F> {
    fn new(data: Point<F>, parent: Option<NodeId>, cost: F, tree: TreeId) -> Self {
        Self {
            parent,
            children: Vec::new(),
            data,
            cost,
            tree,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &Point<F> {
        &self.data
    }

    pub fn cost(&self) -> F {
        self.cost
    }

    pub fn tree(&self) -> TreeId {
        self.tree
    }

    fn add_child(&mut self, child: NodeId) {
        debug_assert!(!self.children.contains(&child));
        self.children.push(child);
    }

    fn remove_child(&mut self, child: NodeId) {
        if let Some(index) = self.children.iter().position(|&x| x == child) {
            self.children.remove(index);
        } else {
            #[cfg(debug_assertions)]
            {
                panic!("The child node {:?} does not exist on this node.", child);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct TreeRecord {
    root: NodeId,
    /// Every node grown in this tree, in discovery order (root first).
    members: Vec<NodeId>,
}

/// Arena holding the nodes of one planning run.
///
/// A run grows one tree (basic, multi) or two (connect). Nodes are never
/// removed; parent and child links are indices into the arena.
#[derive(Clone, Debug)]
pub struct Forest<F: Float> {
    nodes: Vec<TreeNode<F>>,
    trees: Vec<TreeRecord>,
}

impl<F: Float> Default for Forest<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Forest<F> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            trees: Vec::new(),
        }
    }

    /// Starts a new tree rooted at `root` with zero cost.
    pub fn plant(&mut self, root: Point<F>) -> TreeId {
        let tree = TreeId(self.trees.len());
        let root_id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(root, None, F::zero(), tree));
        self.trees.push(TreeRecord {
            root: root_id,
            members: vec![root_id],
        });
        tree
    }

    /// Adds a node as a child of `parent`, in the parent's tree.
    ///
    /// The node is appended to the arena, to the parent's children and to the
    /// tree's member list in one step.
    pub fn add_child(&mut self, parent: NodeId, data: Point<F>, cost: F) -> NodeId {
        let tree = self.nodes[parent.0].tree;
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(data, Some(parent), cost, tree));
        self.nodes[parent.0].add_child(id);
        self.trees[tree.0].members.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<F> {
        &self.nodes[id.0]
    }

    pub fn root(&self, tree: TreeId) -> NodeId {
        self.trees[tree.0].root
    }

    /// Nodes grown in `tree`, in discovery order.
    pub fn members(&self, tree: TreeId) -> &[NodeId] {
        &self.trees[tree.0].members
    }

    pub fn tree_size(&self, tree: TreeId) -> usize {
        self.trees[tree.0].members.len()
    }

    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `node` up to its root.
    ///
    /// Returns the nodes in root-first order together with the sum of the edge
    /// lengths along the way.
    pub fn traceback(&self, node: NodeId) -> RrtResult<(Vec<NodeId>, F)> {
        let mut trace = vec![node];
        let mut cost = F::zero();
        let mut current = node;

        // Reconstruct the path by backtracking up the tree (following the parent pointers).
        while let Some(parent) = self.nodes[current.0].parent {
            cost = cost + self.nodes[current.0].data.distance(&self.nodes[parent.0].data)?;
            trace.push(parent);
            current = parent;
        }

        trace.reverse();
        Ok((trace, cost))
    }

    /// The configurations from the root down to `node`.
    pub fn path(&self, node: NodeId) -> RrtResult<Vec<Point<F>>> {
        let (trace, _) = self.traceback(node)?;
        Ok(trace
            .into_iter()
            .map(|id| self.nodes[id.0].data.clone())
            .collect())
    }

    /// Splices the tree containing `joint` under `anchor`.
    ///
    /// The parent chain from `joint` up to its root is reversed so that it walks
    /// from `joint` towards the old root, then `joint` is hung under `anchor`.
    /// Children lists follow the re-pointed parents, and the cost of every node
    /// below `joint` is recomputed as its parent's cost plus the edge length.
    ///
    /// Tree membership is unchanged: the grafted nodes still count towards the
    /// tree they were grown in.
    ///
    /// Fails with `InvalidArgument` if `anchor` is `joint` or one of its
    /// ancestors, since the splice would close a cycle.
    pub fn graft(&mut self, anchor: NodeId, joint: NodeId) -> RrtResult<()> {
        // Read the whole chain before touching any link: [joint, p1, ..., root].
        let mut chain = vec![joint];
        let mut current = joint;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        if chain.contains(&anchor) {
            return Err(RrtError::InvalidArgument(format!(
                "cannot graft {:?} under {:?}, which lies on its own root path",
                joint, anchor
            )));
        }

        // Reverse from the root end down to the joint.
        for pair in chain.windows(2).rev() {
            let (child, parent) = (pair[0], pair[1]);
            self.nodes[parent.0].remove_child(child);
            self.nodes[parent.0].parent = Some(child);
            self.nodes[child.0].add_child(parent);
        }
        self.nodes[joint.0].parent = Some(anchor);
        self.nodes[anchor.0].add_child(joint);

        self.recompute_costs(joint)
    }

    /// Recomputes the cost of `start` and of every node below it, breadth first.
    fn recompute_costs(&mut self, start: NodeId) -> RrtResult<()> {
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if let Some(parent) = self.nodes[id.0].parent {
                let parent_node = &self.nodes[parent.0];
                let cost = parent_node.cost + parent_node.data.distance(&self.nodes[id.0].data)?;
                self.nodes[id.0].cost = cost;
            }
            queue.extend(self.nodes[id.0].children.iter().copied());
        }
        Ok(())
    }
}
