use crate::geometry::Point;
use num_traits::Float;

/// Receives every edge added to a tree during growth, e.g. for rendering.
///
/// Planning never depends on whether an observer is attached.
pub trait EdgeObserver<F: Float> {
    /// Called with the endpoints of a new edge and the tag of the tree it was grown in.
    fn edge_added(&mut self, from: &Point<F>, to: &Point<F>, tag: &str);
}

impl<F: Float, T> EdgeObserver<F> for T
where
    T: FnMut(&Point<F>, &Point<F>, &str),
{
    fn edge_added(&mut self, from: &Point<F>, to: &Point<F>, tag: &str) {
        self(from, to, tag)
    }
}
