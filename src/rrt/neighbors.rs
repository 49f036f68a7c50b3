use crate::error::{RrtError, RrtResult};
use crate::geometry::Point;
use num_traits::Float;

/// Gets the candidate nearest to `reference` by exhaustive linear scan.
///
/// `project` maps each candidate to the point used for the distance computation
/// (the identity for a slice of points, the node's point for tree nodes).
/// Ties are broken by first occurrence in `candidates`.
///
/// Fails with `InvalidArgument` if `candidates` is empty and with
/// `DimensionMismatch` if a projected point does not share the reference's axes.
pub fn nearest<'c, 'p, F, T, P>(
    reference: &Point<F>,
    candidates: &'c [T],
    project: P,
) -> RrtResult<&'c T>
where
    F: Float + 'p,
    P: Fn(&'c T) -> &'p Point<F>,
{
    if candidates.is_empty() {
        return Err(RrtError::InvalidArgument(
            "nearest neighbor search over an empty candidate set".to_string(),
        ));
    }

    let mut best: Option<(&'c T, F)> = None;
    for candidate in candidates {
        let distance = reference.distance(project(candidate))?;
        match best {
            Some((_, best_distance)) if !(distance < best_distance) => {}
            _ => best = Some((candidate, distance)),
        }
    }
    // `candidates` is non-empty, so `best` is always set here.
    best.map(|(candidate, _)| candidate).ok_or_else(|| {
        RrtError::InvalidArgument("no comparable candidate found".to_string())
    })
}

/// Gets all candidates strictly closer than `radius` to `reference`, in their
/// input order.
pub fn within_radius<'c, 'p, F, T, P>(
    reference: &Point<F>,
    candidates: &'c [T],
    radius: F,
    project: P,
) -> RrtResult<Vec<&'c T>>
where
    F: Float + 'p,
    P: Fn(&'c T) -> &'p Point<F>,
{
    let mut within = Vec::new();
    for candidate in candidates {
        if reference.distance(project(candidate))? < radius {
            within.push(candidate);
        }
    }
    Ok(within)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(x: f64, y: f64) -> Point<f64> {
        Point::new([("x", x), ("y", y)]).unwrap()
    }

    #[test]
    fn test_nearest_point() {
        let points = vec![xy(5.0, 5.0), xy(1.0, 1.0), xy(-3.0, 0.0)];
        let nearest = nearest(&xy(0.0, 0.0), &points, |p| p).unwrap();
        assert_eq!(*nearest, xy(1.0, 1.0));
    }

    #[test]
    fn test_nearest_is_minimal() {
        let points: Vec<Point<f64>> = (0..20)
            .map(|i| xy((i as f64 * 1.7) % 5.0, (i as f64 * 2.3) % 7.0))
            .collect();
        let reference = xy(2.2, 3.1);
        let found = nearest(&reference, &points, |p| p).unwrap();
        let found_distance = reference.distance(found).unwrap();
        for p in &points {
            assert!(found_distance <= reference.distance(p).unwrap());
        }
    }

    #[test]
    fn test_nearest_tie_breaks_on_first() {
        let points = vec![xy(1.0, 0.0), xy(0.0, 1.0), xy(-1.0, 0.0)];
        let found = nearest(&xy(0.0, 0.0), &points, |p| p).unwrap();
        assert!(std::ptr::eq(found, &points[0]));
    }

    #[test]
    fn test_nearest_with_projection() {
        let labelled = vec![("far", xy(9.0, 9.0)), ("near", xy(0.5, 0.0))];
        let found = nearest(&xy(0.0, 0.0), &labelled, |(_, p)| p).unwrap();
        assert_eq!(found.0, "near");
    }

    #[test]
    fn test_nearest_empty_candidates() {
        let points: Vec<Point<f64>> = Vec::new();
        assert!(matches!(
            nearest(&xy(0.0, 0.0), &points, |p| p),
            Err(RrtError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_nearest_dimension_mismatch() {
        let points = vec![Point::new([("x", 0.0), ("y", 0.0), ("z", 0.0)]).unwrap()];
        assert!(matches!(
            nearest(&xy(0.0, 0.0), &points, |p| p),
            Err(RrtError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_within_radius_keeps_order_and_is_strict() {
        let points = vec![xy(0.0, 2.0), xy(0.5, 0.0), xy(1.0, 0.0), xy(0.0, -0.9)];
        let found = within_radius(&xy(0.0, 0.0), &points, 1.0, |p| p).unwrap();
        assert_eq!(found, vec![&points[1], &points[3]]);
    }
}
