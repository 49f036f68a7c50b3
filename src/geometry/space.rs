use crate::error::{RrtError, RrtResult};
use crate::geometry::Point;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An axis-aligned box keyed by axis name.
///
/// Used both as the sampling domain of a planner and as an obstacle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, (F, F)>",
    into = "BTreeMap<String, (F, F)>",
    bound(
        serialize = "F: Float + Serialize",
        deserialize = "F: Float + Deserialize<'de>"
    )
)]
pub struct Space<F: Float> {
    bounds: BTreeMap<String, (F, F)>,
}

impl<F: Float> Space<F> {
    /// Constructs a space from `(axis, (lower, upper))` pairs.
    ///
    /// Fails with `InvalidArgument` if no axis is given, or if any bound is not
    /// finite, has `lower > upper`, or spans a width that overflows.
    pub fn new<K, I>(bounds: I) -> RrtResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, (F, F))>,
    {
        let bounds: BTreeMap<String, (F, F)> =
            bounds.into_iter().map(|(k, b)| (k.into(), b)).collect();
        Self::from_bounds(bounds)
    }

    fn from_bounds(bounds: BTreeMap<String, (F, F)>) -> RrtResult<Self> {
        if bounds.is_empty() {
            return Err(RrtError::InvalidArgument(
                "a space needs at least one axis".to_string(),
            ));
        }
        for (axis, &(lower, upper)) in &bounds {
            if !(upper - lower).is_finite() || lower > upper {
                return Err(RrtError::InvalidArgument(format!(
                    "bounds of axis '{}' must be finite with lower <= upper and a finite width",
                    axis
                )));
            }
        }
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &BTreeMap<String, (F, F)> {
        &self.bounds
    }

    pub fn bound(&self, axis: &str) -> Option<(F, F)> {
        self.bounds.get(axis).copied()
    }

    pub fn axes(&self) -> impl Iterator<Item = &String> {
        self.bounds.keys()
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub(crate) fn check_axes(&self, point: &Point<F>) -> RrtResult<()> {
        if self.bounds.keys().eq(point.axes()) {
            Ok(())
        } else {
            Err(RrtError::dimension_mismatch(self.axes(), point.axes()))
        }
    }

    /// Checks if a point lies inside the box (bounds inclusive).
    pub fn within(&self, point: &Point<F>) -> RrtResult<bool> {
        self.check_axes(point)?;
        // for every axis, point[axis] ∈ [lower, upper]
        Ok(self
            .bounds
            .values()
            .zip(point.coordinates().values())
            .all(|(&(lower, upper), &x)| x >= lower && x <= upper))
    }

    /// Checks if the segment [start, end] intersects the box.
    ///
    /// Slab test: for each axis it computes the entry and exit parameters t₁, t₂
    /// along p(t) = start + t * (end - start) and narrows a global [t_min, t_max].
    /// The segment intersects iff that interval overlaps [0, 1].
    pub fn intersects_segment(&self, start: &Point<F>, end: &Point<F>) -> RrtResult<bool> {
        self.check_axes(start)?;
        self.check_axes(end)?;
        let mut t_min = F::zero();
        let mut t_max = F::one();

        let axes = self
            .bounds
            .values()
            .zip(start.coordinates().values().zip(end.coordinates().values()));
        for (&(lower, upper), (&s, &e)) in axes {
            let d = e - s;
            if d == F::zero() {
                // Parallel to slab: if start is outside, no intersection
                if s < lower || s > upper {
                    return Ok(false);
                }
            } else {
                let inv_d = F::one() / d;
                let mut t1 = (lower - s) * inv_d;
                let mut t2 = (upper - s) * inv_d;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return Ok(false);
                }
            }
        }

        Ok(!(t_max < F::zero() || t_min > F::one()))
    }
}

impl<F: Float + SampleUniform> Space<F> {
    /// Draws one point uniformly from the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Point<F> {
        let coordinates: BTreeMap<String, F> = self
            .bounds
            .iter()
            .map(|(axis, &(lower, upper))| (axis.clone(), rng.gen_range(lower..=upper)))
            .collect();
        // Bounds are never empty, so neither is the sampled point.
        Point::from_parts(coordinates)
    }

    /// Draws `n` independent points uniformly from the box.
    ///
    /// Fails with `InvalidArgument` when `n == 0`.
    pub fn sample_n<R: Rng>(&self, n: usize, rng: &mut R) -> RrtResult<Vec<Point<F>>> {
        if n == 0 {
            return Err(RrtError::InvalidArgument(format!(
                "n ({}) must be > 0",
                n
            )));
        }
        Ok((0..n).map(|_| self.sample(rng)).collect())
    }
}

impl<F: Float> TryFrom<BTreeMap<String, (F, F)>> for Space<F> {
    type Error = RrtError;

    fn try_from(bounds: BTreeMap<String, (F, F)>) -> RrtResult<Self> {
        Self::from_bounds(bounds)
    }
}

impl<F: Float> From<Space<F>> for BTreeMap<String, (F, F)> {
    fn from(space: Space<F>) -> Self {
        space.bounds
    }
}
