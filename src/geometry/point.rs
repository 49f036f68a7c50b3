use crate::error::{RrtError, RrtResult};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, Mul, Neg};

/// A point in a configuration space whose axes are identified by name.
///
/// The axis set is fixed at construction. Any operation combining two points
/// requires both to have exactly the same axis set and fails with
/// [`RrtError::DimensionMismatch`] otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, F>",
    into = "BTreeMap<String, F>",
    bound(
        serialize = "F: Float + Serialize",
        deserialize = "F: Float + Deserialize<'de>"
    )
)]
pub struct Point<F: Float> {
    coordinates: BTreeMap<String, F>,
}

impl<F: Float> Point<F> {
    /// Constructs a point from `(axis, value)` pairs.
    ///
    /// Fails with `InvalidArgument` if no axis is given.
    pub fn new<K, I>(axes: I) -> RrtResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, F)>,
    {
        let coordinates: BTreeMap<String, F> =
            axes.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::from_coordinates(coordinates)
    }

    fn from_coordinates(coordinates: BTreeMap<String, F>) -> RrtResult<Self> {
        if coordinates.is_empty() {
            return Err(RrtError::InvalidArgument(
                "a point needs at least one axis".to_string(),
            ));
        }
        Ok(Self { coordinates })
    }

    pub(crate) fn from_parts(coordinates: BTreeMap<String, F>) -> Self {
        debug_assert!(!coordinates.is_empty());
        Self { coordinates }
    }

    /// The zero point with the same axes as `self`.
    pub fn zero_like(&self) -> Self {
        self.map(|_| F::zero())
    }

    pub fn get(&self, axis: &str) -> Option<F> {
        self.coordinates.get(axis).copied()
    }

    pub fn axes(&self) -> impl Iterator<Item = &String> {
        self.coordinates.keys()
    }

    pub fn coordinates(&self) -> &BTreeMap<String, F> {
        &self.coordinates
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns true if both points are keyed by the same axis set.
    pub fn same_axes(&self, other: &Point<F>) -> bool {
        self.coordinates.keys().eq(other.coordinates.keys())
    }

    pub(crate) fn check_axes(&self, other: &Point<F>) -> RrtResult<()> {
        if self.same_axes(other) {
            Ok(())
        } else {
            Err(RrtError::dimension_mismatch(self.axes(), other.axes()))
        }
    }

    /// Euclidean distance to another point.
    ///
    /// Accumulated with `hypot`, so no intermediate square overflows.
    pub fn distance(&self, other: &Point<F>) -> RrtResult<F> {
        self.check_axes(other)?;
        Ok(self
            .values_with(other)
            .fold(F::zero(), |acc, (a, b)| acc.hypot(a - b)))
    }

    /// Minkowski distance of order `p` to another point.
    ///
    /// `p` must be at least 1; `p = ∞` gives the Chebyshev distance.
    pub fn distance_p(&self, other: &Point<F>, p: F) -> RrtResult<F> {
        if p.is_nan() || p < F::one() {
            return Err(RrtError::InvalidArgument(format!(
                "norm order p ({}) must be >= 1",
                p.to_f64().unwrap_or(f64::NAN)
            )));
        }
        self.check_axes(other)?;
        if p.is_infinite() {
            return Ok(self
                .values_with(other)
                .fold(F::zero(), |acc, (a, b)| acc.max((a - b).abs())));
        }
        let sum = self
            .values_with(other)
            .fold(F::zero(), |acc, (a, b)| acc + (a - b).abs().powf(p));
        Ok(sum.powf(p.recip()))
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn norm(&self) -> F {
        self.coordinates
            .values()
            .fold(F::zero(), |acc, &v| acc.hypot(v))
    }

    pub fn norm_p(&self, p: F) -> RrtResult<F> {
        self.distance_p(&self.zero_like(), p)
    }

    /// Element-wise sum. Fails if the axis sets differ.
    pub fn try_add(&self, other: &Point<F>) -> RrtResult<Point<F>> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference `self - other`. Fails if the axis sets differ.
    pub fn try_sub(&self, other: &Point<F>) -> RrtResult<Point<F>> {
        self.zip_with(other, |a, b| a - b)
    }

    fn map(&self, op: impl Fn(F) -> F) -> Point<F> {
        Point {
            coordinates: self
                .coordinates
                .iter()
                .map(|(k, &v)| (k.clone(), op(v)))
                .collect(),
        }
    }

    fn zip_with(&self, other: &Point<F>, op: impl Fn(F, F) -> F) -> RrtResult<Point<F>> {
        self.check_axes(other)?;
        Ok(Point {
            coordinates: self
                .coordinates
                .keys()
                .zip(self.values_with(other))
                .map(|(k, (a, b))| (k.clone(), op(a, b)))
                .collect(),
        })
    }

    // Both maps are ordered by key, so after `check_axes` the values line up.
    fn values_with<'a>(&'a self, other: &'a Point<F>) -> impl Iterator<Item = (F, F)> + 'a {
        self.coordinates
            .values()
            .zip(other.coordinates.values())
            .map(|(&a, &b)| (a, b))
    }
}

impl<F: Float> TryFrom<BTreeMap<String, F>> for Point<F> {
    type Error = RrtError;

    fn try_from(coordinates: BTreeMap<String, F>) -> RrtResult<Self> {
        Self::from_coordinates(coordinates)
    }
}

impl<F: Float> From<Point<F>> for BTreeMap<String, F> {
    fn from(point: Point<F>) -> Self {
        point.coordinates
    }
}

impl<F: Float> Neg for &Point<F> {
    type Output = Point<F>;

    fn neg(self) -> Point<F> {
        self.map(|v| -v)
    }
}

impl<F: Float> Neg for Point<F> {
    type Output = Point<F>;

    fn neg(self) -> Point<F> {
        -&self
    }
}

impl<F: Float> Mul<F> for &Point<F> {
    type Output = Point<F>;

    fn mul(self, scalar: F) -> Point<F> {
        self.map(|v| v * scalar)
    }
}

impl<F: Float> Mul<F> for Point<F> {
    type Output = Point<F>;

    fn mul(self, scalar: F) -> Point<F> {
        &self * scalar
    }
}

impl<F: Float> Div<F> for &Point<F> {
    type Output = Point<F>;

    fn div(self, scalar: F) -> Point<F> {
        self.map(|v| v / scalar)
    }
}

impl<F: Float> Div<F> for Point<F> {
    type Output = Point<F>;

    fn div(self, scalar: F) -> Point<F> {
        &self / scalar
    }
}

impl<F: Float + fmt::Display> fmt::Display for Point<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (axis, value)) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", axis, value)?;
        }
        write!(f, ")")
    }
}
