//! Geometric primitives for force-directed layout.
//!
//! This module provides the fundamental geometric types used throughout Tether
//! for representing node positions, velocities, forces and the regions of the
//! space-partitioning tree.
//!
//! # Overview
//!
//! - [`Vector`] - A coordinate or displacement of arbitrary dimension
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum corners
//!
//! # Dimensionality
//!
//! Unlike a fixed 2D point, a [`Vector`] carries its own dimension. Graph
//! documents are laid out in 2D by default, but the same engine handles 3D
//! (or any other positive dimension) as long as all vectors taking part in an
//! operation agree. Binary operations treat a missing component as `0.0`, so
//! the result always has the dimension of the longer operand.

use serde::{Deserialize, Serialize};

/// A position, velocity or force with `f64` components.
///
/// Serializes as a flat JSON array of numbers, which is the `pos` / `vel`
/// representation used by graph documents.
///
/// # Examples
///
/// ```
/// # use tether_core::geometry::Vector;
/// let a = Vector::new(vec![1.0, 2.0]);
/// let b = Vector::new(vec![3.0, 4.0]);
///
/// let sum = a.add_vector(&b);
/// assert_eq!(sum.components(), &[4.0, 6.0]);
///
/// let delta = b.sub_vector(&a);
/// assert_eq!(delta.hypot(), 8.0_f64.sqrt());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f64>);

impl Vector {
    /// Creates a new vector from its components
    pub fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    /// Creates a vector of the given dimension with every component set to zero
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    /// Creates a vector of the given dimension with every component set to `value`
    ///
    /// # Examples
    ///
    /// ```
    /// # use tether_core::geometry::Vector;
    /// let ones = Vector::splat(3, 1.0);
    /// assert_eq!(ones.components(), &[1.0, 1.0, 1.0]);
    /// ```
    pub fn splat(dim: usize, value: f64) -> Self {
        Self(vec![value; dim])
    }

    /// Returns the number of components
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Returns the components as a slice
    pub fn components(&self) -> &[f64] {
        &self.0
    }

    /// Returns the component along `axis`, or `0.0` if the vector is shorter
    pub fn component(&self, axis: usize) -> f64 {
        self.0.get(axis).copied().unwrap_or(0.0)
    }

    /// Returns a copy resized to `dim` components, padding with zeros
    pub fn with_dim(&self, dim: usize) -> Self {
        Self((0..dim).map(|axis| self.component(axis)).collect())
    }

    /// Returns true if every component is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// Returns true if no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Adds another vector to this vector, returning a new vector
    pub fn add_vector(&self, other: &Vector) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    /// Subtracts another vector from this vector, returning a new vector
    pub fn sub_vector(&self, other: &Vector) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies every component by the given factor
    pub fn scale(&self, factor: f64) -> Self {
        Self(self.0.iter().map(|c| c * factor).collect())
    }

    /// Adds `other * factor` to this vector in place.
    ///
    /// Force accumulation runs this once per pair, so it avoids allocating
    /// an intermediate vector. Grows `self` if `other` has more components.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tether_core::geometry::Vector;
    /// let mut force = Vector::zeros(2);
    /// force.add_scaled(&Vector::new(vec![1.0, -2.0]), 0.5);
    /// force.add_scaled(&Vector::new(vec![1.0, -2.0]), 0.5);
    /// assert_eq!(force.components(), &[1.0, -2.0]);
    /// ```
    pub fn add_scaled(&mut self, other: &Vector, factor: f64) {
        if other.0.len() > self.0.len() {
            self.0.resize(other.0.len(), 0.0);
        }
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a += b * factor;
        }
    }

    /// Calculates the Euclidean length
    pub fn hypot(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Calculates the Euclidean distance to another vector
    pub fn distance(&self, other: &Vector) -> f64 {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|axis| {
                let d = self.component(axis) - other.component(axis);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Moves by `displacement` while keeping each coordinate in `[-limit, limit]`.
    ///
    /// A coordinate that already lies outside the range is never pushed
    /// further out, and one with a zero displacement is left exactly where
    /// it is.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tether_core::geometry::Vector;
    /// let pos = Vector::new(vec![90.0, 2.0e6, 2.0e6]);
    /// let moved = pos.add_bounded(&Vector::new(vec![50.0, 0.0, -1.0]), 100.0);
    /// assert_eq!(moved.components(), &[100.0, 2.0e6, 2.0e6 - 1.0]);
    /// ```
    pub fn add_bounded(&self, displacement: &Vector, limit: f64) -> Self {
        self.zip_with(displacement, |c, d| {
            if d == 0.0 {
                return c;
            }
            let bound = limit.max(c.abs());
            (c + d).clamp(-bound, bound)
        })
    }

    /// Scales the vector down so its length does not exceed `max`.
    ///
    /// Direction is preserved; vectors already shorter than `max` are
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tether_core::geometry::Vector;
    /// let v = Vector::new(vec![30.0, 40.0]);
    /// assert_eq!(v.clamp_length(5.0).components(), &[3.0, 4.0]);
    /// assert_eq!(v.clamp_length(100.0), v);
    /// ```
    pub fn clamp_length(&self, max: f64) -> Self {
        let len = self.hypot();
        if len.is_infinite() && self.is_finite() {
            // The squares overflowed; measure relative to the largest component.
            let largest = self.0.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
            let relative = self.scale(1.0 / largest).hypot();
            return self.scale(max / largest / relative);
        }
        if len > max && len > 0.0 {
            self.scale(max / len)
        } else {
            self.clone()
        }
    }

    fn zip_with(&self, other: &Vector, op: impl Fn(f64, f64) -> f64) -> Self {
        let len = self.0.len().max(other.0.len());
        Self(
            (0..len)
                .map(|axis| op(self.component(axis), other.component(axis)))
                .collect(),
        )
    }
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Self(components)
    }
}

/// An axis-aligned box with minimum and maximum corners.
///
/// Used as the region of a space-partitioning tree cell. A box of dimension
/// `D` splits into `2^D` equally sized orthants, numbered so that bit `k` of
/// the orthant index is set when the orthant lies on the upper side of
/// axis `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    min: Vector,
    max: Vector,
}

impl Bounds {
    /// Creates new bounds from a minimum and a maximum corner
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// Creates the smallest bounds containing all given points.
    ///
    /// Returns `None` when the iterator is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tether_core::geometry::{Bounds, Vector};
    /// let points = [Vector::new(vec![0.0, 5.0]), Vector::new(vec![4.0, -1.0])];
    /// let bounds = Bounds::from_points(points.iter()).unwrap();
    /// assert_eq!(bounds.min().components(), &[0.0, -1.0]);
    /// assert_eq!(bounds.max().components(), &[4.0, 5.0]);
    /// ```
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vector>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut min = first.clone();
        let mut max = first.clone();
        for point in points {
            let len = min.dim().max(point.dim());
            min = Vector::new(
                (0..len)
                    .map(|axis| min.component(axis).min(point.component(axis)))
                    .collect(),
            );
            max = Vector::new(
                (0..len)
                    .map(|axis| max.component(axis).max(point.component(axis)))
                    .collect(),
            );
        }
        Some(Self { min, max })
    }

    /// Returns the minimum corner
    pub fn min(&self) -> &Vector {
        &self.min
    }

    /// Returns the maximum corner
    pub fn max(&self) -> &Vector {
        &self.max
    }

    /// Returns the dimension of the bounds
    pub fn dim(&self) -> usize {
        self.min.dim().max(self.max.dim())
    }

    /// Returns the center point of the bounds
    pub fn center(&self) -> Vector {
        self.min.add_vector(&self.max).scale(0.5)
    }

    /// Returns the longest side length
    pub fn width(&self) -> f64 {
        (0..self.dim())
            .map(|axis| self.max.component(axis) - self.min.component(axis))
            .fold(0.0, f64::max)
    }

    /// Returns a hypercube with the same center whose side equals [`Self::width`]
    pub fn to_cube(&self) -> Self {
        let half = self.width() / 2.0;
        let center = self.center();
        Self {
            min: center.add_vector(&Vector::splat(center.dim(), -half)),
            max: center.add_vector(&Vector::splat(center.dim(), half)),
        }
    }

    /// Checks whether the point lies inside the bounds, edges included
    pub fn contains(&self, point: &Vector) -> bool {
        (0..self.dim()).all(|axis| {
            let c = point.component(axis);
            c >= self.min.component(axis) && c <= self.max.component(axis)
        })
    }

    /// Returns the number of orthants this box splits into (`2^D`)
    pub fn orthant_count(&self) -> usize {
        1 << self.dim()
    }

    /// Returns the index of the orthant containing `point`
    pub fn orthant_of(&self, point: &Vector) -> usize {
        let center = self.center();
        (0..self.dim())
            .filter(|&axis| point.component(axis) >= center.component(axis))
            .fold(0, |index, axis| index | (1 << axis))
    }

    /// Returns the bounds of the orthant with the given index
    pub fn orthant(&self, index: usize) -> Self {
        let center = self.center();
        let dim = self.dim();
        let mut min = Vec::with_capacity(dim);
        let mut max = Vec::with_capacity(dim);
        for axis in 0..dim {
            if index & (1 << axis) != 0 {
                min.push(center.component(axis));
                max.push(self.max.component(axis));
            } else {
                min.push(self.min.component(axis));
                max.push(center.component(axis));
            }
        }
        Self {
            min: Vector::new(min),
            max: Vector::new(max),
        }
    }
}
