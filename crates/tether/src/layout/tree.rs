//! Space-partitioning tree for Barnes-Hut repulsion.
//!
//! An orthtree generalizes the quadtree to any dimension: every internal
//! cell splits into `2^D` orthants (four in 2D, eight in 3D). Each cell
//! keeps the total mass and center of mass of the bodies below it, so a
//! distant cell can stand in for all of them at once.
//!
//! Only bodies with non-zero mass are inserted. Leaves hold up to
//! `capacity` bodies before they subdivide; cells at [`MAX_DEPTH`] never
//! subdivide, which bounds the tree even when many bodies coincide.

use log::trace;

use tether_core::geometry::{Bounds, Vector};

use crate::layout::forces::Repulsion;

/// Depth below which cells stop subdividing.
pub(crate) const MAX_DEPTH: usize = 32;

#[derive(Debug)]
struct Cell {
    bounds: Bounds,
    bodies: Vec<usize>,
    children: Vec<Cell>,
    mass: f64,
    center: Vector,
}

impl Cell {
    fn new(bounds: Bounds, capacity: usize) -> Self {
        let dim = bounds.dim();
        Self {
            bounds,
            bodies: Vec::with_capacity(capacity),
            children: Vec::new(),
            mass: 0.0,
            center: Vector::zeros(dim),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn insert(&mut self, body: usize, positions: &[Vector], capacity: usize, depth: usize) {
        if self.is_leaf() {
            if self.bodies.len() < capacity || depth >= MAX_DEPTH {
                self.bodies.push(body);
                return;
            }
            self.subdivide(positions, capacity, depth);
        }
        let orthant = self.bounds.orthant_of(&positions[body]);
        self.children[orthant].insert(body, positions, capacity, depth + 1);
    }

    fn subdivide(&mut self, positions: &[Vector], capacity: usize, depth: usize) {
        self.children = (0..self.bounds.orthant_count())
            .map(|orthant| Cell::new(self.bounds.orthant(orthant), capacity))
            .collect();
        for body in std::mem::take(&mut self.bodies) {
            let orthant = self.bounds.orthant_of(&positions[body]);
            self.children[orthant].insert(body, positions, capacity, depth + 1);
        }
    }

    fn calculate_masses(&mut self, positions: &[Vector], masses: &[f64]) {
        let mut weighted = Vector::zeros(self.bounds.dim());
        self.mass = 0.0;
        if self.is_leaf() {
            for &body in &self.bodies {
                self.mass += masses[body];
                weighted.add_scaled(&positions[body], masses[body]);
            }
        } else {
            for child in &mut self.children {
                child.calculate_masses(positions, masses);
                self.mass += child.mass;
                weighted.add_scaled(&child.center, child.mass);
            }
        }
        if self.mass > 0.0 {
            self.center = weighted.scale(1.0 / self.mass);
        }
    }

    fn accumulate(
        &self,
        body: usize,
        positions: &[Vector],
        masses: &[f64],
        repulsion: Repulsion,
        theta: f64,
        acc: &mut Vector,
    ) {
        if self.mass == 0.0 {
            return;
        }
        let pos = &positions[body];
        if self.is_leaf() {
            for &other in &self.bodies {
                if other != body {
                    repulsion.accumulate(acc, pos, masses[body], &positions[other], masses[other]);
                }
            }
            return;
        }
        let distance = pos.distance(&self.center);
        let far_enough = distance > 0.0 && self.bounds.width() / distance < theta;
        if far_enough && !self.bounds.contains(pos) {
            repulsion.accumulate(acc, pos, masses[body], &self.center, self.mass);
        } else {
            for child in &self.children {
                child.accumulate(body, positions, masses, repulsion, theta, acc);
            }
        }
    }

    fn depth(&self) -> usize {
        1 + self.children.iter().map(Cell::depth).max().unwrap_or(0)
    }
}

/// Barnes-Hut tree over the bodies of one step.
#[derive(Debug)]
pub(crate) struct Orthtree {
    root: Option<Cell>,
}

impl Orthtree {
    /// Build the tree over every body with non-zero mass.
    ///
    /// The root region is the smallest hypercube around those bodies.
    pub fn build(positions: &[Vector], masses: &[f64], capacity: usize) -> Self {
        let bodies: Vec<usize> = (0..positions.len()).filter(|&i| masses[i] > 0.0).collect();
        let Some(bounds) = Bounds::from_points(bodies.iter().map(|&i| &positions[i])) else {
            return Self { root: None };
        };

        let mut root = Cell::new(bounds.to_cube(), capacity);
        for body in bodies {
            root.insert(body, positions, capacity, 0);
        }
        root.calculate_masses(positions, masses);
        trace!(depth = root.depth(), mass = root.mass; "Built Barnes-Hut tree");

        Self { root: Some(root) }
    }

    #[cfg(test)]
    /// Total mass in the tree
    pub fn mass(&self) -> f64 {
        self.root.as_ref().map_or(0.0, |root| root.mass)
    }

    #[cfg(test)]
    /// Center of mass of the tree, if it holds any body
    pub fn center(&self) -> Option<&Vector> {
        self.root.as_ref().map(|root| &root.center)
    }

    #[cfg(test)]
    /// Number of levels, zero for an empty tree
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Cell::depth)
    }

    /// Adds the approximate repulsion on `body` from every other body to `acc`.
    ///
    /// A cell of width `s` whose center of mass is at distance `d` is used
    /// as a single body when `s / d < theta` and `body` lies outside it;
    /// otherwise its children are visited.
    pub fn accumulate_repulsion(
        &self,
        body: usize,
        positions: &[Vector],
        masses: &[f64],
        repulsion: Repulsion,
        theta: f64,
        acc: &mut Vector,
    ) {
        if let Some(root) = &self.root {
            root.accumulate(body, positions, masses, repulsion, theta, acc);
        }
    }
}
