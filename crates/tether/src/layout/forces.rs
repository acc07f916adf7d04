//! Force terms of the spring embedder.
//!
//! Three terms act on each node:
//!
//! - **Attraction**: every edge is a linear spring with zero rest length,
//!   pulling its endpoints together with a force proportional to their
//!   distance and to the edge weight.
//! - **Repulsion**: every pair of nodes pushes apart with magnitude
//!   `repulsion * m_i * m_j / max(d, min_distance)`. Masses are weighted
//!   degrees, so isolated nodes neither push nor get pushed.
//! - **Gravity**: a pull towards the configured center proportional to the
//!   node's mass, keeping disconnected components from drifting apart.
//!
//! All functions are pure and sum contributions in a fixed order, so the
//! result does not depend on how the work is split across threads.

use rayon::prelude::*;

use tether_core::geometry::Vector;

use crate::{config::SimulationConfig, graph::Spring, layout::tree::Orthtree};

/// Constants for the pairwise repulsion term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Repulsion {
    pub strength: f64,
    pub min_distance: f64,
}

impl Repulsion {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            strength: config.repulsion(),
            min_distance: config.min_distance(),
        }
    }

    /// Adds the push of a body at `other` with mass `other_mass` onto a body
    /// at `pos` with mass `mass`.
    ///
    /// Coincident positions have no direction to push along and contribute
    /// nothing.
    pub fn accumulate(
        &self,
        acc: &mut Vector,
        pos: &Vector,
        mass: f64,
        other: &Vector,
        other_mass: f64,
    ) {
        if mass == 0.0 || other_mass == 0.0 || self.strength == 0.0 {
            return;
        }
        let delta = pos.sub_vector(other);
        let distance = delta.hypot();
        if distance == 0.0 {
            return;
        }
        let magnitude = self.strength * mass * other_mass / distance.max(self.min_distance);
        acc.add_scaled(&delta, magnitude / distance);
    }
}

/// Spring forces for every node, summed in edge order.
pub(crate) fn attraction(
    springs: &[Spring],
    positions: &[Vector],
    spring_constant: f64,
    dim: usize,
) -> Vec<Vector> {
    let mut forces = vec![Vector::zeros(dim); positions.len()];
    for spring in springs {
        if spring.source == spring.target {
            continue;
        }
        let delta = positions[spring.target].sub_vector(&positions[spring.source]);
        let k = spring_constant * spring.weight;
        forces[spring.source].add_scaled(&delta, k);
        forces[spring.target].add_scaled(&delta, -k);
    }
    forces
}

/// Exact all-pairs repulsion.
///
/// Each node's sum runs over the others in index order on a single thread;
/// nodes are distributed over the pool.
pub(crate) fn repulsion_naive(
    positions: &[Vector],
    masses: &[f64],
    repulsion: Repulsion,
    dim: usize,
) -> Vec<Vector> {
    (0..positions.len())
        .into_par_iter()
        .map(|i| {
            let mut acc = Vector::zeros(dim);
            if masses[i] == 0.0 {
                return acc;
            }
            for (j, other) in positions.iter().enumerate() {
                if i != j {
                    repulsion.accumulate(&mut acc, &positions[i], masses[i], other, masses[j]);
                }
            }
            acc
        })
        .collect()
}

/// Barnes-Hut repulsion over a prebuilt tree.
pub(crate) fn repulsion_barnes_hut(
    tree: &Orthtree,
    positions: &[Vector],
    masses: &[f64],
    repulsion: Repulsion,
    theta: f64,
    dim: usize,
) -> Vec<Vector> {
    (0..positions.len())
        .into_par_iter()
        .map(|i| {
            let mut acc = Vector::zeros(dim);
            if masses[i] != 0.0 {
                tree.accumulate_repulsion(i, positions, masses, repulsion, theta, &mut acc);
            }
            acc
        })
        .collect()
}

/// Pull of every node towards `center`, scaled by its mass.
pub(crate) fn gravity(
    positions: &[Vector],
    masses: &[f64],
    strength: f64,
    center: &Vector,
    dim: usize,
) -> Vec<Vector> {
    positions
        .iter()
        .zip(masses)
        .map(|(pos, &mass)| {
            let mut acc = Vector::zeros(dim);
            if mass != 0.0 && strength != 0.0 {
                acc.add_scaled(&center.sub_vector(pos), strength * mass);
            }
            acc
        })
        .collect()
}
