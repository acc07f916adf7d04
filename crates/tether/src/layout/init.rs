//! Placement of nodes that arrive without a position.
//!
//! Isolated nodes always land on the default position, so graphs without
//! edges are reproducible and stay still. Connected nodes are spread around
//! that point by the configured [`InitialLayout`]; they must not coincide,
//! or there would be no direction for the first repulsion step.

use std::f64::consts::{PI, TAU};

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use tether_core::geometry::Vector;

use crate::{
    config::{InitialConfig, InitialLayout},
    graph::Graph,
};

/// Returns a position for every node: its own if it had one, otherwise a
/// deterministic placement.
pub(crate) fn initial_positions(graph: &Graph, config: &InitialConfig) -> Vec<Vector> {
    let dim = graph.dim();
    let anchor = Vector::splat(dim, config.default_position());

    let unplaced: Vec<usize> = (0..graph.len())
        .filter(|&i| graph.position(i).is_none() && graph.is_connected(i))
        .collect();
    if !unplaced.is_empty() {
        debug!(
            count = unplaced.len(),
            layout:? = config.layout();
            "Placing connected nodes without a position"
        );
    }

    let mut offsets = vec![None; graph.len()];
    match config.layout() {
        InitialLayout::Spiral => {
            for &i in &unplaced {
                offsets[i] = Some(spiral_offset(i, dim, config.radius()));
            }
        }
        InitialLayout::Circle => {
            for (ordinal, &i) in unplaced.iter().enumerate() {
                offsets[i] = Some(circle_offset(ordinal, unplaced.len(), dim, config.radius()));
            }
        }
        InitialLayout::Random => {
            let mut rng = StdRng::seed_from_u64(config.seed());
            let radius = config.radius();
            for &i in &unplaced {
                let offset = (0..dim)
                    .map(|_| {
                        if radius > 0.0 {
                            rng.random_range(-radius..=radius)
                        } else {
                            0.0
                        }
                    })
                    .collect();
                offsets[i] = Some(Vector::new(offset));
            }
        }
    }

    (0..graph.len())
        .map(|i| match (graph.position(i), &offsets[i]) {
            (Some(pos), _) => pos.clone(),
            (None, Some(offset)) => anchor.add_vector(offset),
            (None, None) => anchor.clone(),
        })
        .collect()
}

/// Phyllotaxis (sunflower) placement: node `i` sits at radius
/// `radius * sqrt(0.5 + i)` and angle `i * golden_angle`.
fn spiral_offset(index: usize, dim: usize, radius: f64) -> Vector {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let r = radius * (0.5 + index as f64).sqrt();
    let angle = index as f64 * golden_angle;
    Vector::new(
        (0..dim)
            .map(|axis| match axis {
                0 if dim == 1 => r,
                0 => r * angle.cos(),
                1 => r * angle.sin(),
                // Higher axes: tilt the spiral so 3D layouts are not flat.
                _ => r * (angle * (axis as f64 + 1.0) / 2.0).cos(),
            })
            .collect(),
    )
}

/// Even spacing on a circle; on a line in 1D so no two nodes coincide.
fn circle_offset(ordinal: usize, count: usize, dim: usize, radius: f64) -> Vector {
    if dim == 1 {
        let t = if count > 1 {
            2.0 * ordinal as f64 / (count - 1) as f64 - 1.0
        } else {
            0.0
        };
        return Vector::new(vec![radius * t]);
    }
    let angle = TAU * ordinal as f64 / count as f64;
    let mut offset = Vector::zeros(dim);
    offset.add_scaled(&Vector::new(vec![angle.cos(), angle.sin()]), radius);
    offset
}
