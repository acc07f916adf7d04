//! One step of the force-directed simulation.
//!
//! The step runs in a fixed pipeline:
//!
//! 1. [`init`] gives every node a starting position.
//! 2. [`forces`] sums attraction, repulsion and gravity on a snapshot of
//!    those positions.
//! 3. [`integrate`] moves each node according to the configured
//!    [`Integrator`].
//!
//! Repulsion is the only quadratic term; it runs on a rayon pool and, for
//! large graphs, over the Barnes-Hut [`tree`].

mod forces;
mod init;
mod integrate;
mod tree;

use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;

use tether_core::geometry::Vector;

use crate::{
    TetherError,
    config::{AppConfig, Integrator, RepulsionMethod, SimulationConfig},
    error::{NumericError, Quantity},
    graph::Graph,
};

use forces::Repulsion;
use tree::Orthtree;

/// Highest dimension the tree is built for; a cell has `2^D` children.
const MAX_TREE_DIMENSIONS: usize = 8;

/// Positions after one step, and velocities when the integrator keeps them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StepResult {
    pub positions: Vec<Vector>,
    pub velocities: Option<Vec<Vector>>,
}

/// Advances every node of `graph` by one step.
///
/// # Errors
///
/// Returns [`TetherError::Numeric`] if a force or coordinate is not finite,
/// or [`TetherError::Config`] if the worker pool cannot be started.
pub(crate) fn step(graph: &Graph, config: &AppConfig) -> Result<StepResult, TetherError> {
    let simulation = config.simulation();
    let positions = init::initial_positions(graph, config.initial());

    let pool = ThreadPoolBuilder::new()
        .num_threads(simulation.threads())
        .build()
        .map_err(|err| TetherError::Config(format!("cannot start worker pool: {err}")))?;
    debug!(threads = pool.current_num_threads(); "Worker pool ready");

    let forces = pool.install(|| total_forces(graph, &positions, simulation));
    if let Some(node) = forces.iter().position(|force| !force.is_finite()) {
        return Err(NumericError::new(node, Quantity::Force).into());
    }

    let result = match simulation.integrator() {
        Integrator::Euler => StepResult {
            positions: positions
                .iter()
                .zip(&forces)
                .map(|(pos, force)| integrate::euler(pos, force, simulation))
                .collect(),
            velocities: None,
        },
        Integrator::Momentum => {
            let (positions, velocities) = positions
                .iter()
                .zip(&forces)
                .enumerate()
                .map(|(i, (pos, force))| {
                    let vel = graph
                        .velocity(i)
                        .cloned()
                        .unwrap_or_else(|| Vector::zeros(graph.dim()));
                    integrate::momentum(pos, &vel, force, simulation)
                })
                .unzip();
            StepResult {
                positions,
                velocities: Some(velocities),
            }
        }
    };

    if let Some(node) = result.positions.iter().position(|pos| !pos.is_finite()) {
        return Err(NumericError::new(node, Quantity::Position).into());
    }
    if let Some(velocities) = &result.velocities {
        if let Some(node) = velocities.iter().position(|vel| !vel.is_finite()) {
            return Err(NumericError::new(node, Quantity::Velocity).into());
        }
    }

    info!(
        node_count = graph.len(),
        integrator:? = simulation.integrator();
        "Step complete"
    );
    Ok(result)
}

/// Attraction, then repulsion, then gravity, for every node.
fn total_forces(graph: &Graph, positions: &[Vector], simulation: &SimulationConfig) -> Vec<Vector> {
    let dim = graph.dim();
    let masses = graph.masses();

    let mut totals = forces::attraction(graph.springs(), positions, simulation.spring_constant(), dim);

    let repulsion = Repulsion::from_config(simulation);
    if repulsion.strength != 0.0 {
        let pushes = match repulsion_method(graph.len(), dim, simulation) {
            RepulsionMethod::BarnesHut => {
                let tree = Orthtree::build(positions, masses, simulation.tree_capacity());
                forces::repulsion_barnes_hut(&tree, positions, masses, repulsion, simulation.theta(), dim)
            }
            _ => forces::repulsion_naive(positions, masses, repulsion, dim),
        };
        for (force, push) in totals.iter_mut().zip(&pushes) {
            force.add_scaled(push, 1.0);
        }
    }

    let center = Vector::new(simulation.center().to_vec()).with_dim(dim);
    let pulls = forces::gravity(positions, masses, simulation.gravity(), &center, dim);
    for (force, pull) in totals.iter_mut().zip(&pulls) {
        force.add_scaled(pull, 1.0);
    }

    totals
}

/// Resolves [`RepulsionMethod::Auto`] and falls back to the direct sum when
/// the tree would be too wide.
fn repulsion_method(node_count: usize, dim: usize, simulation: &SimulationConfig) -> RepulsionMethod {
    let method = match simulation.repulsion_method() {
        RepulsionMethod::Auto if node_count >= simulation.barnes_hut_threshold() => {
            RepulsionMethod::BarnesHut
        }
        RepulsionMethod::Auto => RepulsionMethod::Naive,
        method => method,
    };

    if method == RepulsionMethod::BarnesHut && dim > MAX_TREE_DIMENSIONS {
        if simulation.repulsion_method() == RepulsionMethod::BarnesHut {
            warn!(
                dim,
                max = MAX_TREE_DIMENSIONS;
                "Barnes-Hut is not available in this many dimensions, using the direct sum"
            );
        }
        return RepulsionMethod::Naive;
    }

    debug!(method:? = method, node_count; "Repulsion method chosen");
    method
}
