//! Advancing positions by one step.

use tether_core::geometry::Vector;

use crate::config::SimulationConfig;

fn limit_displacement(displacement: Vector, max_displacement: Option<f64>) -> Vector {
    match max_displacement {
        Some(max) => displacement.clamp_length(max),
        None => displacement,
    }
}

/// `pos' = pos + step_size * force`, with the move bounded by
/// `max_displacement` and each moved coordinate by `position_limit`.
pub(crate) fn euler(pos: &Vector, force: &Vector, config: &SimulationConfig) -> Vector {
    let displacement = limit_displacement(force.scale(config.step_size()), config.max_displacement());
    pos.add_bounded(&displacement, config.position_limit())
}

/// Damped velocity update. Returns the new position and velocity.
///
/// The velocity keeps accumulating force between steps and loses
/// `velocity_decay` of itself each step; it is bounded by
/// `max_displacement` like an Euler move.
pub(crate) fn momentum(
    pos: &Vector,
    vel: &Vector,
    force: &Vector,
    config: &SimulationConfig,
) -> (Vector, Vector) {
    let mut accelerated = vel.clone();
    accelerated.add_scaled(force, config.step_size());
    let vel = limit_displacement(
        accelerated.scale(1.0 - config.velocity_decay()),
        config.max_displacement(),
    );
    let pos = pos.add_bounded(&vel, config.position_limit());
    (pos, vel)
}
