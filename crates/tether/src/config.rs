//! Configuration types for the Tether layout engine.
//!
//! This module provides configuration structures that control how a single
//! simulation step behaves and how nodes without a position are placed.
//! All types implement [`serde::Deserialize`] for loading from external
//! sources such as TOML files; every field has a documented default, so a
//! partial (or empty) configuration is always valid input.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining simulation and initialization settings.
//! - [`SimulationConfig`] - Force constants, step size and integrator.
//! - [`InitialConfig`] - Default dimension and placement of nodes lacking a position.
//!
//! # Example
//!
//! ```
//! # use tether::config::{AppConfig, Integrator};
//! let config = AppConfig::default();
//! assert_eq!(config.simulation().step_size(), 0.1);
//! assert_eq!(config.simulation().integrator(), Integrator::Euler);
//! assert_eq!(config.initial().dimensions(), 2);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use crate::TetherError;

/// Top-level configuration combining simulation and initialization settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Simulation configuration section.
    #[serde(default)]
    simulation: SimulationConfig,

    /// Initial placement configuration section.
    #[serde(default)]
    initial: InitialConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `simulation` - Force and integration settings.
    /// * `initial` - Placement settings for nodes without a position.
    pub fn new(simulation: SimulationConfig, initial: InitialConfig) -> Self {
        Self {
            simulation,
            initial,
        }
    }

    /// Returns the simulation configuration.
    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    /// Returns the initial placement configuration.
    pub fn initial(&self) -> &InitialConfig {
        &self.initial
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TetherError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TetherError> {
        self.simulation.validate()?;
        self.initial.validate()
    }
}

/// How positions are advanced from forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// `pos' = pos + step_size * force`. Stateless; `vel` is left untouched.
    #[default]
    Euler,
    /// Velocity with decay, carried between steps through each node's `vel`.
    Momentum,
}

/// How the all-pairs repulsion is summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepulsionMethod {
    /// Direct O(n^2) sum.
    Naive,
    /// Barnes-Hut approximation over a space-partitioning tree.
    BarnesHut,
    /// Barnes-Hut once the graph reaches `barnes_hut_threshold` nodes.
    #[default]
    Auto,
}

/// How connected nodes without a position are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialLayout {
    /// Phyllotaxis spiral around the default position.
    #[default]
    Spiral,
    /// Evenly spaced on a circle around the default position.
    Circle,
    /// Seeded uniform jitter around the default position.
    Random,
}

/// Force constants, step size and integrator for a single step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    step_size: f64,
    spring_constant: f64,
    repulsion: f64,
    min_distance: f64,
    gravity: f64,
    center: Vec<f64>,
    integrator: Integrator,
    velocity_decay: f64,
    max_displacement: Option<f64>,
    position_limit: f64,
    repulsion_method: RepulsionMethod,
    barnes_hut_threshold: usize,
    theta: f64,
    tree_capacity: usize,
    threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            spring_constant: 1.0,
            repulsion: 10.0,
            min_distance: 1.0,
            gravity: 0.01,
            center: Vec::new(),
            integrator: Integrator::Euler,
            velocity_decay: 0.1,
            max_displacement: Some(10.0),
            position_limit: 1.0e6,
            repulsion_method: RepulsionMethod::Auto,
            barnes_hut_threshold: 256,
            theta: 0.75,
            tree_capacity: 10,
            threads: 0,
        }
    }
}

impl SimulationConfig {
    /// Multiplier applied to forces when advancing positions
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Spring stiffness per unit of edge weight
    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    /// Repulsion strength between two unit-mass nodes at unit distance
    pub fn repulsion(&self) -> f64 {
        self.repulsion
    }

    /// Distance floor used when computing repulsion magnitude
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Strength of the pull towards [`Self::center`], per unit of mass
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Gravity center; missing components are zero
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Integration scheme
    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Fraction of velocity lost per step under [`Integrator::Momentum`]
    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    /// Upper bound on how far a node may move in one step, if any.
    ///
    /// A configured `0` means unbounded, since TOML has no way to unset a key.
    pub fn max_displacement(&self) -> Option<f64> {
        self.max_displacement.filter(|max| *max > 0.0)
    }

    /// Every coordinate is clamped into `[-position_limit, position_limit]`
    pub fn position_limit(&self) -> f64 {
        self.position_limit
    }

    /// Summation strategy for repulsion
    pub fn repulsion_method(&self) -> RepulsionMethod {
        self.repulsion_method
    }

    /// Node count at which [`RepulsionMethod::Auto`] switches to Barnes-Hut
    pub fn barnes_hut_threshold(&self) -> usize {
        self.barnes_hut_threshold
    }

    /// Barnes-Hut opening criterion: a cell of width `s` at distance `d` is
    /// treated as a single body when `s / d < theta`
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Bodies stored in a tree leaf before it subdivides
    pub fn tree_capacity(&self) -> usize {
        self.tree_capacity
    }

    /// Worker threads for repulsion; `0` uses the available parallelism
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Set the step size
    pub fn set_step_size(&mut self, step_size: f64) -> &mut Self {
        self.step_size = step_size;
        self
    }

    /// Set the spring constant for edge forces
    pub fn set_spring_constant(&mut self, constant: f64) -> &mut Self {
        self.spring_constant = constant;
        self
    }

    /// Set the repulsion constant for node forces
    pub fn set_repulsion(&mut self, repulsion: f64) -> &mut Self {
        self.repulsion = repulsion;
        self
    }

    /// Set the repulsion distance floor
    pub fn set_min_distance(&mut self, distance: f64) -> &mut Self {
        self.min_distance = distance;
        self
    }

    /// Set the gravity strength
    pub fn set_gravity(&mut self, gravity: f64) -> &mut Self {
        self.gravity = gravity;
        self
    }

    /// Set the gravity center
    pub fn set_center(&mut self, center: Vec<f64>) -> &mut Self {
        self.center = center;
        self
    }

    /// Set the integrator
    pub fn set_integrator(&mut self, integrator: Integrator) -> &mut Self {
        self.integrator = integrator;
        self
    }

    /// Set the velocity decay
    pub fn set_velocity_decay(&mut self, decay: f64) -> &mut Self {
        self.velocity_decay = decay;
        self
    }

    /// Set or remove the per-step displacement bound
    pub fn set_max_displacement(&mut self, max: Option<f64>) -> &mut Self {
        self.max_displacement = max;
        self
    }

    /// Set the coordinate clamp
    pub fn set_position_limit(&mut self, limit: f64) -> &mut Self {
        self.position_limit = limit;
        self
    }

    /// Set the repulsion summation strategy
    pub fn set_repulsion_method(&mut self, method: RepulsionMethod) -> &mut Self {
        self.repulsion_method = method;
        self
    }

    /// Set the Barnes-Hut switch-over node count
    pub fn set_barnes_hut_threshold(&mut self, threshold: usize) -> &mut Self {
        self.barnes_hut_threshold = threshold;
        self
    }

    /// Set the Barnes-Hut opening criterion
    pub fn set_theta(&mut self, theta: f64) -> &mut Self {
        self.theta = theta;
        self
    }

    /// Set the tree leaf capacity
    pub fn set_tree_capacity(&mut self, capacity: usize) -> &mut Self {
        self.tree_capacity = capacity;
        self
    }

    /// Set the worker thread count
    pub fn set_threads(&mut self, threads: usize) -> &mut Self {
        self.threads = threads;
        self
    }

    fn validate(&self) -> Result<(), TetherError> {
        positive("simulation.step_size", self.step_size)?;
        non_negative("simulation.spring_constant", self.spring_constant)?;
        non_negative("simulation.repulsion", self.repulsion)?;
        positive("simulation.min_distance", self.min_distance)?;
        non_negative("simulation.gravity", self.gravity)?;
        if let Some(c) = self.center.iter().find(|c| !c.is_finite()) {
            return Err(TetherError::Config(format!(
                "simulation.center contains a non-finite component: {c}"
            )));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return Err(TetherError::Config(format!(
                "simulation.velocity_decay must be within [0, 1], got {}",
                self.velocity_decay
            )));
        }
        if let Some(max) = self.max_displacement {
            non_negative("simulation.max_displacement", max)?;
        }
        positive("simulation.position_limit", self.position_limit)?;
        positive("simulation.theta", self.theta)?;
        if self.tree_capacity == 0 {
            return Err(TetherError::Config(
                "simulation.tree_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Placement of nodes that arrive without a position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitialConfig {
    dimensions: usize,
    default_position: f64,
    layout: InitialLayout,
    radius: f64,
    seed: u64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            default_position: 1.0,
            layout: InitialLayout::Spiral,
            radius: 10.0,
            seed: 0,
        }
    }
}

impl InitialConfig {
    /// Dimension used when no node in the document carries a position
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Value of every component of the default position
    pub fn default_position(&self) -> f64 {
        self.default_position
    }

    /// Placement of connected nodes without a position
    pub fn layout(&self) -> InitialLayout {
        self.layout
    }

    /// Scale of the initial placement around the default position
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Seed for [`InitialLayout::Random`]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the default dimension
    pub fn set_dimensions(&mut self, dimensions: usize) -> &mut Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the default position component value
    pub fn set_default_position(&mut self, value: f64) -> &mut Self {
        self.default_position = value;
        self
    }

    /// Set the placement strategy
    pub fn set_layout(&mut self, layout: InitialLayout) -> &mut Self {
        self.layout = layout;
        self
    }

    /// Set the placement radius
    pub fn set_radius(&mut self, radius: f64) -> &mut Self {
        self.radius = radius;
        self
    }

    /// Set the random seed
    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), TetherError> {
        if self.dimensions == 0 {
            return Err(TetherError::Config(
                "initial.dimensions must be at least 1".to_string(),
            ));
        }
        if !self.default_position.is_finite() {
            return Err(TetherError::Config(format!(
                "initial.default_position must be finite, got {}",
                self.default_position
            )));
        }
        non_negative("initial.radius", self.radius)
    }
}

fn positive(field: &str, value: f64) -> Result<(), TetherError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TetherError::Config(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), TetherError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TetherError::Config(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"simulation": {"step_size": 0.5, "integrator": "momentum"}}"#,
        )
        .unwrap();
        assert_eq!(config.simulation().step_size(), 0.5);
        assert_eq!(config.simulation().integrator(), Integrator::Momentum);
        assert_eq!(config.simulation().spring_constant(), 1.0);
        assert_eq!(config.initial(), &InitialConfig::default());
    }

    #[test]
    fn test_enum_names() {
        let config: AppConfig = serde_json::from_str(
            r#"{"simulation": {"repulsion_method": "barnes_hut"}, "initial": {"layout": "random", "seed": 7}}"#,
        )
        .unwrap();
        assert_eq!(
            config.simulation().repulsion_method(),
            RepulsionMethod::BarnesHut
        );
        assert_eq!(config.initial().layout(), InitialLayout::Random);
        assert_eq!(config.initial().seed(), 7);
    }

    #[test]
    fn test_rejects_zero_step_size() {
        let mut simulation = SimulationConfig::default();
        simulation.set_step_size(0.0);
        let err = AppConfig::new(simulation, InitialConfig::default())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("simulation.step_size"));
    }

    #[test]
    fn test_rejects_decay_out_of_range() {
        let mut simulation = SimulationConfig::default();
        simulation.set_velocity_decay(1.5);
        assert!(
            AppConfig::new(simulation, InitialConfig::default())
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut initial = InitialConfig::default();
        initial.set_dimensions(0);
        let err = AppConfig::new(SimulationConfig::default(), initial)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("initial.dimensions"));
    }

    #[test]
    fn test_unbounded_displacement_is_valid() {
        let mut simulation = SimulationConfig::default();
        simulation.set_max_displacement(None);
        assert!(
            AppConfig::new(simulation, InitialConfig::default())
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_zero_max_displacement_means_unbounded() {
        let config: AppConfig =
            serde_json::from_str(r#"{"simulation": {"max_displacement": 0.0}}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation().max_displacement(), None);
        assert_eq!(
            SimulationConfig::default().max_displacement(),
            Some(10.0)
        );
    }

    #[test]
    fn test_rejects_negative_max_displacement() {
        let mut simulation = SimulationConfig::default();
        simulation.set_max_displacement(Some(-1.0));
        let err = AppConfig::new(simulation, InitialConfig::default())
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("simulation.max_displacement"));
    }
}
