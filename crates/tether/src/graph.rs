//! Ingestion of graph documents into the internal simulation model.
//!
//! [`Graph::from_document`] is the only way to build a [`Graph`], and it
//! checks every structural rule up front: edge indices in range, one
//! position dimension shared by all nodes, velocities matching it, and
//! usable edge weights. All problems are collected into a single
//! [`ValidationError`] so nothing downstream has to deal with a malformed
//! graph.

use log::{debug, trace};

use tether_core::{document::Document, geometry::Vector};

use crate::{
    config::InitialConfig,
    error::{ErrorCode, Issue, ValidationError},
};

/// A weighted spring between two distinct or identical nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spring {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Validated graph with resolved dimension, weights and masses.
#[derive(Debug, Clone)]
pub(crate) struct Graph {
    dim: usize,
    positions: Vec<Option<Vector>>,
    velocities: Vec<Option<Vector>>,
    masses: Vec<f64>,
    springs: Vec<Spring>,
}

impl Graph {
    /// Build the simulation model from a document.
    ///
    /// The layout dimension is taken from the first node carrying a
    /// position, or from `initial.dimensions()` when none does.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every issue found.
    pub fn from_document(
        document: &Document,
        initial: &InitialConfig,
    ) -> Result<Self, ValidationError> {
        let nodes = document.nodes();
        let mut issues = Vec::new();

        let reference = nodes
            .iter()
            .enumerate()
            .find_map(|(i, node)| node.pos().filter(|pos| pos.dim() > 0).map(|pos| (i, pos.dim())));
        let dim = reference.map_or(initial.dimensions(), |(_, dim)| dim);

        for (i, node) in nodes.iter().enumerate() {
            if let Some(pos) = node.pos() {
                if pos.dim() == 0 {
                    issues.push(
                        Issue::new(ErrorCode::E003, format!("node {i} has an empty position"))
                            .with_help("remove `pos` to let the engine place the node"),
                    );
                } else if let Some((first, expected)) =
                    reference.filter(|&(_, expected)| pos.dim() != expected)
                {
                    issues.push(
                        Issue::new(
                            ErrorCode::E002,
                            format!(
                                "node {i} has a {}-dimensional position, but node {first} has a {expected}-dimensional one",
                                pos.dim()
                            ),
                        )
                        .with_help("all positions in a document must have the same number of components"),
                    );
                }
            }
            if let Some(vel) = node.vel().filter(|vel| vel.dim() != dim) {
                issues.push(Issue::new(
                    ErrorCode::E004,
                    format!(
                        "node {i} has a {}-dimensional velocity in a {dim}-dimensional layout",
                        vel.dim()
                    ),
                ));
            }
        }

        let mut springs = Vec::with_capacity(document.edges().len());
        for (e, edge) in document.edges().iter().enumerate() {
            let mut in_range = true;
            for (end, index) in [("source", edge.source()), ("target", edge.target())] {
                if index >= nodes.len() {
                    in_range = false;
                    issues.push(
                        Issue::new(
                            ErrorCode::E001,
                            format!(
                                "edge {e} {end} references node {index}, but the graph has {} node(s)",
                                nodes.len()
                            ),
                        )
                        .with_help("edge indices must be smaller than the number of nodes"),
                    );
                }
            }

            let weight = match edge.value() {
                None => 1.0,
                Some(value) if value == 0.0 => 1.0,
                Some(value) if value.is_finite() && value > 0.0 => value,
                Some(value) => {
                    issues.push(Issue::new(
                        ErrorCode::E005,
                        format!("edge {e} has weight {value}; weights must be non-negative and finite"),
                    ));
                    continue;
                }
            };

            if in_range {
                springs.push(Spring {
                    source: edge.source(),
                    target: edge.target(),
                    weight,
                });
            }
        }

        if !issues.is_empty() {
            debug!(issue_count = issues.len(); "Graph document rejected");
            return Err(ValidationError::new(issues));
        }

        let mut masses = vec![0.0; nodes.len()];
        for spring in &springs {
            masses[spring.source] += spring.weight;
            masses[spring.target] += spring.weight;
        }

        debug!(
            node_count = nodes.len(),
            spring_count = springs.len(),
            dim;
            "Graph document validated"
        );
        trace!(masses:?; "Node masses");

        Ok(Self {
            dim,
            positions: nodes.iter().map(|node| node.pos().cloned()).collect(),
            velocities: nodes.iter().map(|node| node.vel().cloned()).collect(),
            masses,
            springs,
        })
    }

    /// Layout dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Position from the document, if the node had one
    pub fn position(&self, node: usize) -> Option<&Vector> {
        self.positions[node].as_ref()
    }

    /// Velocity from the document, if the node had one
    pub fn velocity(&self, node: usize) -> Option<&Vector> {
        self.velocities[node].as_ref()
    }

    /// Weighted degree of every node; a self-loop counts twice
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Springs in edge order
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Returns true if the node has at least one incident edge
    pub fn is_connected(&self, node: usize) -> bool {
        self.masses[node] > 0.0
    }
}
