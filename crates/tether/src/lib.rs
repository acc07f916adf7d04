//! Tether - a stateless, step-at-a-time force-directed graph layout engine.
//!
//! Each call takes a graph document (nodes with optional positions, weighted
//! edges), runs exactly one step of a spring-embedder simulation, and returns
//! the same document with updated positions. All state lives in the
//! document, so a caller iterates the layout by feeding the output back in.

pub mod config;
pub mod error;

mod graph;
mod layout;

pub use tether_core::{document, geometry};

pub use error::TetherError;

use log::{debug, info, trace};

use config::AppConfig;
use document::Document;
use error::Issue;
use graph::Graph;

/// Entry point for parsing, stepping and serializing graph documents.
///
/// # Examples
///
/// ```rust
/// use tether::{LayoutEngine, config::AppConfig};
///
/// let input = r#"{"nodes": [{}, {}], "edges": []}"#;
///
/// let engine = LayoutEngine::new(AppConfig::default());
/// let output = engine.step_json(input).expect("Failed to step");
/// assert!(output.contains("[1.0,1.0]"));
///
/// // Or use default config
/// let engine = LayoutEngine::default();
/// ```
#[derive(Debug, Default)]
pub struct LayoutEngine {
    config: AppConfig,
}

impl LayoutEngine {
    /// Create a new engine with the given configuration.
    ///
    /// The configuration is validated when a step runs.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON graph document.
    ///
    /// # Errors
    ///
    /// Returns [`TetherError::Validation`] with code `E000` and a span into
    /// `source` when the text is not a well-formed document.
    pub fn parse(&self, source: &str) -> Result<Document, TetherError> {
        info!("Parsing graph document");

        let document: Document = serde_json::from_str(source).map_err(|err| {
            TetherError::new_validation_error(Issue::from_json_error(&err, source).into(), source)
        })?;

        debug!(
            node_count = document.nodes().len(),
            edge_count = document.edges().len();
            "Graph document parsed"
        );
        Ok(document)
    }

    /// Run one simulation step and return the updated document.
    ///
    /// Only `pos` (and `vel` under the momentum integrator) changes; names,
    /// edges and unknown keys are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TetherError::Config`] for invalid settings,
    /// [`TetherError::Validation`] for a structurally invalid graph, and
    /// [`TetherError::Numeric`] if the step produces a non-finite value.
    pub fn step(&self, document: &Document) -> Result<Document, TetherError> {
        self.config.validate()?;

        info!(node_count = document.nodes().len(); "Running layout step");
        let graph = Graph::from_document(document, self.config.initial())?;
        let result = layout::step(&graph, &self.config)?;

        let mut output = document.clone();
        for (node, pos) in output.nodes_mut().iter_mut().zip(result.positions) {
            node.set_pos(pos);
        }
        if let Some(velocities) = result.velocities {
            for (node, vel) in output.nodes_mut().iter_mut().zip(velocities) {
                node.set_vel(vel);
            }
        }
        trace!(document:? = output; "Stepped document");

        Ok(output)
    }

    /// Serialize a document to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TetherError::Serialize`] if encoding fails.
    pub fn to_json(&self, document: &Document, pretty: bool) -> Result<String, TetherError> {
        let json = if pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(json)
    }

    /// Parse and step a JSON document.
    ///
    /// Validation errors keep `source` so they can be rendered against it.
    ///
    /// # Errors
    ///
    /// Any error of [`LayoutEngine::parse`] or [`LayoutEngine::step`].
    pub fn step_source(&self, source: &str) -> Result<Document, TetherError> {
        let document = self.parse(source)?;
        self.step(&document).map_err(|err| match err {
            TetherError::Validation { err, .. } => TetherError::new_validation_error(err, source),
            other => other,
        })
    }

    /// Parse, step and serialize in one call, producing compact JSON.
    ///
    /// # Errors
    ///
    /// Any error of [`LayoutEngine::step_source`] or [`LayoutEngine::to_json`].
    pub fn step_json(&self, source: &str) -> Result<String, TetherError> {
        let output = self.step_source(source)?;
        self.to_json(&output, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_has_code_and_source() {
        let engine = LayoutEngine::default();
        match engine.parse("{\"nodes\": [}") {
            Err(TetherError::Validation { err, src }) => {
                assert_eq!(err.issues()[0].code(), ErrorCode::E000);
                assert!(err.issues()[0].span().is_some());
                assert_eq!(src, "{\"nodes\": [}");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_step_json_keeps_source_for_graph_errors() {
        let source = r#"{"nodes": [{}], "edges": [{"source": 0, "target": 3}]}"#;
        match LayoutEngine::default().step_json(source) {
            Err(TetherError::Validation { err, src }) => {
                assert_eq!(err.issues()[0].code(), ErrorCode::E001);
                assert_eq!(src, source);
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut simulation = config::SimulationConfig::default();
        simulation.set_step_size(0.0);
        let engine = LayoutEngine::new(AppConfig::new(simulation, Default::default()));
        let err = engine.step(&Document::default()).unwrap_err();
        assert!(matches!(err, TetherError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_pretty_output() {
        let engine = LayoutEngine::default();
        let document = engine.parse(r#"{"nodes": [{}]}"#).unwrap();
        let output = engine.step(&document).unwrap();
        let pretty = engine.to_json(&output, true).unwrap();
        assert!(pretty.contains('\n'));
        let compact = engine.to_json(&output, false).unwrap();
        assert!(!compact.contains('\n'));
    }
}
