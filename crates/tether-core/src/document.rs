//! The graph document exchanged at the process boundary.
//!
//! A [`Document`] is what callers serialize, hand to the engine, and get
//! back with positions filled in. The engine never interprets node names or
//! any keys it does not know about; those are carried through untouched so
//! that feeding an output back in as the next input loses nothing.
//!
//! # JSON shape
//!
//! ```text
//! { "nodes": [ { "name"?: string, "pos"?: [number, ...], "vel"?: [number, ...] }, ... ],
//!   "edges": [ { "source": int, "target": int, "value"?: number }, ... ] }
//! ```
//!
//! Both `nodes` and `edges` may be omitted and default to empty lists.
//! The optional fields may be omitted too, but not set to `null`: an
//! explicit `null` could not be written back out unchanged, so it is
//! rejected when the document is read.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Vector;

/// A graph document: index-addressed nodes and the edges between them.
///
/// # Examples
///
/// ```
/// # use tether_core::document::{Document, Edge, Node};
/// let doc = Document::new(
///     vec![Node::new().with_name("A"), Node::new().with_name("B")],
///     vec![Edge::new(0, 1)],
/// );
/// assert_eq!(doc.nodes().len(), 2);
/// assert_eq!(doc.edges()[0].target(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    nodes: Vec<Node>,

    #[serde(default)]
    edges: Vec<Edge>,

    /// Unknown top-level keys, passed through unchanged.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Document {
    /// Creates a document from nodes and edges
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            extra: Map::new(),
        }
    }

    /// Returns the nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns mutable access to the nodes
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Returns the edges in document order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the top-level keys the engine does not interpret
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Reads an optional field whose key is present, refusing `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A single node of the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pos: Option<Vector>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    vel: Option<Vector>,

    /// Unknown node keys (labels, groups, ...), passed through unchanged.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Node {
    /// Creates a node with no name and no position
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name and returns the modified node
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the position and returns the modified node
    pub fn with_pos(mut self, pos: impl Into<Vector>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    /// Sets the velocity and returns the modified node
    pub fn with_vel(mut self, vel: impl Into<Vector>) -> Self {
        self.vel = Some(vel.into());
        self
    }

    /// Returns the opaque node label
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the position, if the node has one
    pub fn pos(&self) -> Option<&Vector> {
        self.pos.as_ref()
    }

    /// Returns the velocity, if the node has one
    pub fn vel(&self) -> Option<&Vector> {
        self.vel.as_ref()
    }

    /// Replaces the position
    pub fn set_pos(&mut self, pos: Vector) {
        self.pos = Some(pos);
    }

    /// Replaces the velocity
    pub fn set_vel(&mut self, vel: Vector) {
        self.vel = Some(vel);
    }

    /// Returns the node keys the engine does not interpret
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A directed edge between two nodes, addressed by index.
///
/// Direction is kept for the caller's benefit; the spring force is symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    source: usize,
    target: usize,

    /// Edge weight. Absent and `0` both mean `1.0`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    value: Option<f64>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Edge {
    /// Creates an unweighted edge
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            value: None,
            extra: Map::new(),
        }
    }

    /// Sets the weight and returns the modified edge
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns the source node index
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the target node index
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns the raw weight as written in the document
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Returns true if the edge connects a node to itself
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc: Document = serde_json::from_str(r#"{"nodes": [{"name": "A"}, {"name": "B"}]}"#)
            .expect("valid document");
        assert_eq!(doc.nodes().len(), 2);
        assert!(doc.edges().is_empty());
        assert_eq!(doc.nodes()[0].name(), Some("A"));
        assert!(doc.nodes()[0].pos().is_none());
    }

    #[test]
    fn test_parse_empty_object() {
        let doc: Document = serde_json::from_str("{}").expect("valid document");
        assert!(doc.nodes().is_empty());
        assert!(doc.edges().is_empty());
    }

    #[test]
    fn test_parse_edges_with_weight() {
        let doc: Document = serde_json::from_str(
            r#"{"nodes": [{}, {}], "edges": [{"source": 0, "target": 1, "value": 2.5}]}"#,
        )
        .expect("valid document");
        let edge = &doc.edges()[0];
        assert_eq!(edge.source(), 0);
        assert_eq!(edge.target(), 1);
        assert_eq!(edge.value(), Some(2.5));
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let result = serde_json::from_str::<Document>(r#"{"nodes": [{}], "edges": [{"source": 0}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let result = serde_json::from_str::<Document>(
            r#"{"nodes": [{}], "edges": [{"source": -1, "target": 0}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_null_is_rejected() {
        for input in [
            r#"{"nodes": [{"name": null}]}"#,
            r#"{"nodes": [{"pos": null}]}"#,
            r#"{"nodes": [{"vel": null}]}"#,
            r#"{"nodes": [{}], "edges": [{"source": 0, "target": 0, "value": null}]}"#,
        ] {
            let result = serde_json::from_str::<Document>(input);
            assert!(result.is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_null_in_unknown_keys_passes_through() {
        let input = r#"{"nodes":[{"label":null}],"edges":[]}"#;
        let doc: Document = serde_json::from_str(input).expect("valid document");
        assert_eq!(serde_json::to_string(&doc).unwrap(), input);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let input = r#"{"nodes":[{"name":"A","group":3}],"edges":[],"meta":{"k":1}}"#;
        let doc: Document = serde_json::from_str(input).expect("valid document");
        assert_eq!(doc.nodes()[0].extra().get("group"), Some(&Value::from(3)));
        assert!(doc.extra().contains_key("meta"));

        let output: Value = serde_json::to_value(&doc).unwrap();
        let expected: Value = serde_json::from_str(input).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_absent_fields_are_not_emitted() {
        let doc = Document::new(vec![Node::new()], vec![Edge::new(0, 0)]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"nodes":[{}],"edges":[{"source":0,"target":0}]}"#);
    }

    #[test]
    fn test_set_pos() {
        let mut node = Node::new().with_name("A");
        node.set_pos(Vector::new(vec![1.0, 1.0]));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"name":"A","pos":[1.0,1.0]}"#);
    }
}
