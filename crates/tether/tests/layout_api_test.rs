//! Integration tests for the LayoutEngine API
//!
//! These tests drive the engine through JSON documents the way a harness
//! does: parse, step, serialize, and feed the output back in.

use proptest::prelude::*;
use serde_json::{Value, json};

use tether::{
    LayoutEngine, TetherError,
    config::{AppConfig, InitialConfig, Integrator, RepulsionMethod, SimulationConfig},
    document::Document,
    error::ErrorCode,
};

fn engine_with(simulation: SimulationConfig) -> LayoutEngine {
    LayoutEngine::new(AppConfig::new(simulation, InitialConfig::default()))
}

fn step_value(engine: &LayoutEngine, input: &Value) -> Value {
    let output = engine
        .step_json(&input.to_string())
        .expect("Failed to step document");
    serde_json::from_str(&output).expect("Output should be valid JSON")
}

fn positions(document: &Document) -> Vec<Vec<f64>> {
    document
        .nodes()
        .iter()
        .map(|node| node.pos().expect("every node has a position").components().to_vec())
        .collect()
}

/// A ring with chords, large enough to cross the Barnes-Hut threshold
fn ring(n: usize) -> Value {
    let nodes: Vec<Value> = (0..n).map(|i| json!({ "name": format!("n{i}") })).collect();
    let mut edges: Vec<Value> = (0..n)
        .map(|i| json!({ "source": i, "target": (i + 1) % n }))
        .collect();
    edges.extend((0..n).step_by(7).map(|i| json!({ "source": i, "target": (i * 3) % n, "value": 2 })));
    json!({ "nodes": nodes, "edges": edges })
}

#[test]
fn test_engine_api_exists() {
    let _engine = LayoutEngine::default();
}

#[test]
fn test_two_isolated_nodes_land_on_default_position() {
    let output = step_value(&LayoutEngine::default(), &json!({ "nodes": [{}, {}], "edges": [] }));
    assert_eq!(output["nodes"][0]["pos"], json!([1.0, 1.0]));
    assert_eq!(output["nodes"][1]["pos"], json!([1.0, 1.0]));
}

#[test]
fn test_missing_edges_key_is_empty_graph() {
    let output = step_value(&LayoutEngine::default(), &json!({ "nodes": [{ "name": "solo" }] }));
    assert_eq!(output["nodes"][0]["pos"], json!([1.0, 1.0]));
    assert_eq!(output["nodes"][0]["name"], json!("solo"));
}

#[test]
fn test_step_is_deterministic() {
    let input = ring(40).to_string();
    let engine = LayoutEngine::default();
    let first = engine.step_json(&input).expect("Failed to step");
    let second = engine.step_json(&input).expect("Failed to step");
    assert_eq!(first, second);
}

#[test]
fn test_pass_through_of_everything_but_positions() {
    let input = json!({
        "directed": false,
        "graph": { "title": "demo" },
        "nodes": [
            { "name": "a", "pos": [0.0, 0.0], "color": "red" },
            { "name": "b", "pos": [6.0, 8.0], "tags": [1, 2] },
        ],
        "edges": [{ "source": 0, "target": 1, "value": 2.5, "label": "ab" }],
    });
    let output = step_value(&LayoutEngine::default(), &input);

    assert_eq!(output["directed"], json!(false));
    assert_eq!(output["graph"], json!({ "title": "demo" }));
    assert_eq!(output["edges"], input["edges"]);
    assert_eq!(output["nodes"][0]["name"], json!("a"));
    assert_eq!(output["nodes"][0]["color"], json!("red"));
    assert_eq!(output["nodes"][1]["tags"], json!([1, 2]));
    assert!(output["nodes"][0].get("vel").is_none());
    assert_ne!(output["nodes"][0]["pos"], input["nodes"][0]["pos"]);
}

#[test]
fn test_floats_pass_through_exactly() {
    let source = r#"{"nodes":[{"w":1.9730612373452545},{}],"edges":[{"source":0,"target":1,"value":1.9730612373452545}]}"#;
    let output = LayoutEngine::default()
        .step_json(source)
        .expect("Failed to step");
    assert!(output.contains(r#""w":1.9730612373452545"#), "{output}");
    assert!(output.contains(r#""value":1.9730612373452545"#), "{output}");
}

#[test]
fn test_force_free_node_beyond_limit_keeps_position() {
    let input = json!({ "nodes": [{ "pos": [2.0e6, 5.0] }], "edges": [] });
    let output = step_value(&LayoutEngine::default(), &input);
    assert_eq!(output["nodes"][0]["pos"], json!([2.0e6, 5.0]));
}

#[test]
fn test_explicit_null_is_rejected() {
    let result = LayoutEngine::default().step_json(r#"{"nodes": [{"name": null}]}"#);
    match result {
        Err(TetherError::Validation { err, .. }) => {
            assert_eq!(err.issues()[0].code(), ErrorCode::E000);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn test_dimensionality_is_preserved() {
    let engine = LayoutEngine::default();
    for dim in [1, 3, 5] {
        let input = json!({
            "nodes": [{ "pos": vec![0.0; dim] }, {}, { "pos": vec![2.0; dim] }],
            "edges": [{ "source": 0, "target": 1 }, { "source": 1, "target": 2 }],
        });
        let document = engine.parse(&input.to_string()).expect("Failed to parse");
        let output = engine.step(&document).expect("Failed to step");
        for pos in positions(&output) {
            assert_eq!(pos.len(), dim);
        }
    }
}

#[test]
fn test_out_of_range_edge_is_rejected() {
    let input = json!({ "nodes": [{}, {}], "edges": [{ "source": 0, "target": 2 }] });
    let result = LayoutEngine::default().step_json(&input.to_string());
    match result {
        Err(TetherError::Validation { err, .. }) => {
            assert_eq!(err.issues().len(), 1);
            assert_eq!(err.issues()[0].code(), ErrorCode::E001);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_rejected() {
    let result = LayoutEngine::default().step_json(r#"{"nodes": [{"pos": [1, }]}"#);
    match result {
        Err(TetherError::Validation { err, .. }) => {
            assert_eq!(err.issues()[0].code(), ErrorCode::E000);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn test_self_loop_stays_finite() {
    let input = json!({
        "nodes": [{ "pos": [2.0, 2.0] }, {}],
        "edges": [{ "source": 0, "target": 0 }, { "source": 1, "target": 1, "value": 3 }],
    });
    let engine = LayoutEngine::default();
    let document = engine.parse(&input.to_string()).expect("Failed to parse");
    let output = engine.step(&document).expect("Failed to step");
    for pos in positions(&output) {
        assert!(pos.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn test_path_stays_bounded_over_repeated_steps() {
    let engine = LayoutEngine::default();
    let mut source = json!({
        "nodes": [{}, {}, {}],
        "edges": [{ "source": 0, "target": 1 }, { "source": 1, "target": 2 }],
    })
    .to_string();

    for _ in 0..100 {
        source = engine.step_json(&source).expect("Failed to step");
    }

    let document = engine.parse(&source).expect("Failed to parse");
    let final_positions = positions(&document);
    for pos in &final_positions {
        assert!(pos.iter().all(|c| c.is_finite() && c.abs() < 1.0e3), "{pos:?}");
    }
    // Repulsion keeps the path from collapsing onto a point.
    assert_ne!(final_positions[0], final_positions[2]);
}

#[test]
fn test_result_does_not_depend_on_thread_count() {
    for method in [RepulsionMethod::Naive, RepulsionMethod::BarnesHut] {
        let input = ring(300).to_string();
        let outputs: Vec<String> = [1, 2, 4]
            .into_iter()
            .map(|threads| {
                let mut simulation = SimulationConfig::default();
                simulation.set_repulsion_method(method).set_threads(threads);
                engine_with(simulation)
                    .step_json(&input)
                    .expect("Failed to step")
            })
            .collect();
        assert_eq!(outputs[0], outputs[1], "{method:?}");
        assert_eq!(outputs[0], outputs[2], "{method:?}");
    }
}

#[test]
fn test_auto_method_handles_large_graphs() {
    let engine = LayoutEngine::default();
    let document = engine.parse(&ring(400).to_string()).expect("Failed to parse");
    let output = engine.step(&document).expect("Failed to step");
    assert_eq!(output.nodes().len(), 400);
    for pos in positions(&output) {
        assert!(pos.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn test_momentum_velocities_round_trip() {
    let mut simulation = SimulationConfig::default();
    simulation.set_integrator(Integrator::Momentum);
    let engine = engine_with(simulation);

    let input = json!({
        "nodes": [{ "pos": [0.0, 0.0] }, { "pos": [4.0, 0.0] }, {}],
        "edges": [{ "source": 0, "target": 1 }],
    });
    let first = step_value(&engine, &input);
    for node in first["nodes"].as_array().expect("nodes array") {
        assert_eq!(node["vel"].as_array().map(Vec::len), Some(2));
    }
    // Isolated nodes feel no force and keep a zero velocity.
    assert_eq!(first["nodes"][2]["vel"], json!([0.0, 0.0]));

    let second = step_value(&engine, &first);
    assert_ne!(second["nodes"][0]["vel"], first["nodes"][0]["vel"]);
    assert_ne!(second["nodes"][0]["pos"], first["nodes"][0]["pos"]);
}

#[test]
fn test_euler_leaves_input_velocity_untouched() {
    let input = json!({ "nodes": [{ "pos": [0.0, 0.0], "vel": [5.0, 5.0] }], "edges": [] });
    let output = step_value(&LayoutEngine::default(), &input);
    assert_eq!(output["nodes"][0]["vel"], json!([5.0, 5.0]));
    assert_eq!(output["nodes"][0]["pos"], json!([0.0, 0.0]));
}

/// Strategy for small 2D graph documents with some unplaced nodes
fn graph_document() -> impl Strategy<Value = Value> {
    (1usize..16).prop_flat_map(|n| {
        let nodes = prop::collection::vec(
            prop::option::of((-50.0f64..50.0, -50.0f64..50.0)),
            n,
        );
        let edges = prop::collection::vec((0..n, 0..n, prop::option::of(0.0f64..5.0)), 0..2 * n);
        (nodes, edges).prop_map(|(nodes, edges)| {
            let nodes: Vec<Value> = nodes
                .into_iter()
                .map(|pos| match pos {
                    Some((x, y)) => json!({ "pos": [x, y], "keep": true }),
                    None => json!({ "keep": true }),
                })
                .collect();
            let edges: Vec<Value> = edges
                .into_iter()
                .map(|(source, target, value)| match value {
                    Some(value) => json!({ "source": source, "target": target, "value": value }),
                    None => json!({ "source": source, "target": target }),
                })
                .collect();
            json!({ "nodes": nodes, "edges": edges, "meta": "x" })
        })
    })
}

proptest! {
    #[test]
    fn prop_step_is_deterministic(input in graph_document()) {
        let engine = LayoutEngine::default();
        let source = input.to_string();
        let first = engine.step_json(&source).unwrap();
        let second = engine.step_json(&source).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_step_preserves_structure(input in graph_document()) {
        let output = step_value(&LayoutEngine::default(), &input);
        prop_assert_eq!(&output["edges"], &input["edges"]);
        prop_assert_eq!(&output["meta"], &input["meta"]);

        let nodes = output["nodes"].as_array().unwrap();
        prop_assert_eq!(nodes.len(), input["nodes"].as_array().unwrap().len());
        for node in nodes {
            prop_assert_eq!(&node["keep"], &json!(true));
            let pos = node["pos"].as_array().unwrap();
            prop_assert_eq!(pos.len(), 2);
            prop_assert!(pos.iter().all(|c| c.as_f64().is_some_and(f64::is_finite)));
        }
    }

    #[test]
    fn prop_isolated_unplaced_nodes_stay_at_default(input in graph_document()) {
        let output = step_value(&LayoutEngine::default(), &input);
        let edges = input["edges"].as_array().unwrap();
        for (i, node) in input["nodes"].as_array().unwrap().iter().enumerate() {
            let isolated = edges.iter().all(|edge| edge["source"] != i && edge["target"] != i);
            if isolated && node.get("pos").is_none() {
                prop_assert_eq!(&output["nodes"][i]["pos"], &json!([1.0, 1.0]));
            }
        }
    }
}
