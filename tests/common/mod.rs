//! Shared fixtures for integration tests

// Not every test binary uses every fixture.
#![allow(dead_code)]

use collabgraph::graph::{GraphSource, LinkInput, NodeInput};
use collabgraph::ActorIdentity;
use serde_json::{json, Value};

/// A small analysis export in the external `nodeList`/`linkList` shape.
pub fn sample_analysis_document() -> Value {
    json!({
        "nodeList": [
            {
                "nodeId": "#20240919021731_LPQc",
                "coord": "250.0,100.0",
                "width": 300,
                "height": 100,
                "content": "Background",
                "type": "M"
            },
            {
                "nodeId": "#20240919021734_JCeI",
                "coord": "-20.5,340.25",
                "width": "120",
                "height": "50",
                "content": "Method",
                "type": "C"
            }
        ],
        "linkList": [
            {
                "linkId": "#L1",
                "sourceNodeId": "#20240919021731_LPQc",
                "targetNodeId": "#20240919021734_JCeI",
                "propertyName": "background"
            },
            {
                "linkId": "#L2",
                "sourceNodeId": "#20240919021734_JCeI",
                "targetNodeId": "#20240919021731_LPQc",
                "propertyName": null
            }
        ]
    })
}

/// The canonical source the sample analysis export converts to.
pub fn sample_source() -> GraphSource {
    GraphSource {
        nodes: vec![
            node_input("20240919021731_LPQc", "Background", 250.0, 100.0),
            NodeInput {
                id: "20240919021734_JCeI".to_string(),
                width: 120,
                height: 50,
                position_x: -20.5,
                position_y: 340.25,
                label: "Method".to_string(),
                node_type: "C".to_string(),
            },
        ],
        links: vec![
            link_input("L1", "20240919021731_LPQc", "20240919021734_JCeI", "background"),
            link_input("L2", "20240919021734_JCeI", "20240919021731_LPQc", ""),
        ],
    }
}

pub fn node_input(id: &str, label: &str, x: f64, y: f64) -> NodeInput {
    NodeInput {
        id: id.to_string(),
        width: 300,
        height: 100,
        position_x: x,
        position_y: y,
        label: label.to_string(),
        node_type: "M".to_string(),
    }
}

pub fn link_input(id: &str, source: &str, target: &str, link_type: &str) -> LinkInput {
    LinkInput {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        link_type: link_type.to_string(),
    }
}

pub fn test_actor() -> ActorIdentity {
    ActorIdentity::new("LLM", "LLM")
}
