//! Conversion of analysis documents into the canonical graph source shape
//!
//! Analysis exports carry `nodeList`/`linkList` with `#`-prefixed ids and
//! packed `"x,y"` coordinate strings. This module maps them onto the
//! `nodes`/`links` shape the record generator consumes. Conversion is
//! all-or-nothing: the first bad record aborts with no partial output.

use super::coordinate::parse_coordinates;
use super::{ConvertError, RecordList};
use crate::graph::{GraphSource, LinkInput, NodeInput, SourceError};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisDocument {
    node_list: Vec<Value>,
    link_list: Vec<Value>,
}

/// Convert a loaded analysis document into a [`GraphSource`].
pub fn convert_document(document: Value) -> Result<GraphSource, ConvertError> {
    let document: AnalysisDocument =
        serde_json::from_value(document).map_err(SourceError::Json)?;

    let mut nodes = Vec::with_capacity(document.node_list.len());
    for (index, raw) in document.node_list.iter().enumerate() {
        nodes.push(convert_node(index, raw)?);
    }
    let mut links = Vec::with_capacity(document.link_list.len());
    for (index, raw) in document.link_list.iter().enumerate() {
        links.push(convert_link(index, raw)?);
    }
    Ok(GraphSource { nodes, links })
}

/// File-to-file pipeline: read an analysis document, convert it, write the
/// canonical source pretty-printed to `output`.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<GraphSource, ConvertError> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(SourceError::NotFound(input.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(input).map_err(SourceError::Io)?;
    let document: Value = serde_json::from_str(&text).map_err(SourceError::Json)?;
    let converted = convert_document(document)?;
    converted.save(output)?;
    Ok(converted)
}

fn convert_node(index: usize, raw: &Value) -> Result<NodeInput, ConvertError> {
    const RECORD: RecordList = RecordList::Node;
    let id = require_str(RECORD, index, raw, "nodeId")?;
    let coord = require_str(RECORD, index, raw, "coord")?;
    let (position_x, position_y) =
        parse_coordinates(coord).map_err(|e| ConvertError::MalformedCoordinate {
            index,
            value: e.0,
        })?;
    let width = require_int(RECORD, index, raw, "width")?;
    let height = require_int(RECORD, index, raw, "height")?;
    let label = require_str(RECORD, index, raw, "content")?;
    let node_type = require_str(RECORD, index, raw, "type")?;
    Ok(NodeInput {
        id: strip_hash(id),
        width,
        height,
        position_x,
        position_y,
        label: label.to_string(),
        node_type: node_type.to_string(),
    })
}

fn convert_link(index: usize, raw: &Value) -> Result<LinkInput, ConvertError> {
    const RECORD: RecordList = RecordList::Link;
    let id = require_str(RECORD, index, raw, "linkId")?;
    let source = require_str(RECORD, index, raw, "sourceNodeId")?;
    let target = require_str(RECORD, index, raw, "targetNodeId")?;
    // Absent, null or non-string propertyName renders as an unlabeled link.
    let link_type = match raw.get("propertyName") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    Ok(LinkInput {
        id: strip_hash(id),
        source: strip_hash(source),
        target: strip_hash(target),
        link_type,
    })
}

/// Strip a single leading `#` from an analysis-side id.
fn strip_hash(id: &str) -> String {
    id.strip_prefix('#').unwrap_or(id).to_string()
}

fn require<'a>(
    record: RecordList,
    index: usize,
    raw: &'a Value,
    key: &'static str,
) -> Result<&'a Value, ConvertError> {
    match raw.get(key) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ConvertError::MissingField { record, index, key }),
    }
}

fn require_str<'a>(
    record: RecordList,
    index: usize,
    raw: &'a Value,
    key: &'static str,
) -> Result<&'a str, ConvertError> {
    require(record, index, raw, key)?
        .as_str()
        .ok_or(ConvertError::InvalidValue { record, index, key })
}

/// Integer fields accept both JSON numbers and numeric strings; floats
/// truncate toward zero, non-integer strings are rejected.
fn require_int(
    record: RecordList,
    index: usize,
    raw: &Value,
    key: &'static str,
) -> Result<i64, ConvertError> {
    let value = require(record, index, raw, key)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or(ConvertError::InvalidValue { record, index, key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
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

    #[test]
    fn converts_nodes_stripping_hash_and_unpacking_coords() {
        let source = convert_document(document()).unwrap();
        assert_eq!(source.nodes.len(), 2);
        let first = &source.nodes[0];
        assert_eq!(first.id, "20240919021731_LPQc");
        assert_eq!(first.position_x, 250.0);
        assert_eq!(first.position_y, 100.0);
        assert_eq!(first.width, 300);
        assert_eq!(first.height, 100);
        assert_eq!(first.label, "Background");
        assert_eq!(first.node_type, "M");
    }

    #[test]
    fn numeric_strings_coerce_for_width_and_height() {
        let source = convert_document(document()).unwrap();
        let second = &source.nodes[1];
        assert_eq!(second.width, 120);
        assert_eq!(second.height, 50);
        assert_eq!(second.position_x, -20.5);
        assert_eq!(second.position_y, 340.25);
    }

    #[test]
    fn converts_links_and_substitutes_empty_link_type() {
        let source = convert_document(document()).unwrap();
        assert_eq!(source.links.len(), 2);
        let first = &source.links[0];
        assert_eq!(first.id, "L1");
        assert_eq!(first.source, "20240919021731_LPQc");
        assert_eq!(first.target, "20240919021734_JCeI");
        assert_eq!(first.link_type, "background");
        // null propertyName becomes the empty string
        assert_eq!(source.links[1].link_type, "");
    }

    #[test]
    fn absent_property_name_becomes_empty_link_type() {
        let doc = json!({
            "nodeList": [],
            "linkList": [
                { "linkId": "#L1", "sourceNodeId": "#a", "targetNodeId": "#b" }
            ]
        });
        let source = convert_document(doc).unwrap();
        assert_eq!(source.links[0].link_type, "");
    }

    #[test]
    fn missing_node_key_names_record_index_and_key() {
        let doc = json!({
            "nodeList": [
                { "nodeId": "#a", "coord": "1,2", "width": 10, "height": 10, "content": "x", "type": "M" },
                { "nodeId": "#b", "width": 10, "height": 10, "content": "y", "type": "M" }
            ],
            "linkList": []
        });
        let err = convert_document(doc).unwrap_err();
        match err {
            ConvertError::MissingField { record, index, key } => {
                assert_eq!(record, RecordList::Node);
                assert_eq!(index, 1);
                assert_eq!(key, "coord");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_link_key_names_record_index_and_key() {
        let doc = json!({
            "nodeList": [],
            "linkList": [ { "linkId": "#L1", "sourceNodeId": "#a" } ]
        });
        let err = convert_document(doc).unwrap_err();
        match err {
            ConvertError::MissingField { record, index, key } => {
                assert_eq!(record, RecordList::Link);
                assert_eq!(index, 0);
                assert_eq!(key, "targetNodeId");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_coordinate_aborts_with_value() {
        let doc = json!({
            "nodeList": [
                { "nodeId": "#a", "coord": "not-a-pair", "width": 10, "height": 10, "content": "x", "type": "M" }
            ],
            "linkList": []
        });
        let err = convert_document(doc).unwrap_err();
        match err {
            ConvertError::MalformedCoordinate { index, value } => {
                assert_eq!(index, 0);
                assert_eq!(value, "not-a-pair");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_width_is_invalid() {
        let doc = json!({
            "nodeList": [
                { "nodeId": "#a", "coord": "1,2", "width": "10.5", "height": 10, "content": "x", "type": "M" }
            ],
            "linkList": []
        });
        let err = convert_document(doc).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidValue { key: "width", .. }
        ));
    }

    #[test]
    fn document_without_lists_is_rejected() {
        let err = convert_document(json!({ "nodeList": [] })).unwrap_err();
        assert!(matches!(err, ConvertError::Source(SourceError::Json(_))));
    }

    #[test]
    fn empty_lists_convert_to_empty_source() {
        let source =
            convert_document(json!({ "nodeList": [], "linkList": [] })).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn first_failure_wins_across_records() {
        // Second node and first link are both broken; node errors surface first.
        let doc = json!({
            "nodeList": [
                { "nodeId": "#a", "coord": "1,2", "width": 10, "height": 10, "content": "x", "type": "M" },
                { "nodeId": "#b", "coord": "bad", "width": 10, "height": 10, "content": "y", "type": "M" }
            ],
            "linkList": [ { "linkId": "#L1" } ]
        });
        let err = convert_document(doc).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedCoordinate { index: 1, .. }));
    }
}
