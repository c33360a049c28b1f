//! Edge records for the shared graph document

use super::actor::ActorIdentity;
use super::node::RecordKind;
use super::stamp::Stamp;
use serde::{Deserialize, Serialize};

/// Arrowhead descriptor every generated edge carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEnd {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for MarkerEnd {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            kind: "arrowclosed".to_string(),
        }
    }
}

/// Creation/edit metadata carried in an edge's `data` block.
///
/// Unlike nodes, `begin` holds the local clock form; `lastModified` stays UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub creator: String,
    pub editor: String,
    pub creator_name: String,
    pub editor_name: String,
    pub begin: String,
    pub last_modified: String,
}

/// A directed relationship between two graph nodes.
///
/// `source` and `target` are taken on trust: referential validity against the
/// nodes mapping is not checked at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Caller-supplied id; uniqueness is the sync boundary's concern
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub source: String,
    pub target: String,
    /// May be empty; such links render unlabeled
    pub label: String,
    /// Always null on generated records
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub marker_end: MarkerEnd,
    pub data: EdgeData,
}

impl GraphEdge {
    /// Build an edge record, stamping actor identity and a fresh timestamp.
    pub fn generate(
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        actor: &ActorIdentity,
    ) -> Self {
        let stamp = Stamp::now();
        Self {
            id: id.into(),
            kind: RecordKind::GraphEdge,
            source: source.into(),
            target: target.into(),
            label: label.into(),
            source_handle: None,
            target_handle: None,
            marker_end: MarkerEnd::default(),
            data: EdgeData {
                creator: actor.id().to_string(),
                editor: actor.id().to_string(),
                creator_name: actor.name().to_string(),
                editor_name: actor.name().to_string(),
                begin: stamp.local().to_string(),
                last_modified: stamp.utc().to_string(),
            },
        }
    }
}
