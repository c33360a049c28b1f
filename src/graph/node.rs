//! Node records for the shared graph document

use super::actor::ActorIdentity;
use super::stamp::Stamp;
use serde::{Deserialize, Serialize};

/// Default node width when the source does not specify geometry.
pub const DEFAULT_NODE_WIDTH: f64 = 300.0;
/// Default node height when the source does not specify geometry.
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;
/// Default node type tag.
pub const DEFAULT_NODE_TYPE: &str = "M";

/// Record type tag carried in the `type` field of every shared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    GraphNode,
    GraphEdge,
}

/// An x/y coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Creation/edit metadata carried in a node's `data` block.
///
/// `creator` and `editor` hold the same actor at creation time; nodes use
/// the UTC timestamp form for both `begin` and `lastModified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub node_type: String,
    pub creator: String,
    pub editor: String,
    pub creator_name: String,
    pub editor_name: String,
    pub begin: String,
    pub last_modified: String,
}

/// A node in the collaborative graph, in the exact shape viewers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Caller-supplied id; uniqueness is the sync boundary's concern
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub position: Position,
    /// Mirrors `position` at creation time
    pub position_absolute: Position,
    pub width: f64,
    pub height: f64,
    /// Always false on generated records
    pub dragging: bool,
    pub data: NodeData,
}

impl GraphNode {
    /// Build a node record, stamping actor identity and a fresh timestamp.
    ///
    /// Geometry defaults to 300x100 and the type tag to "M"; refine with
    /// [`with_size`](Self::with_size) and [`with_node_type`](Self::with_node_type).
    pub fn generate(
        id: impl Into<String>,
        label: impl Into<String>,
        x: f64,
        y: f64,
        actor: &ActorIdentity,
    ) -> Self {
        let stamp = Stamp::now();
        let position = Position { x, y };
        Self {
            id: id.into(),
            kind: RecordKind::GraphNode,
            position,
            position_absolute: position,
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            dragging: false,
            data: NodeData {
                label: label.into(),
                node_type: DEFAULT_NODE_TYPE.to_string(),
                creator: actor.id().to_string(),
                editor: actor.id().to_string(),
                creator_name: actor.name().to_string(),
                editor_name: actor.name().to_string(),
                begin: stamp.utc().to_string(),
                last_modified: stamp.utc().to_string(),
            },
        }
    }

    /// Set explicit geometry.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the node type tag.
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.data.node_type = node_type.into();
        self
    }
}
