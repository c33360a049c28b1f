//! Canonical graph records and their generation

mod actor;
mod edge;
mod node;
mod source;
mod stamp;

pub use actor::ActorIdentity;
pub use edge::{EdgeData, GraphEdge, MarkerEnd};
pub use node::{GraphNode, NodeData, Position, RecordKind};
pub use node::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_TYPE, DEFAULT_NODE_WIDTH};
pub use source::{GraphSource, LinkInput, NodeInput, SourceError};
pub use stamp::Stamp;
