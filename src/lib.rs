//! Collabgraph: push graph snapshots into live collaborative rooms
//!
//! Takes a graph described by a static JSON file and replaces the contents of
//! a shared, replicated graph document that other clients may be viewing or
//! editing at the same time.
//!
//! # Pipeline
//!
//! - **convert**: map an analysis export (`nodeList`/`linkList`) onto the
//!   canonical source shape (`nodes`/`links`)
//! - **graph**: generate node/edge records with actor identity and
//!   timestamps stamped on
//! - **sync**: replace the room's graph over a replication session, as one
//!   clear transaction followed by one fill transaction, then read back
//!
//! The replicated document itself is external: merge semantics and wire
//! encoding belong to the engine behind [`replica::DocumentSession`].
//!
//! # Example
//!
//! ```
//! use collabgraph::{ActorIdentity, GraphNode};
//!
//! let actor = ActorIdentity::new("LLM", "LLM");
//! let node = GraphNode::generate("n1", "Background", 250.0, 100.0, &actor);
//! assert_eq!(node.data.creator, "graphCollab:LLM");
//! ```

pub mod convert;
pub mod graph;
pub mod replica;
pub mod sync;

pub use convert::{convert_document, convert_file, parse_coordinates, ConvertError};
pub use graph::{
    ActorIdentity, GraphEdge, GraphNode, GraphSource, LinkInput, NodeInput, SourceError,
};
pub use replica::{
    DocumentSession, MapName, MemorySession, ReplicaError, SessionConfig, WebsocketSession,
    WriteBatch, WriteOp,
};
pub use sync::{
    push_graph, run_replace, EndpointError, RoomEndpoint, SyncClient, SyncError, SyncOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
