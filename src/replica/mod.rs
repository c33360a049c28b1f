//! Replication boundary: the session contract and its implementations
//!
//! [`DocumentSession`] is the whole surface this crate asks of the external
//! replication engine. [`WebsocketSession`] backs it with a live room over a
//! WebSocket transport; [`MemorySession`] backs it with plain maps for tests
//! and dry runs.

mod codec;
mod memory;
mod traits;
mod websocket;

pub use memory::MemorySession;
pub use traits::{DocumentSession, MapName, ReplicaError, WriteBatch, WriteOp};
pub use websocket::{SessionConfig, WebsocketSession};
