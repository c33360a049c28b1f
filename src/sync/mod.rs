//! Full graph replacement against a live collaborative room
//!
//! The protocol: connect and mirror the room, clear both mappings in one
//! transaction, fill them from the source in a second transaction, read the
//! result back, disconnect. The clear-to-fill gap is visible to concurrent
//! clients; writers racing into it are not defended against.

mod client;
mod endpoint;

pub use client::{push_graph, run_replace, SyncClient, SyncOutcome};
pub use endpoint::{
    extract_room_id, EndpointError, RoomEndpoint, DEFAULT_WS_HOST, DEFAULT_WS_PORT,
};

use crate::graph::SourceError;
use crate::replica::ReplicaError;
use thiserror::Error;

/// Top-level errors from the push pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Replica(#[from] ReplicaError),
}
