//! Session contract with the external replication engine
//!
//! The engine owns the shared document: merge semantics, operation-log
//! encoding, and peer bookkeeping are its concern. This crate only reads
//! named mappings and applies transactional write batches through this trait.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// The two named mappings every graph room document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapName {
    Nodes,
    Edges,
}

impl MapName {
    /// Key of the mapping inside the shared document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
        }
    }
}

impl std::fmt::Display for MapName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mutation inside a write batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert or overwrite `key` in `map`
    Insert {
        map: MapName,
        key: String,
        value: Value,
    },
    /// Remove `key` from `map`; removing an absent key is a no-op
    Remove { map: MapName, key: String },
}

impl WriteOp {
    /// Which mapping this operation touches.
    pub fn map(&self) -> MapName {
        match self {
            Self::Insert { map, .. } | Self::Remove { map, .. } => *map,
        }
    }
}

/// An ordered group of mutations applied as one replicated transaction.
///
/// Observers never see a batch partially applied: the engine propagates the
/// whole batch as a single unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an insert (or overwrite) of `key` in `map`.
    pub fn insert(&mut self, map: MapName, key: impl Into<String>, value: Value) {
        self.ops.push(WriteOp::Insert {
            map,
            key: key.into(),
            value,
        });
    }

    /// Queue a removal of `key` from `map`.
    pub fn remove(&mut self, map: MapName, key: impl Into<String>) {
        self.ops.push(WriteOp::Remove {
            map,
            key: key.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The queued operations, in application order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }
}

/// Errors from the replication boundary.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// The transport could not be established; fatal, no retry.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The peer did not reach the synced condition within the configured window.
    #[error("timed out waiting for replication sync")]
    SyncTimeout,

    /// The peer sent bytes that do not decode as a sync message.
    #[error("sync protocol error: {0}")]
    Protocol(String),

    /// The underlying document engine rejected an operation.
    #[error("document error: {0}")]
    Document(String),

    /// A record could not be converted to or from document form.
    #[error("record codec error: {0}")]
    Codec(String),
}

/// One open session against a shared room document.
///
/// `commit` applies a whole batch as a single transaction; `flush` blocks
/// until the local replica and the peer agree on the result, replacing fixed
/// pacing delays. Every exit path of a driver must end in `close`.
#[async_trait]
pub trait DocumentSession: Send {
    /// Keys currently present in a mapping, as seen by the local replica.
    async fn keys(&mut self, map: MapName) -> Result<Vec<String>, ReplicaError>;

    /// Apply a batch of mutations as one transaction.
    ///
    /// An empty batch commits nothing and succeeds.
    async fn commit(&mut self, batch: WriteBatch) -> Result<(), ReplicaError>;

    /// Wait until local and remote state agree.
    async fn flush(&mut self) -> Result<(), ReplicaError>;

    /// Snapshot a mapping into plain key-to-record JSON.
    async fn snapshot(&mut self, map: MapName) -> Result<BTreeMap<String, Value>, ReplicaError>;

    /// Release the transport. Idempotent.
    async fn close(&mut self) -> Result<(), ReplicaError>;
}
