//! In-process session with no transport behind it
//!
//! Serves tests and dry runs through the same contract the real session
//! implements, including the transactional grouping: every committed batch is
//! recorded so callers can assert how mutations were grouped.

use super::{DocumentSession, MapName, ReplicaError, WriteBatch, WriteOp};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemorySession {
    nodes: BTreeMap<String, Value>,
    edges: BTreeMap<String, Value>,
    committed: Vec<WriteBatch>,
    flushes: usize,
    closed: bool,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a mapping, as if another client had written earlier.
    pub fn with_entry(mut self, map: MapName, key: impl Into<String>, value: Value) -> Self {
        self.map_mut(map).insert(key.into(), value);
        self
    }

    /// Batches committed so far, in commit order.
    pub fn committed(&self) -> &[WriteBatch] {
        &self.committed
    }

    /// Number of flushes observed.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn map(&self, map: MapName) -> &BTreeMap<String, Value> {
        match map {
            MapName::Nodes => &self.nodes,
            MapName::Edges => &self.edges,
        }
    }

    fn map_mut(&mut self, map: MapName) -> &mut BTreeMap<String, Value> {
        match map {
            MapName::Nodes => &mut self.nodes,
            MapName::Edges => &mut self.edges,
        }
    }

    fn ensure_open(&self) -> Result<(), ReplicaError> {
        if self.closed {
            return Err(ReplicaError::ConnectionClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentSession for MemorySession {
    async fn keys(&mut self, map: MapName) -> Result<Vec<String>, ReplicaError> {
        self.ensure_open()?;
        Ok(self.map(map).keys().cloned().collect())
    }

    async fn commit(&mut self, batch: WriteBatch) -> Result<(), ReplicaError> {
        self.ensure_open()?;
        for op in batch.ops() {
            match op {
                WriteOp::Insert { map, key, value } => {
                    self.map_mut(*map).insert(key.clone(), value.clone());
                }
                WriteOp::Remove { map, key } => {
                    self.map_mut(*map).remove(key);
                }
            }
        }
        self.committed.push(batch);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ReplicaError> {
        self.ensure_open()?;
        self.flushes += 1;
        Ok(())
    }

    async fn snapshot(&mut self, map: MapName) -> Result<BTreeMap<String, Value>, ReplicaError> {
        self.ensure_open()?;
        Ok(self.map(map).clone())
    }

    async fn close(&mut self) -> Result<(), ReplicaError> {
        self.closed = true;
        Ok(())
    }
}
