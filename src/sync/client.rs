//! The replace protocol: clear, fill, read back

use super::{RoomEndpoint, SyncError};
use crate::graph::{ActorIdentity, GraphEdge, GraphNode, GraphSource};
use crate::replica::{
    DocumentSession, MapName, ReplicaError, SessionConfig, WebsocketSession, WriteBatch,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// What a completed replacement left in the room.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Final contents of the nodes mapping
    pub nodes: BTreeMap<String, Value>,
    /// Final contents of the edges mapping
    pub edges: BTreeMap<String, Value>,
    /// Entries removed by the clear transaction
    pub cleared: usize,
    /// Duplicate source ids dropped before the fill; last occurrence wins
    pub duplicates_dropped: usize,
}

/// Drives a full graph replacement against one open session.
///
/// The clear and the fill are two separate transactions: concurrent viewers
/// may observe an empty graph between them. That window is part of the
/// protocol's contract.
pub struct SyncClient {
    actor: ActorIdentity,
}

impl SyncClient {
    pub fn new(actor: ActorIdentity) -> Self {
        Self { actor }
    }

    /// Replace the room's graph with `source`, then read the result back.
    ///
    /// Does not close the session; callers own the close-on-every-exit-path
    /// obligation (see [`run_replace`]).
    pub async fn replace<S: DocumentSession>(
        &self,
        session: &mut S,
        source: &GraphSource,
    ) -> Result<SyncOutcome, ReplicaError> {
        let cleared = self.clear(session).await?;
        let duplicates_dropped = self.fill(session, source).await?;
        let nodes = session.snapshot(MapName::Nodes).await?;
        let edges = session.snapshot(MapName::Edges).await?;
        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            cleared,
            "replacement complete"
        );
        Ok(SyncOutcome {
            nodes,
            edges,
            cleared,
            duplicates_dropped,
        })
    }

    /// Clear phase: remove every existing key from both mappings in one
    /// transaction. Clearing an already-empty room commits an empty batch
    /// and succeeds.
    async fn clear<S: DocumentSession>(&self, session: &mut S) -> Result<usize, ReplicaError> {
        let mut batch = WriteBatch::new();
        for map in [MapName::Nodes, MapName::Edges] {
            for key in session.keys(map).await? {
                batch.remove(map, key);
            }
        }
        let cleared = batch.len();
        tracing::debug!(cleared, "clearing existing graph");
        session.commit(batch).await?;
        session.flush().await?;
        Ok(cleared)
    }

    /// Fill phase: generate a record for every source entry and insert them
    /// all in one transaction, in source order, nodes and edges together.
    async fn fill<S: DocumentSession>(
        &self,
        session: &mut S,
        source: &GraphSource,
    ) -> Result<usize, ReplicaError> {
        let (nodes, dropped_nodes) = dedupe_last_wins(&source.nodes, |n| n.id.as_str());
        let (links, dropped_links) = dedupe_last_wins(&source.links, |l| l.id.as_str());
        let dropped = dropped_nodes + dropped_links;
        if dropped > 0 {
            tracing::warn!(dropped, "duplicate source ids; keeping last occurrence of each");
        }

        let mut batch = WriteBatch::new();
        for input in nodes {
            let record = GraphNode::generate(
                input.id.as_str(),
                input.label.as_str(),
                input.position_x,
                input.position_y,
                &self.actor,
            )
            .with_size(input.width as f64, input.height as f64)
            .with_node_type(input.node_type.as_str());
            batch.insert(MapName::Nodes, input.id.as_str(), to_record_value(&record)?);
        }
        for input in links {
            let record = GraphEdge::generate(
                input.id.as_str(),
                input.link_type.as_str(),
                input.source.as_str(),
                input.target.as_str(),
                &self.actor,
            );
            batch.insert(MapName::Edges, input.id.as_str(), to_record_value(&record)?);
        }
        tracing::debug!(records = batch.len(), "filling graph");
        session.commit(batch).await?;
        session.flush().await?;
        Ok(dropped)
    }
}

/// Run a replacement against an already-open session, closing it on every
/// exit path. A replacement error takes precedence over a close error.
pub async fn run_replace<S: DocumentSession>(
    mut session: S,
    actor: ActorIdentity,
    source: &GraphSource,
) -> Result<SyncOutcome, ReplicaError> {
    let client = SyncClient::new(actor);
    let result = client.replace(&mut session, source).await;
    let closed = session.close().await;
    let outcome = result?;
    closed?;
    Ok(outcome)
}

/// Connect to the room and replace its graph with `source`.
pub async fn push_graph(
    endpoint: &RoomEndpoint,
    actor: ActorIdentity,
    source: &GraphSource,
    config: SessionConfig,
) -> Result<SyncOutcome, SyncError> {
    tracing::info!(room = %endpoint.room_id, url = %endpoint.url(), "connecting");
    let session = WebsocketSession::connect(&endpoint.url(), config).await?;
    tracing::info!(
        nodes = source.nodes.len(),
        links = source.links.len(),
        "connected; replacing graph"
    );
    Ok(run_replace(session, actor, source).await?)
}

/// Keep only the last occurrence of every id, preserving list order.
fn dedupe_last_wins<'a, T>(items: &'a [T], id_of: impl Fn(&T) -> &str) -> (Vec<&'a T>, usize) {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        last_index.insert(id_of(item), index);
    }
    let kept: Vec<&T> = items
        .iter()
        .enumerate()
        .filter(|&(index, item)| last_index[id_of(item)] == index)
        .map(|(_, item)| item)
        .collect();
    let dropped = items.len() - kept.len();
    (kept, dropped)
}

fn to_record_value<T: Serialize>(record: &T) -> Result<Value, ReplicaError> {
    serde_json::to_value(record).map_err(|e| ReplicaError::Codec(e.to_string()))
}
