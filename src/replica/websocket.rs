//! WebSocket-backed session: a local replica synced to a remote room
//!
//! A fresh local document is bound to the room's endpoint and mirrored
//! through the engine's sync protocol, carried as binary frames. What to
//! send and how to merge is the engine's decision; this module only pumps
//! messages and watches for the synced condition. `flush` waits for that
//! condition instead of sleeping for a fixed pacing interval: the peer's
//! advertised heads are all present locally and the peer has confirmed every
//! local head.

use super::codec::{doc_err, read_entry, write_entry};
use super::{DocumentSession, MapName, ReplicaError, WriteBatch, WriteOp};
use async_trait::async_trait;
use automerge::sync::{Message as SyncMessage, State as SyncState, SyncDoc};
use automerge::transaction::Transactable;
use automerge::{Automerge, ObjId, ObjType, ReadDoc, ROOT};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Tuning for the sync wait loop.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Overall bound on one sync wait; expiry surfaces as `SyncTimeout`.
    pub sync_timeout: Duration,
    /// How long to sit on an idle socket before re-checking the sync state.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sync_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A session against one room, backed by a fresh local replica.
#[derive(Debug)]
pub struct WebsocketSession {
    stream: WsStream,
    doc: Automerge,
    sync_state: SyncState,
    nodes: ObjId,
    edges: ObjId,
    config: SessionConfig,
    closed: bool,
}

impl WebsocketSession {
    /// Connect to a room endpoint and mirror its current state.
    ///
    /// Runs the initial sync exchange, then resolves the `nodes`/`edges`
    /// mappings, creating them when the room is brand new. A transport
    /// failure here is fatal to the run; there is no retry.
    pub async fn connect(url: &str, config: SessionConfig) -> Result<Self, ReplicaError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| ReplicaError::Connect(e.to_string()))?;
        tracing::debug!(url, "websocket established");

        let mut session = Self {
            stream,
            doc: Automerge::new(),
            sync_state: SyncState::new(),
            nodes: ROOT,
            edges: ROOT,
            config,
            closed: false,
        };

        // Mirror whatever the room already holds before touching it.
        session.pump_until_synced().await?;
        session.nodes = session.ensure_map(MapName::Nodes)?;
        session.edges = session.ensure_map(MapName::Edges)?;
        Ok(session)
    }

    fn mapping(&self, map: MapName) -> &ObjId {
        match map {
            MapName::Nodes => &self.nodes,
            MapName::Edges => &self.edges,
        }
    }

    /// Resolve a named mapping, creating it when absent.
    ///
    /// Prefers an object the room already has, so a rejoining client writes
    /// into the same mapping earlier clients created.
    fn ensure_map(&mut self, map: MapName) -> Result<ObjId, ReplicaError> {
        match self.doc.get(ROOT, map.as_str()).map_err(doc_err)? {
            Some((automerge::Value::Object(ObjType::Map), id)) => return Ok(id),
            Some(_) => {
                return Err(ReplicaError::Document(format!(
                    "room key '{map}' is not a map"
                )))
            }
            None => {}
        }
        let mut tx = self.doc.transaction();
        tx.put_object(ROOT, map.as_str(), ObjType::Map)
            .map_err(doc_err)?;
        tx.commit();
        // The id handed out inside the transaction goes stale on commit.
        match self.doc.get(ROOT, map.as_str()).map_err(doc_err)? {
            Some((_, id)) => Ok(id),
            None => Err(ReplicaError::Document(format!(
                "failed to create '{map}' mapping"
            ))),
        }
    }

    /// Exchange sync messages until local and remote agree, bounded by
    /// `config.sync_timeout`.
    async fn pump_until_synced(&mut self) -> Result<(), ReplicaError> {
        // A timeout too large to land on a representable deadline never expires.
        let deadline = Instant::now().checked_add(self.config.sync_timeout);
        loop {
            self.send_pending().await?;
            if synced(&self.doc, &self.sync_state) {
                return Ok(());
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(ReplicaError::SyncTimeout);
            }
            match timeout(self.config.poll_interval, self.stream.next()).await {
                Ok(Some(Ok(Message::Binary(bytes)))) => self.receive(&bytes)?,
                Ok(Some(Ok(Message::Close(_)))) => return Err(ReplicaError::ConnectionClosed),
                // Ping/pong/text frames carry no sync payload
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(e))) => return Err(ReplicaError::Transport(e.to_string())),
                Ok(None) => return Err(ReplicaError::ConnectionClosed),
                // Idle socket; loop to re-check state and deadline
                Err(_) => {}
            }
        }
    }

    async fn send_pending(&mut self) -> Result<(), ReplicaError> {
        while let Some(message) = self.doc.generate_sync_message(&mut self.sync_state) {
            self.stream
                .send(Message::Binary(message.encode().into()))
                .await
                .map_err(|e| ReplicaError::Transport(e.to_string()))?;
        }
        Ok(())
    }

    fn receive(&mut self, bytes: &[u8]) -> Result<(), ReplicaError> {
        let message =
            SyncMessage::decode(bytes).map_err(|e| ReplicaError::Protocol(e.to_string()))?;
        self.doc
            .receive_sync_message(&mut self.sync_state, message)
            .map_err(doc_err)?;
        Ok(())
    }
}

/// Local and remote agree: every head the peer advertises is present here,
/// and every local head is confirmed shared.
fn synced(doc: &Automerge, state: &SyncState) -> bool {
    let Some(their_heads) = state.their_heads.as_ref() else {
        return false;
    };
    let pulled = their_heads
        .iter()
        .all(|hash| doc.get_change_by_hash(hash).is_some());
    let pushed = doc
        .get_heads()
        .iter()
        .all(|hash| state.shared_heads.contains(hash));
    pulled && pushed
}

#[async_trait]
impl DocumentSession for WebsocketSession {
    async fn keys(&mut self, map: MapName) -> Result<Vec<String>, ReplicaError> {
        let obj = self.mapping(map).clone();
        Ok(self.doc.keys(&obj).collect())
    }

    async fn commit(&mut self, batch: WriteBatch) -> Result<(), ReplicaError> {
        if batch.is_empty() {
            return Ok(());
        }
        let nodes = self.nodes.clone();
        let edges = self.edges.clone();
        let mut tx = self.doc.transaction();
        for op in batch.ops() {
            let obj = match op.map() {
                MapName::Nodes => &nodes,
                MapName::Edges => &edges,
            };
            match op {
                WriteOp::Insert { key, value, .. } => write_entry(&mut tx, obj, key, value)?,
                WriteOp::Remove { key, .. } => {
                    // Removing an absent key must stay a no-op
                    if tx.get(obj, key.as_str()).map_err(doc_err)?.is_some() {
                        tx.delete(obj, key.as_str()).map_err(doc_err)?;
                    }
                }
            }
        }
        tx.commit();
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ReplicaError> {
        self.pump_until_synced().await
    }

    async fn snapshot(&mut self, map: MapName) -> Result<BTreeMap<String, Value>, ReplicaError> {
        let obj = self.mapping(map).clone();
        let keys: Vec<String> = self.doc.keys(&obj).collect();
        let mut out = BTreeMap::new();
        for key in keys {
            let value = read_entry(&self.doc, &obj, &key)?;
            out.insert(key, value);
        }
        Ok(out)
    }

    async fn close(&mut self) -> Result<(), ReplicaError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let _ = self.stream.close(None).await;
        tracing::debug!("websocket closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pump two local replicas against each other until neither has anything
    // left to say.
    fn exchange(a: &mut Automerge, sa: &mut SyncState, b: &mut Automerge, sb: &mut SyncState) {
        loop {
            let mut progressed = false;
            if let Some(m) = a.generate_sync_message(sa) {
                let wire = SyncMessage::decode(&m.encode()).unwrap();
                b.receive_sync_message(sb, wire).unwrap();
                progressed = true;
            }
            if let Some(m) = b.generate_sync_message(sb) {
                let wire = SyncMessage::decode(&m.encode()).unwrap();
                a.receive_sync_message(sa, wire).unwrap();
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
    }

    #[test]
    fn synced_is_false_before_any_exchange() {
        let doc = Automerge::new();
        let state = SyncState::new();
        assert!(!synced(&doc, &state));
    }

    #[test]
    fn synced_flips_after_full_exchange() {
        let mut a = Automerge::new();
        {
            let mut tx = a.transaction();
            tx.put_object(ROOT, "nodes", ObjType::Map).unwrap();
            tx.commit();
        }
        let mut b = Automerge::new();
        let mut sa = SyncState::new();
        let mut sb = SyncState::new();

        exchange(&mut a, &mut sa, &mut b, &mut sb);

        assert!(synced(&a, &sa));
        assert!(synced(&b, &sb));
        assert!(b.get(ROOT, "nodes").unwrap().is_some());
    }

    #[test]
    fn new_local_change_breaks_the_synced_condition() {
        let mut a = Automerge::new();
        let mut b = Automerge::new();
        let mut sa = SyncState::new();
        let mut sb = SyncState::new();
        exchange(&mut a, &mut sa, &mut b, &mut sb);
        assert!(synced(&a, &sa));

        let mut tx = a.transaction();
        tx.put(ROOT, "k", "v").unwrap();
        tx.commit();
        assert!(!synced(&a, &sa));

        exchange(&mut a, &mut sa, &mut b, &mut sb);
        assert!(synced(&a, &sa));
    }

    #[test]
    fn default_config_bounds_the_wait() {
        let config = SessionConfig::default();
        assert_eq!(config.sync_timeout, Duration::from_secs(30));
        assert!(config.poll_interval < config.sync_timeout);
    }
}
