//! Canonical graph source files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading or writing source files.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal node description consumed by the record generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInput {
    pub id: String,
    pub width: i64,
    pub height: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub label: String,
    #[serde(rename = "nodeType")]
    pub node_type: String,
}

/// Minimal link description consumed by the record generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInput {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "linkType")]
    pub link_type: String,
}

/// A whole graph description: the interchange shape between the schema
/// converter, the record generator, and the sync client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSource {
    pub nodes: Vec<NodeInput>,
    pub links: Vec<LinkInput>,
}

impl GraphSource {
    /// Load a canonical source file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write a pretty-printed canonical source file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }

    /// Total number of records (nodes plus links).
    pub fn len(&self) -> usize {
        self.nodes.len() + self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}
