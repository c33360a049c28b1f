//! Schema conversion from analysis documents to the canonical source shape

mod analysis;
mod coordinate;

pub use analysis::{convert_document, convert_file};
pub use coordinate::{parse_coordinates, CoordinateError};

use crate::graph::SourceError;
use thiserror::Error;

/// Which record list a conversion error points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordList {
    Node,
    Link,
}

impl std::fmt::Display for RecordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Link => f.write_str("link"),
        }
    }
}

/// Errors from schema conversion.
///
/// Any error aborts the whole conversion; there is no partial output.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{record} record {index}: missing required key '{key}'")]
    MissingField {
        record: RecordList,
        index: usize,
        key: &'static str,
    },

    #[error("node record {index}: malformed coordinate '{value}'")]
    MalformedCoordinate { index: usize, value: String },

    #[error("{record} record {index}: invalid value for '{key}'")]
    InvalidValue {
        record: RecordList,
        index: usize,
        key: &'static str,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}
