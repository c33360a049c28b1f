//! Room endpoint derivation

use thiserror::Error;

/// Default collaboration server host.
pub const DEFAULT_WS_HOST: &str = "localhost";
/// Default collaboration server port.
pub const DEFAULT_WS_PORT: u16 = 1234;

/// Path prefix rooms live under on the collaboration server.
const ROOM_PATH_PREFIX: &str = "graph-collab-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The URL has no non-empty final path segment to use as a room id.
    #[error("no room id found in URL: {0}")]
    InvalidRoomId(String),
}

/// Extract the room id from a share URL: its final path segment.
///
/// Query string and fragment are ignored. A URL whose path is empty or ends
/// in `/` has no room id.
pub fn extract_room_id(url: &str) -> Result<String, EndpointError> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    // With a scheme present, the first path segment starts after the
    // authority; without one, the whole string is the path.
    let path = match trimmed.find("://") {
        Some(scheme_end) => {
            let rest = &trimmed[scheme_end + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "",
            }
        }
        None => trimmed,
    };
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Ok(segment.to_string()),
        _ => Err(EndpointError::InvalidRoomId(url.to_string())),
    }
}

/// A fully derived room endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEndpoint {
    pub host: String,
    pub port: u16,
    pub room_id: String,
}

impl RoomEndpoint {
    /// Derive an endpoint from a share URL plus transport host and port.
    pub fn from_url(url: &str, host: impl Into<String>, port: u16) -> Result<Self, EndpointError> {
        Ok(Self {
            host: host.into(),
            port,
            room_id: extract_room_id(url)?,
        })
    }

    /// The WebSocket URL this room is served at.
    pub fn url(&self) -> String {
        format!(
            "ws://{}:{}/{}{}",
            self.host, self.port, ROOM_PATH_PREFIX, self.room_id
        )
    }
}

impl std::fmt::Display for RoomEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}
