//! Actor identity stamped onto generated records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace prefix for actor ids in the shared document.
const ACTOR_NAMESPACE: &str = "graphCollab";

/// Suffix length used when no explicit suffix is supplied.
const RANDOM_SUFFIX_LEN: usize = 10;

/// The editor/creator identity stamped onto generated records.
///
/// Records carry a single actor: `creator` and `editor` are identical at
/// creation time. The id is always namespaced as `graphCollab:<suffix>`.
/// Identity is passed explicitly through the call chain rather than held in
/// process-wide state, so multiple actors can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    name: String,
    id: String,
}

impl ActorIdentity {
    /// Create an identity with an explicit suffix.
    ///
    /// An empty suffix falls back to a random hex suffix, so anonymous runs
    /// never collide on actor id.
    pub fn new(name: impl Into<String>, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Self::with_random_suffix(name);
        }
        Self {
            name: name.into(),
            id: format!("{}:{}", ACTOR_NAMESPACE, suffix),
        }
    }

    /// Create an identity with a freshly generated random suffix.
    pub fn with_random_suffix(name: impl Into<String>) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self {
            name: name.into(),
            id: format!("{}:{}", ACTOR_NAMESPACE, &hex[..RANDOM_SUFFIX_LEN]),
        }
    }

    /// Display name, written to `creatorName`/`editorName`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespaced actor id, written to `creator`/`editor`.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
