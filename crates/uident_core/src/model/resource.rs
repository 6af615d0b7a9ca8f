//! Opaque resource descriptor stored against each registered identifier.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque payload describing what a UID resolves to.
///
/// External collaborators (documentation generators, AST tools, access-control
/// layers) put a file path, symbol location or documentation pointer here; the
/// core stores and returns it unchanged and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDescriptor(String);

impl ResourceDescriptor {
    /// Creates a descriptor from any payload text.
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Returns the payload as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceDescriptor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceDescriptor {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
