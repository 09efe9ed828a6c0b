//! Document identity.

use std::sync::Arc;

/// Identifies a parsed document by its host-assigned URI (spec.md §3, §6).
///
/// A thin `Arc<str>` wrapper rather than a numeric id: the store is keyed
/// directly by URI (spec.md §4.5) and the spec names no separate interning
/// table for document identity the way it does for symbol/variable names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri(Arc<str>);

impl DocumentUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(s: &str) -> Self {
        DocumentUri(Arc::from(s))
    }
}

impl From<String> for DocumentUri {
    fn from(s: String) -> Self {
        DocumentUri(Arc::from(s.as_str()))
    }
}

impl std::borrow::Borrow<str> for DocumentUri {
    fn borrow(&self) -> &str {
        &self.0
    }
}
