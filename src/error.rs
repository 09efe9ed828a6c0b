//! Crate-wide fatal error type (spec.md §7).
//!
//! Every other error kind spec.md §7 names (`MissingParent`/`OrphanPhrase`,
//! `MalformedTypeString`, `CyclicInheritance`, `UnknownName`) is explicitly
//! non-fatal by spec — "no exception is raised" — and is represented at
//! the call site as an empty/`Option::None` value, never as a variant
//! here. Following `interchange::error::InterchangeError`, the only other
//! `thiserror` usage in the teacher repo.

use crate::base::DocumentUri;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("a symbol table for {0} already exists in the store")]
    DuplicateUri(DocumentUri),
}
