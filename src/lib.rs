//! # symcore
//!
//! Symbol resolution and flow-sensitive type inference core for a dynamic,
//! class-based scripting language server: name resolution, a symbol tree
//! model and single-traversal reader, a multi-key fuzzy symbol index, a
//! cross-document symbol store with inheritance-aware member lookup, and
//! variable-type inference over control flow.
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! flow      → variable-type resolver traversal driver
//!   ↓
//! exprtype  → expression type resolver
//!   ↓
//! vartable  → variable table (scope/branch stack)
//!   ↓
//! store     → cross-document symbol store
//!   ↓
//! index     → multi-key symbol index
//!   ↓
//! resolve   → name resolver
//!   ↓
//! symbols   → symbol tree model + reader
//!   ↓
//! typestr   → type-string algebra
//!   ↓
//! base      → primitives (DocumentUri, Position/Span, Name interning)
//! ```

/// Foundation types: DocumentUri, Position/Span, Name interning.
pub mod base;

/// The type-string algebra: parsing, merging, dereferencing, name resolution.
pub mod typestr;

/// Per-document name resolution state.
pub mod resolve;

/// The symbol tree model and the single-traversal reader that builds it.
pub mod symbols;

/// The multi-key, fuzzy-rankable symbol index.
pub mod index;

/// The cross-document symbol store with inheritance-aware member lookup.
pub mod store;

/// The variable table (scope/branch stack driving type inference).
pub mod vartable;

/// The expression type resolver.
pub mod exprtype;

/// The variable-type resolver traversal driver.
pub mod flow;

/// The crate-wide fatal error type.
pub mod error;

pub use base::{DocumentUri, Name, Position, Span};
pub use error::CoreError;
pub use store::{SharedSymbolStore, SymbolStore, SymbolTable};
pub use symbols::{ReaderOptions, Symbol, SymbolKind, SymbolReader};
pub use typestr::TypeString;
