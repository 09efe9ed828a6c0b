//! Foundation types shared by every other module.
//!
//! - [`DocumentUri`] — identifies a parsed document
//! - [`Position`], [`Span`] — source locations handed in by the parsed-document interface
//! - [`Name`], [`Interner`] — string interning for symbol/variable names
//!
//! This module has no dependency on the rest of the crate.

mod intern;
mod position;
mod uri;

pub use intern::{Interner, Name};
pub use position::{Position, Span};
pub use uri::DocumentUri;
