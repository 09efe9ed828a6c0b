//! Symbol model and the single-traversal reader that builds it (spec.md §3, §4.3).

mod reader;
mod symbol;
mod visitor;

pub use reader::{ReaderOptions, SymbolReader};
pub use symbol::{AssociatedRef, Modifiers, PreOrderIter, Symbol, SymbolKind, TypeSource};
pub use visitor::{
    DocComment, DocCommentParser, DocTag, MethodTag, ParsedDocument, Phrase, PhraseId, PhraseKind, SyntaxDocument,
    TokenKind, Visitor,
};
