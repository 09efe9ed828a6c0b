//! Source positions and ranges for AST nodes.
//!
//! Stores the source location (line/character) of AST nodes for the
//! host's hover, go-to-definition, and diagnostic-free LSP features.
//! These are the `{start:{line,character}, end:{line,character}}` shapes
//! the consumed parsed-document interface hands the core (spec.md §6).

/// A position in source code (0-indexed line, UTF-16-code-unit character
/// offset, matching the LSP `Position` shape a host's parsed document
/// must already expose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Check if a position falls within this span.
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.character < self.start.character {
            return false;
        }
        if position.line == self.end.line && position.character > self.end.character {
            return false;
        }
        true
    }
}
