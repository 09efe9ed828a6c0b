//! The name resolver (spec.md §3 "Name resolver state", §4.2).

use crate::base::Name;
use crate::symbols::{AssociatedRef, Symbol, SymbolKind};
use crate::typestr::ClassNameResolver;

/// Tags the three name-phrase shapes `namePhraseToFqn` dispatches on
/// (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePhraseKind {
    FullyQualified,
    Qualified,
    RelativeQualified,
}

/// Per-document name-resolution state (spec.md §3). Mutated only by the
/// symbol reader as it enters namespace/use/class constructs; constructed
/// fresh, or queried as-is, for any other lookup.
#[derive(Debug, Clone, Default)]
pub struct ResolverState {
    pub namespace_name: String,
    pub this_name: String,
    pub this_base_name: String,
    pub imported_symbols: Vec<Symbol>,
}

impl ResolverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// spec.md §4.2 `resolveRelative`.
    pub fn resolve_relative(&self, n: &str) -> String {
        if n.is_empty() {
            return String::new();
        }
        if !self.namespace_name.is_empty() {
            format!("{}\\{}", self.namespace_name, n)
        } else {
            n.to_string()
        }
    }

    /// spec.md §4.2 `resolveNotFullyQualified`.
    pub fn resolve_not_fully_qualified(&self, n: &str, kind: SymbolKind) -> String {
        if n.is_empty() {
            return String::new();
        }
        if n == "self" || n == "static" {
            return self.this_name.clone();
        }
        if n == "parent" {
            return self.this_base_name.clone();
        }
        if let Some(backslash) = n.find('\\') {
            let prefix = &n[..backslash];
            let rest = &n[backslash..];
            if let Some(entry) = self.find_import(SymbolKind::Class, prefix) {
                return format!("{}{}", entry, rest);
            }
            return self.resolve_relative(n);
        }
        if let Some(entry) = self.find_import(kind, n) {
            return entry;
        }
        self.resolve_relative(n)
    }

    fn find_import(&self, kind: SymbolKind, alias: &str) -> Option<String> {
        self.imported_symbols
            .iter()
            .find(|s| s.kind == kind && s.name.as_str() == alias)
            .and_then(|s| s.associated.first())
            .map(|r| r.name.as_str().to_string())
    }

    /// spec.md §4.2 `namePhraseToFqn`.
    pub fn name_phrase_to_fqn(&self, text: &str, phrase_kind: NamePhraseKind, kind: SymbolKind) -> String {
        match phrase_kind {
            NamePhraseKind::FullyQualified => text.to_string(),
            NamePhraseKind::Qualified => self.resolve_not_fully_qualified(text, kind),
            NamePhraseKind::RelativeQualified => self.resolve_relative(text),
        }
    }

    /// Append a `use` import (spec.md §4.3 "Use declaration / use clause").
    /// `local_alias` is the visible name (explicit alias, or the FQN's last
    /// segment); `fqn` is the fully qualified import target.
    pub fn add_import(&mut self, kind: SymbolKind, local_alias: impl Into<Name>, fqn: impl Into<Name>) {
        let mut entry = Symbol::new(kind, local_alias);
        entry.associated.push(AssociatedRef::new(SymbolKind::Class, fqn));
        self.imported_symbols.push(entry);
    }
}

impl ClassNameResolver for ResolverState {
    fn this_name(&self) -> &str {
        &self.this_name
    }

    fn resolve_class_name(&self, name: &str) -> String {
        self.resolve_not_fully_qualified(name, SymbolKind::Class)
    }
}
