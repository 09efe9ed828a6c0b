//! The symbol store (spec.md §3, §4.5).

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base::DocumentUri;
use crate::error::CoreError;
use crate::index::SymbolIndex;
use crate::symbols::{Symbol, SymbolKind};

/// A single document's symbol tree (spec.md §4.5 "holding a root Symbol
/// and an iteration/count view").
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub uri: DocumentUri,
    pub root: Symbol,
}

impl SymbolTable {
    pub fn new(uri: DocumentUri, root: Symbol) -> Self {
        Self { uri, root }
    }

    pub fn symbol_count(&self) -> usize {
        self.root.iter_pre_order().count()
    }

    /// Read-only pre-order enumeration of this table's symbols (spec.md
    /// §5 "Iteration over a symbol tree is pre-order").
    pub fn iter_symbols(&self) -> crate::symbols::PreOrderIter<'_> {
        self.root.iter_pre_order()
    }

    /// Rehydrate a `createBuiltIn` JSON blob (spec.md §6): the same shape
    /// as a serialized `Symbol` tree, with `type` stored as plain strings,
    /// rewrapped into `TypeString`s by a post-order walk.
    #[cfg(feature = "serde-cache")]
    pub fn create_built_in(uri: DocumentUri, json: &str) -> Result<Self, serde_json::Error> {
        let raw: crate::store::cache::RawSymbol = serde_json::from_str(json)?;
        let root = crate::store::cache::rehydrate(raw);
        Ok(Self::new(uri, root))
    }
}

/// A symbol store wrapped for hosts that want to "tolerate interleaved
/// read queries with writes only when wrapped by an external lock"
/// (spec.md §5). The core never takes this lock internally.
pub type SharedSymbolStore = Arc<RwLock<SymbolStore>>;

/// Maps document URI to [`SymbolTable`] and maintains the shared
/// [`SymbolIndex`] over every table's indexable symbols (spec.md §4.5).
#[derive(Debug, Default)]
pub struct SymbolStore {
    tables: FxHashMap<DocumentUri, SymbolTable>,
    index: SymbolIndex,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols_by_file(&self, uri: &DocumentUri) -> Option<crate::symbols::PreOrderIter<'_>> {
        self.tables.get(uri).map(|t| t.iter_symbols())
    }

    /// spec.md §4.5 `add` — fails with `DuplicateUri` if a table for that
    /// URI already exists; indexes every indexable symbol reachable from
    /// `table.root`.
    pub fn add(&mut self, table: SymbolTable) -> Result<(), CoreError> {
        if self.tables.contains_key(&table.uri) {
            return Err(CoreError::DuplicateUri(table.uri.clone()));
        }
        debug!(uri = %table.uri, count = table.symbol_count(), "adding symbol table");
        for sym in table.root.iter_pre_order() {
            if sym.is_indexable() {
                self.index.insert(Arc::new(sym.clone()));
            }
        }
        self.tables.insert(table.uri.clone(), table);
        Ok(())
    }

    /// spec.md §4.5 `remove` — idempotent.
    pub fn remove(&mut self, uri: &DocumentUri) {
        debug!(uri = %uri, "removing symbol table");
        self.index.remove_where(|s| s.location.as_ref().map(|l| &l.0) == Some(uri));
        self.tables.remove(uri);
    }

    /// spec.md §4.5 `onParsedDocumentChange` — replaces the table for the
    /// event's URI by rebuilding from the updated parsed document. The
    /// caller has already re-run the reader; this just swaps the result
    /// in atomically from readers' point of view (spec.md §5).
    pub fn on_parsed_document_change(&mut self, new_table: SymbolTable) {
        self.remove(&new_table.uri.clone());
        self.add(new_table).expect("uri was just removed");
    }

    /// spec.md §4.5 `find` — exact-name match.
    pub fn find(&self, text: &str, filter: Option<&dyn Fn(&Symbol) -> bool>) -> Option<Arc<Symbol>> {
        self.index
            .match_query(text, false)
            .into_iter()
            .find(|s| s.name.as_str() == text && filter.map_or(true, |f| f(s)))
    }

    /// spec.md §4.5 `match` — index query, then optional post-filter.
    pub fn match_symbols(&self, text: &str, fuzzy: bool, filter: Option<&dyn Fn(&Symbol) -> bool>) -> Vec<Arc<Symbol>> {
        self.index
            .match_query(text, fuzzy)
            .into_iter()
            .filter(|s| filter.map_or(true, |f| f(s)))
            .collect()
    }

    fn find_exact_type(&self, fqn: &str) -> Option<Arc<Symbol>> {
        self.index
            .match_query(fqn, false)
            .into_iter()
            .find(|s| s.name.as_str() == fqn && matches!(s.kind, SymbolKind::Class | SymbolKind::Interface | SymbolKind::Trait))
    }

    /// spec.md §4.5 "Member lookup algorithm", cycle-protected via a
    /// visited-type-name set (spec.md §8 "Cycle-safe lookup").
    ///
    /// The associated-kind mask never includes `Interface` even when the
    /// starting type is an interface — preserved as-specified (spec.md §9
    /// open question): classes and traits are always searched.
    pub fn lookup_type_members(&self, type_name: &str, predicate: &dyn Fn(&Symbol) -> bool) -> Vec<Symbol> {
        let mut visited = std::collections::HashSet::new();
        let mut out = Vec::new();
        self.lookup_members_recursive(type_name, predicate, &mut visited, &mut out);
        out
    }

    fn lookup_members_recursive(
        &self,
        type_name: &str,
        predicate: &dyn Fn(&Symbol) -> bool,
        visited: &mut std::collections::HashSet<String>,
        out: &mut Vec<Symbol>,
    ) {
        if !visited.insert(type_name.to_string()) {
            debug!(type_name, "cyclic inheritance detected, breaking traversal");
            return;
        }
        let Some(ty) = self.find_exact_type(type_name) else {
            return;
        };
        for child in &ty.children {
            if predicate(child) {
                out.push(child.clone());
            }
        }
        for assoc in &ty.associated {
            if assoc.kind != SymbolKind::Class && assoc.kind != SymbolKind::Trait {
                continue;
            }
            let wrapped = |s: &Symbol| predicate(s) && !s.modifiers.contains(crate::symbols::Modifiers::PRIVATE);
            self.lookup_members_recursive(assoc.name.as_str(), &wrapped, visited, out);
        }
    }

    pub fn lookup_type_member(&self, type_name: &str, predicate: &dyn Fn(&Symbol) -> bool) -> Option<Symbol> {
        self.lookup_type_members(type_name, predicate).into_iter().next()
    }

    pub fn lookup_members_on_types(&self, type_names: &[String], predicate: &dyn Fn(&Symbol) -> bool) -> Vec<Symbol> {
        type_names.iter().flat_map(|t| self.lookup_type_members(t, predicate)).collect()
    }

    pub fn lookup_member_on_types(&self, type_names: &[String], predicate: &dyn Fn(&Symbol) -> bool) -> Option<Symbol> {
        self.lookup_members_on_types(type_names, predicate).into_iter().next()
    }
}

#[cfg(feature = "serde-cache")]
mod cache;
#[cfg(feature = "serde-cache")]
pub use cache::{RawSymbol, RawTypeSource};
