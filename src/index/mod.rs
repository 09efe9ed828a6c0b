//! The multi-key ordered symbol index (spec.md §3 "Index node", §4.4).

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use crate::symbols::Symbol;

/// One key's worth of indexed symbols, kept in a globally-ordered sequence
/// (spec.md §3 "Index node").
#[derive(Debug, Clone)]
struct IndexNode {
    key: SmolStr,
    items: Vec<Arc<Symbol>>,
}

/// Lowercase every char, leaving non-alphabetic bytes untouched — the
/// "case-folded" transform spec.md §4.4 applies before every key lookup.
fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

fn unqualified(name: &str) -> &str {
    match name.rfind('\\') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Every overlapping 3-character window of `s` (spec.md §4.4 "every
/// trigram of the lowercase unqualified name").
fn trigrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 3 {
        return Vec::new();
    }
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

/// spec.md §4.4 "Acronym rule".
fn acronym(name: &str) -> Option<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let mut out = String::new();
    let mut first_idx = 0;
    if chars[0] == '_' || chars[0] == '$' {
        first_idx = 1;
    }
    if first_idx >= chars.len() {
        return None;
    }
    out.push(chars[first_idx].to_ascii_lowercase());

    for i in (first_idx + 1)..chars.len() {
        let c = chars[i];
        let prev = chars[i - 1];
        let boundary_after_sep = (prev == '$' || prev == '_') && c != '_';
        let prev_was_lower = prev.to_lowercase().next() == Some(prev);
        let curr_is_upper = c.to_lowercase().next() != Some(c);
        let case_boundary = curr_is_upper && prev_was_lower;
        if boundary_after_sep || case_boundary {
            out.push(c.to_ascii_lowercase());
        }
    }

    if out.chars().count() >= 2 {
        Some(out)
    } else {
        None
    }
}

/// Every key a Symbol is filed under (spec.md §4.4): lowercase unqualified
/// name, lowercase FQN, every trigram of the unqualified name, and the
/// acronym when it is at least 2 characters.
fn keys_for(name: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let uq = unqualified(name);
    let uq_folded = fold_case(uq);
    keys.push(uq_folded.clone());
    let fqn_folded = fold_case(name);
    if fqn_folded != uq_folded {
        keys.push(fqn_folded);
    }
    keys.extend(trigrams(&uq_folded));
    if let Some(a) = acronym(uq) {
        keys.push(a);
    }
    keys
}

/// A ranked match from [`SymbolIndex::match_query`]'s fuzzy mode.
#[derive(Debug, Clone)]
struct Scored {
    symbol: Arc<Symbol>,
    score: i64,
}

/// An ordered, multi-key index over [`Symbol`]s (spec.md §4.4).
///
/// Kept as a single `Vec<IndexNode>` sorted by case-folded key rather than
/// a hash map: prefix queries need range search, which a hash map cannot
/// give. The corpus carries no Unicode-collation crate, so the sort order
/// is plain case-folded `Ord` — a deterministic stand-in for the spec's
/// "locale-aware collator", documented in DESIGN.md.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    nodes: Vec<IndexNode>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn key_count(&self) -> usize {
        self.nodes.len()
    }

    fn find_index(&self, key: &str) -> Result<usize, usize> {
        self.nodes.binary_search_by(|node| node.key.as_str().cmp(key))
    }

    /// Insert `symbol` under every key it is indexable by. No-op if the
    /// symbol is not indexable (spec.md §4.4 "Non-index filter").
    pub fn insert(&mut self, symbol: Arc<Symbol>) {
        if !symbol.is_indexable() {
            return;
        }
        let mut keys = keys_for(symbol.name.as_str());
        keys.sort();
        keys.dedup();
        for key in keys {
            match self.find_index(&key) {
                Ok(i) => self.nodes[i].items.push(symbol.clone()),
                Err(i) => self.nodes.insert(
                    i,
                    IndexNode {
                        key: SmolStr::new(&key),
                        items: vec![symbol.clone()],
                    },
                ),
            }
        }
    }

    /// Remove every occurrence of symbols satisfying `pred` (used by the
    /// store on document removal/replacement). Empty nodes are pruned.
    pub fn remove_where(&mut self, pred: impl Fn(&Symbol) -> bool) {
        for node in &mut self.nodes {
            node.items.retain(|s| !pred(s));
        }
        self.nodes.retain(|n| !n.items.is_empty());
    }

    fn prefix_range(&self, folded_query: &str) -> &[IndexNode] {
        let lower = self.nodes.partition_point(|n| n.key.as_str() < folded_query);
        let upper = self.nodes[lower..].partition_point(|n| n.key.as_str().starts_with(folded_query)) + lower;
        &self.nodes[lower..upper]
    }

    /// spec.md §4.4 `match(text, fuzzy)`.
    pub fn match_query(&self, text: &str, fuzzy: bool) -> Vec<Arc<Symbol>> {
        let folded = fold_case(text);
        if folded.is_empty() {
            return Vec::new();
        }
        if !fuzzy {
            trace!(query = %text, "symbol index prefix match");
            let mut seen = Vec::new();
            let mut out = Vec::new();
            for node in self.prefix_range(&folded) {
                for item in &node.items {
                    if !seen.iter().any(|s: &Arc<Symbol>| Arc::ptr_eq(s, item)) {
                        seen.push(item.clone());
                        out.push(item.clone());
                    }
                }
            }
            out
        } else {
            let hits = self.fuzzy_hits(&folded, text);
            trace!(query = %text, hits = hits.len(), "symbol index fuzzy match");
            hits
        }
    }

    fn fuzzy_hits(&self, folded: &str, original: &str) -> Vec<Arc<Symbol>> {
        let mut query_keys: Vec<String> = trigrams(folded);
        query_keys.push(folded.to_string());

        let mut scored: Vec<Scored> = Vec::new();
        for key in &query_keys {
            if let Ok(i) = self.find_index(key) {
                for item in &self.nodes[i].items {
                    if let Some(existing) = scored.iter_mut().find(|s| Arc::ptr_eq(&s.symbol, item)) {
                        existing.score += 1;
                    } else {
                        scored.push(Scored { symbol: item.clone(), score: 1 });
                    }
                }
            }
        }

        if folded.len() > 3 {
            for s in &mut scored {
                let uq = fold_case(unqualified(s.symbol.name.as_str()));
                if let Some(idx) = uq.find(folded) {
                    s.score += (1 + idx as i64) * -10 + 1000;
                }
            }
        }
        let _ = original;

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.into_iter().map(|s| s.symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKind;

    fn sym(name: &str) -> Arc<Symbol> {
        Arc::new(Symbol::new(SymbolKind::Function, name))
    }

    #[test]
    fn index_key_coverage_for_unqualified_fqn_and_acronym() {
        // spec.md §8 "Index key coverage"
        let mut idx = SymbolIndex::new();
        let s = sym("App\\getUserIdFromDb");
        idx.insert(s.clone());

        let by_unqualified = idx.match_query("getUserIdFromDb", false);
        assert!(by_unqualified.iter().any(|x| Arc::ptr_eq(x, &s)));

        let by_fqn = idx.match_query("App\\getUserIdFromDb", false);
        assert!(by_fqn.iter().any(|x| Arc::ptr_eq(x, &s)));

        let by_acronym = idx.match_query("guifd", false);
        assert!(by_acronym.iter().any(|x| Arc::ptr_eq(x, &s)));
    }

    #[test]
    fn acronym_rule_matches_spec_scenario_5() {
        assert_eq!(acronym("getUserIdFromDb").as_deref(), Some("guifd"));
    }

    #[test]
    fn trigrams_cover_every_overlapping_window() {
        assert_eq!(trigrams("abcd"), vec!["abc", "bcd"]);
        assert!(trigrams("ab").is_empty());
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let mut idx = SymbolIndex::new();
        let s = sym("Foo\\Bar");
        idx.insert(s.clone());
        let hits = idx.match_query("BAR", false);
        assert!(hits.iter().any(|x| Arc::ptr_eq(x, &s)));
    }

    #[test]
    fn fuzzy_match_dedupes_and_ranks_substring_hits_first() {
        let mut idx = SymbolIndex::new();
        let near = sym("App\\userRepository");
        let far = sym("App\\xyzuvw");
        idx.insert(near.clone());
        idx.insert(far.clone());
        let hits = idx.match_query("user", true);
        assert_eq!(hits.first().map(|s| s.name.as_str()), Some("App\\userRepository"));
    }

    #[test]
    fn non_indexable_symbols_are_never_inserted() {
        let mut idx = SymbolIndex::new();
        idx.insert(Arc::new(Symbol::new(SymbolKind::Parameter, "x")));
        assert_eq!(idx.node_count(), 0);
    }
}
