//! Symbol/member assertion helpers for integration tests, modeled on the
//! teacher's `tests/helpers/symbol_assertions.rs`.

use symcore::store::SymbolStore;
use symcore::symbols::Modifiers;
use symcore::Symbol;

/// Assert a member named `member_name` exists somewhere on `type_name`'s
/// inheritance chain and return it for further assertions.
pub fn assert_member_exists(store: &SymbolStore, type_name: &str, member_name: &str) -> Symbol {
    store
        .lookup_type_member(type_name, &|s| s.name.as_str() == member_name)
        .unwrap_or_else(|| panic!("expected member '{member_name}' to exist on '{type_name}'"))
}

/// Whether `member_name` on `type_name` would be visible to a caller with
/// no `self`/`parent` relationship to it (spec.md §4.7 visibility filter).
pub fn member_visible_from_outside(store: &SymbolStore, type_name: &str, member_name: &str) -> bool {
    store
        .lookup_type_member(type_name, &|s| {
            s.name.as_str() == member_name && !s.modifiers.contains(Modifiers::PRIVATE) && !s.modifiers.contains(Modifiers::PROTECTED)
        })
        .is_some()
}
