//! Cross-document member lookup through inheritance and the visibility
//! filter, exercised through the public `SymbolStore` API end to end.

use symcore::symbols::Modifiers;

use crate::helpers::{assertions, fixtures};

#[test]
fn protected_property_is_visible_through_inheritance_but_not_from_outside() {
    // spec.md §8 scenario 4
    let (store, _doc) = &*fixtures::INHERITANCE_STORE;

    let member = assertions::assert_member_exists(store, "C", "$p");
    assert!(member.modifiers.contains(Modifiers::PROTECTED));

    assert!(!assertions::member_visible_from_outside(store, "C", "$p"));
}

#[test]
fn member_lookup_on_an_unknown_type_returns_nothing() {
    let (store, _doc) = &*fixtures::INHERITANCE_STORE;
    assert!(store.lookup_type_member("NoSuchType", &|_| true).is_none());
}
