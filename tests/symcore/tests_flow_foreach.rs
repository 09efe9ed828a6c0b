//! `foreach` loop-variable typing through the flow-sensitive resolver.

use symcore::flow::VariableTypeResolver;

use crate::helpers::fixtures;

#[test]
fn foreach_over_union_array_assigns_the_dereferenced_element_type() {
    // spec.md §8 scenario 3
    let store = symcore::store::SymbolStore::new();
    let resolver = symcore::resolve::ResolverState::new();
    let method = fixtures::method_with_foreach();

    let vt = VariableTypeResolver::new(&store, &resolver, Some(3)).run(&method);

    let mut parts: Vec<_> = vt.get_type("$x", "").parts().iter().map(|s| s.to_string()).collect();
    parts.sort();
    assert_eq!(parts, vec!["Bar", "Foo"]);

    // `$done` is assigned on the following line, not yet reached at the halt.
    assert!(vt.get_type("$done", "").is_empty());
}
