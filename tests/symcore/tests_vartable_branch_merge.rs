//! `if`/`elseif`/`else` branch merging through the real `MethodDeclaration`
//! scope (not a hand-pushed test scope), halting mid-body the way a host's
//! hover/completion query would.

use symcore::flow::VariableTypeResolver;

use crate::helpers::fixtures;

#[test]
fn if_elseif_else_chain_merges_branch_types_without_corrupting_the_scope() {
    // spec.md §8 scenario 6. Also locks in a regression: a mis-timed
    // `popBranch` on `ElseClause` entry used to pop the enclosing method
    // scope instead of a branch, corrupting every variable read for the
    // rest of the body.
    let store = symcore::store::SymbolStore::new();
    let resolver = symcore::resolve::ResolverState::new();
    let method = fixtures::method_with_if_elseif_else();

    // Halts right before the line-4 assignment, i.e. immediately after the
    // if/elseif/else chain has closed and merged.
    let vt = VariableTypeResolver::new(&store, &resolver, Some(4)).run(&method);

    let mut parts: Vec<_> = vt.get_type("$a", "").parts().iter().map(|s| s.to_string()).collect();
    parts.sort();
    assert_eq!(parts, vec!["Bar", "Baz", "Foo"]);

    // Not yet executed at the halt point, and the method scope is intact.
    assert!(vt.get_type("$b", "").is_empty());
}
