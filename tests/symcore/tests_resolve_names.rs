//! Name resolution feeding into the type-string algebra end to end.

use symcore::resolve::{NamePhraseKind, ResolverState};
use symcore::symbols::SymbolKind;
use symcore::TypeString;

#[test]
fn imported_alias_resolves_through_name_phrase_to_fqn_and_type_string() {
    let mut resolver = ResolverState::new();
    resolver.namespace_name = "App\\Controllers".to_string();
    resolver.add_import(SymbolKind::Class, "Model", "App\\Models\\UserModel");

    let fqn = resolver.name_phrase_to_fqn("Model", NamePhraseKind::Qualified, SymbolKind::Class);
    assert_eq!(fqn, "App\\Models\\UserModel");

    let declared = TypeString::parse("Model|Other").name_resolve(&resolver);
    let mut parts: Vec<_> = declared.parts().iter().map(|s| s.to_string()).collect();
    parts.sort();
    assert_eq!(parts, vec!["App\\Controllers\\Other", "App\\Models\\UserModel"]);
}
