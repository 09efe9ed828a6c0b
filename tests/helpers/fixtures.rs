//! Fixture builders shared across integration tests, modeled on the
//! teacher's `tests/helpers/source_fixtures.rs`.

use once_cell::sync::Lazy;
use symcore::store::{SymbolStore, SymbolTable};
use symcore::symbols::{AssociatedRef, Modifiers, Phrase, PhraseKind};
use symcore::{DocumentUri, Span, Symbol, SymbolKind};

pub fn span(line: u32) -> Span {
    Span::from_coords(line, 0, line, 0)
}

/// Class `D` declares a protected `$p`; class `C` extends `D`. Shared across
/// every member-lookup test so the fixture tree is only built once, the way
/// the teacher shares its stdlib workspace fixture.
pub static INHERITANCE_STORE: Lazy<(SymbolStore, DocumentUri)> = Lazy::new(|| {
    let doc: DocumentUri = "file:///inheritance.php".into();
    let mut store = SymbolStore::new();
    let mut root = Symbol::root();

    let mut base = Symbol::new(SymbolKind::Class, "D");
    base.location = Some((doc.clone(), span(1)));
    let mut prop = Symbol::new(SymbolKind::Property, "$p");
    prop.modifiers = Modifiers::PROTECTED;
    base.push_child(prop);
    root.push_child(base);

    let mut derived = Symbol::new(SymbolKind::Class, "C");
    derived.location = Some((doc.clone(), span(5)));
    derived.associated.push(AssociatedRef::new(SymbolKind::Class, "D"));
    root.push_child(derived);

    store.add(SymbolTable::new(doc.clone(), root)).expect("fixture document is unique");
    (store, doc)
});

/// `if ($c) { $a = Foo; } elseif ($c2) { $a = Bar; } else { $a = Baz; }`
/// followed by `$b = Quux;`, wrapped in a method body.
pub fn method_with_if_elseif_else() -> Phrase {
    let if_assign = Phrase::new(1, PhraseKind::Assignment, span(1)).with_children(vec![
        Phrase::new(2, PhraseKind::SimpleVariable, span(1)).with_text("$a"),
        Phrase::new(3, PhraseKind::ClassTypeDesignator, span(1)).with_text("Foo"),
    ]);
    let elseif_assign = Phrase::new(4, PhraseKind::Assignment, span(2)).with_children(vec![
        Phrase::new(5, PhraseKind::SimpleVariable, span(2)).with_text("$a"),
        Phrase::new(6, PhraseKind::ClassTypeDesignator, span(2)).with_text("Bar"),
    ]);
    let elseif_clause = Phrase::new(7, PhraseKind::ElseIfClause, span(2)).with_children(vec![elseif_assign]);
    let elseif_list = Phrase::new(8, PhraseKind::ElseIfClauseList, span(2)).with_children(vec![elseif_clause]);
    let else_assign = Phrase::new(9, PhraseKind::Assignment, span(3)).with_children(vec![
        Phrase::new(10, PhraseKind::SimpleVariable, span(3)).with_text("$a"),
        Phrase::new(11, PhraseKind::ClassTypeDesignator, span(3)).with_text("Baz"),
    ]);
    let else_clause = Phrase::new(12, PhraseKind::ElseClause, span(3)).with_children(vec![else_assign]);
    let if_stmt = Phrase::new(13, PhraseKind::IfStatement, span(1)).with_children(vec![if_assign, elseif_list, else_clause]);

    let after_assign = Phrase::new(14, PhraseKind::Assignment, span(4)).with_children(vec![
        Phrase::new(15, PhraseKind::SimpleVariable, span(4)).with_text("$b"),
        Phrase::new(16, PhraseKind::ClassTypeDesignator, span(4)).with_text("Quux"),
    ]);

    Phrase::new(0, PhraseKind::MethodDeclaration, span(0)).with_children(vec![if_stmt, after_assign])
}

/// `/** @var TypeString $xs (Foo|Bar)[] */ foreach ($xs as $x) { ... }`
/// followed by `$done = true;`.
pub fn method_with_foreach() -> Phrase {
    let doc_comment = Phrase::new(1, PhraseKind::DocumentComment, span(1)).with_text("$xs").with_value("(Foo|Bar)[]");
    let collection = Phrase::new(2, PhraseKind::SimpleVariable, span(2)).with_text("$xs");
    let value_var = Phrase::new(3, PhraseKind::SimpleVariable, span(2)).with_text("$x");
    let foreach_value = Phrase::new(4, PhraseKind::ForeachValue, span(2)).with_children(vec![value_var]);
    let foreach_stmt = Phrase::new(5, PhraseKind::ForeachStatement, span(2)).with_children(vec![collection, foreach_value]);
    let after = Phrase::new(6, PhraseKind::Assignment, span(3)).with_children(vec![
        Phrase::new(7, PhraseKind::SimpleVariable, span(3)).with_text("$done"),
        Phrase::new(8, PhraseKind::ClassTypeDesignator, span(3)).with_text("true"),
    ]);

    Phrase::new(0, PhraseKind::MethodDeclaration, span(0)).with_children(vec![doc_comment, foreach_stmt, after])
}
