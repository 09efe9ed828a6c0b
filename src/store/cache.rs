//! JSON (de)serialization of a [`Symbol`] tree for `createBuiltIn` and the
//! persisted symbol-store cache (spec.md §6, feature `serde-cache`).
//!
//! The on-disk shape mirrors [`Symbol`] field-for-field except `type`,
//! which is a plain string there; [`rehydrate`] re-wraps it into a
//! [`TypeString`] with a post-order walk, exactly as spec.md §6 describes.

use serde::{Deserialize, Serialize};

use crate::base::Name;
use crate::symbols::{AssociatedRef, Modifiers, Symbol, SymbolKind, TypeSource};
use crate::typestr::TypeString;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssociated {
    pub kind: SymbolKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawTypeSource {
    TypeDeclaration,
    PhpDoc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSymbol {
    pub kind: SymbolKind,
    pub name: String,
    #[serde(default)]
    pub modifiers: u16,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub type_source: Option<RawTypeSource>,
    #[serde(default)]
    pub associated: Vec<RawAssociated>,
    #[serde(default)]
    pub children: Vec<RawSymbol>,
}

/// Post-order rehydration: children are converted first, so nothing here
/// ever needs a `type` string's resolution context from an ancestor.
pub fn rehydrate(raw: RawSymbol) -> Symbol {
    let children: Vec<Symbol> = raw.children.into_iter().map(rehydrate).collect();
    Symbol {
        kind: raw.kind,
        name: Name::from(raw.name),
        modifiers: Modifiers::from_bits(raw.modifiers),
        r#type: raw.r#type.map(|t| TypeString::parse(&t)),
        description: raw.description,
        value: raw.value,
        location: None,
        scope: None,
        associated: raw
            .associated
            .into_iter()
            .map(|a| AssociatedRef::new(a.kind, a.name))
            .collect(),
        children,
        type_source: raw.type_source.map(|t| match t {
            RawTypeSource::TypeDeclaration => TypeSource::TypeDeclaration,
            RawTypeSource::PhpDoc => TypeSource::PhpDoc,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rehydrates_nested_type_strings_post_order() {
        let json = r#"{
            "kind": "Class",
            "name": "Foo",
            "children": [
                {"kind": "Method", "name": "bar", "type": "int|string"}
            ]
        }"#;
        let raw: RawSymbol = serde_json::from_str(json).unwrap();
        let symbol = rehydrate(raw);
        assert_eq!(symbol.name.as_str(), "Foo");
        let method = &symbol.children[0];
        assert_eq!(method.r#type.as_ref().unwrap().parts().len(), 2);
    }
}
