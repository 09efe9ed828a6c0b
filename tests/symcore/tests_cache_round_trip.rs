//! Persisted symbol-table cache round trip (spec.md §6 `createBuiltIn`),
//! reading a JSON fixture back off disk the way a host's on-disk cache
//! would be loaded.

#![cfg(feature = "serde-cache")]

use std::io::Write;

use symcore::store::SymbolTable;
use symcore::DocumentUri;

#[test]
fn create_built_in_rehydrates_a_cached_json_symbol_tree_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp cache file");
    write!(
        file,
        r#"{{"kind":"Class","name":"Foo","children":[{{"kind":"Method","name":"bar","type":"int|string"}}]}}"#
    )
    .expect("write fixture cache");

    let json = std::fs::read_to_string(file.path()).expect("read back cache file");
    let uri: DocumentUri = "builtin:///foo.php".into();
    let table = SymbolTable::create_built_in(uri, &json).expect("rehydrate cache");

    assert_eq!(table.root.name.as_str(), "Foo");
    let method = &table.root.children[0];
    assert_eq!(method.r#type.as_ref().unwrap().parts().len(), 2);
}
