//! String interning for symbol and variable names.
//!
//! Every name flowing through the reader, resolver, and index is short and
//! repeats constantly (the same class name appears in its declaration, in
//! every reference, and in every subtype's `associated` list). Interning
//! collapses those repeats to a cheap `Copy` handle instead of allocating a
//! fresh `String` per occurrence.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::Arc;

/// An interned name. Cheap to copy and compare; two `Name`s compare equal
/// iff they were interned from equal strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(SmolStr);

impl Name {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(SmolStr::new(s))
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(SmolStr::new(s))
    }
}

impl std::borrow::Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Interner mapping strings to `Name` handles.
///
/// Not required for correctness (a `Name` is simply a cheap wrapper around
/// an immutable string) but kept as the single place name construction goes
/// through, so a host embedding the core can choose to share one `Interner`
/// across documents without the core needing to know about that sharing.
#[derive(Debug, Default)]
pub struct Interner {
    seen: FxHashMap<Arc<str>, ()>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Name {
        if let Some((existing, _)) = self.seen.get_key_value(s) {
            return Name(SmolStr::new(existing.as_ref()));
        }
        let arc: Arc<str> = Arc::from(s);
        self.seen.insert(arc.clone(), ());
        Name(SmolStr::new(arc.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_intern_to_equal_names() {
        let mut interner = Interner::new();
        let a = interner.intern("Foo\\Bar");
        let b = interner.intern("Foo\\Bar");
        assert_eq!(a, b);
    }
}
