//! The type-string algebra (spec.md §3 TypeString, §4.1).
//!
//! A `TypeString` is an unordered, duplicate-free set of atomic type
//! expressions, represented internally as an ordered, duplicate-free
//! sequence (insertion order is preserved because `merge` must remain
//! commutative under *set* equality, not under textual equality — spec.md
//! §4.1 explicitly warns callers not to compare by string equality after a
//! merge).
//!
//! Parsing is total (spec.md §7, `MalformedTypeString` is never fatal):
//! any input string produces *some* `TypeString`, at worst a single
//! garbage atom.

use smol_str::SmolStr;

/// Keywords that are atomic types in their own right and are never treated
/// as class names (spec.md §3).
const KEYWORDS: &[&str] = &[
    "string", "int", "bool", "float", "mixed", "array", "null", "self", "static", "callable",
    "void", "object", "resource", "false", "true", "$this",
];

/// The subset of keywords that resolve to the enclosing class rather than
/// passing through unchanged under `nameResolve` (spec.md §4.1).
const SELF_LIKE: &[&str] = &["self", "static", "$this"];

fn is_keyword(atom: &str) -> bool {
    KEYWORDS.contains(&atom)
}

/// Implemented by a name resolver so the type-string algebra can resolve
/// class-name atoms without depending on the resolver module directly
/// (the resolver's state references [`crate::symbols::Symbol`], which in
/// turn references `TypeString` — this trait breaks that cycle).
pub trait ClassNameResolver {
    /// The fully qualified name standing in for `self`/`static`/`$this`.
    fn this_name(&self) -> &str;
    /// Resolve a not-fully-qualified class name per spec.md §4.2.
    fn resolve_class_name(&self, name: &str) -> String;
}

/// Split `s` on top-level `|` (i.e. `|` outside balanced parentheses).
/// Parenthesized groups are kept verbatim as single atoms (spec.md §4.1).
fn split_top_level(s: &str) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' if depth <= 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn push_unique(parts: &mut Vec<SmolStr>, atom: &str) {
    if atom.is_empty() {
        return;
    }
    if !parts.iter().any(|p| p.as_str() == atom) {
        parts.push(SmolStr::new(atom));
    }
}

/// An unordered, duplicate-free set of atomic type expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeString {
    parts: Vec<SmolStr>,
}

impl TypeString {
    /// The empty type string (no information).
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Parse a raw textual type, splitting on `|` at depth-0 parentheses.
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        for atom in split_top_level(raw.trim()) {
            push_unique(&mut parts, atom.trim());
        }
        Self { parts }
    }

    /// True iff the part set is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> &[SmolStr] {
        &self.parts
    }

    /// The atomic parts that are candidate class FQNs: neither keywords,
    /// nor array-suffixed, nor parenthesized unions (spec.md §4.1).
    pub fn atomic_class_array(&self) -> Vec<&str> {
        self.parts
            .iter()
            .map(|p| p.as_str())
            .filter(|p| !is_keyword(p) && !p.ends_with(']') && !p.starts_with('('))
            .collect()
    }

    /// Dereference one level of array nesting. Non-array parts are
    /// discarded; parenthesized unions are re-split and deduplicated
    /// (spec.md §4.1, §8 array round-trip property).
    pub fn array_dereference(&self) -> TypeString {
        let mut parts = Vec::new();
        for atom in &self.parts {
            let Some(stripped) = atom.as_str().strip_suffix("[]") else {
                continue;
            };
            if stripped.starts_with('(') && stripped.ends_with(')') {
                let inner = &stripped[1..stripped.len() - 1];
                for sub in split_top_level(inner) {
                    push_unique(&mut parts, sub.trim());
                }
            } else {
                push_unique(&mut parts, stripped);
            }
        }
        TypeString { parts }
    }

    /// Wrap the receiver in one level of array nesting.
    pub fn array(&self) -> TypeString {
        if self.parts.is_empty() {
            return TypeString::empty();
        }
        if self.parts.len() >= 2 {
            TypeString::parse(&format!("({})[]", self.to_string()))
        } else {
            TypeString::parse(&format!("{}[]", self.parts[0]))
        }
    }

    /// Set-union with `other`. Duplicates collapse by string equality.
    pub fn merge(&self, other: impl Into<TypeString>) -> TypeString {
        let other = other.into();
        let mut parts = self.parts.clone();
        for atom in &other.parts {
            push_unique(&mut parts, atom.as_str());
        }
        TypeString { parts }
    }

    /// Resolve every class-name atom against `resolver` (spec.md §4.1).
    pub fn name_resolve(&self, resolver: &impl ClassNameResolver) -> TypeString {
        let mut parts = Vec::new();
        for atom in &self.parts {
            let resolved = resolve_atom(atom.as_str(), resolver);
            push_unique(&mut parts, &resolved);
        }
        TypeString { parts }
    }
}

fn resolve_atom(atom: &str, resolver: &impl ClassNameResolver) -> String {
    if is_keyword(atom) && !SELF_LIKE.contains(&atom) {
        return atom.to_string();
    }
    if SELF_LIKE.contains(&atom) {
        return resolver.this_name().to_string();
    }
    if let Some(stripped) = atom.strip_suffix("[]") {
        return format!("{}[]", resolve_atom(stripped, resolver));
    }
    if atom.starts_with('(') && atom.ends_with(')') {
        let inner = &atom[1..atom.len() - 1];
        let resolved: Vec<String> = split_top_level(inner)
            .into_iter()
            .map(|a| resolve_atom(a.trim(), resolver))
            .collect();
        return format!("({})", resolved.join("|"));
    }
    if let Some(stripped) = atom.strip_prefix('\\') {
        return stripped.to_string();
    }
    resolver.resolve_class_name(atom)
}

impl std::fmt::Display for TypeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(part.as_str())?;
        }
        Ok(())
    }
}

impl From<&str> for TypeString {
    fn from(s: &str) -> Self {
        TypeString::parse(s)
    }
}

impl From<String> for TypeString {
    fn from(s: String) -> Self {
        TypeString::parse(&s)
    }
}

impl From<TypeString> for TypeString {
    fn from(t: TypeString) -> Self {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeResolver {
        this_name: String,
    }

    impl ClassNameResolver for FakeResolver {
        fn this_name(&self) -> &str {
            &self.this_name
        }
        fn resolve_class_name(&self, name: &str) -> String {
            format!("Resolved\\{name}")
        }
    }

    #[test]
    fn parse_splits_on_top_level_pipe_only() {
        let t = TypeString::parse("int|(A|B)[]|string");
        assert_eq!(t.parts().len(), 3);
        assert_eq!(t.parts()[1].as_str(), "(A|B)[]");
    }

    #[test]
    fn merge_is_commutative_up_to_set_equality() {
        let a = TypeString::parse("int|string");
        let b = TypeString::parse("string|float");
        let ab = a.merge(b.clone());
        let ba = b.merge(a);
        let set = |t: &TypeString| {
            let mut v: Vec<_> = t.parts().iter().map(|s| s.to_string()).collect();
            v.sort();
            v
        };
        assert_eq!(set(&ab), set(&ba));
    }

    #[test]
    fn merge_is_idempotent() {
        let a = TypeString::parse("int|string");
        let merged = a.merge(a.clone());
        assert_eq!(merged.parts().len(), a.parts().len());
    }

    #[test]
    fn array_dereference_unpacks_parenthesized_union() {
        // spec.md §8 scenario 2
        let t = TypeString::parse("int|string[]|(A|B)[]").array_dereference();
        let mut names: Vec<_> = t.parts().iter().map(|s| s.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["A", "B", "string"]);
    }

    #[test]
    fn array_round_trip_on_atomic_classes() {
        let t = TypeString::parse("Foo|Bar");
        let round = t.array().array_dereference();
        let mut expected: Vec<_> = t.atomic_class_array().iter().map(|s| s.to_string()).collect();
        let mut got: Vec<_> = round.parts().iter().map(|s| s.to_string()).collect();
        expected.sort();
        got.sort();
        assert_eq!(expected, got);
    }

    #[test]
    fn atomic_class_array_excludes_keywords_arrays_and_parens() {
        let t = TypeString::parse("int|Foo|Bar[]|(A|B)");
        assert_eq!(t.atomic_class_array(), vec!["Foo"]);
    }

    #[test]
    fn name_resolve_substitutes_self_like_and_strips_backslash() {
        let resolver = FakeResolver {
            this_name: "App\\Thing".to_string(),
        };
        let t = TypeString::parse("self|\\Already\\Qualified|Bare|static[]");
        let resolved = t.name_resolve(&resolver);
        let strs: Vec<_> = resolved.parts().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            strs,
            vec![
                "App\\Thing",
                "Already\\Qualified",
                "Resolved\\Bare",
                "App\\Thing[]",
            ]
        );
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let t = TypeString::parse("int|string|Foo[]");
        let again = TypeString::parse(&t.to_string());
        let mut a: Vec<_> = t.parts().iter().map(|s| s.to_string()).collect();
        let mut b: Vec<_> = again.parts().iter().map(|s| s.to_string()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
