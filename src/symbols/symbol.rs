//! The [`Symbol`] tree (spec.md §3).

use crate::base::{DocumentUri, Name, Span};
use crate::typestr::TypeString;

/// Discriminates what a [`Symbol`] declares (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-cache", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    None,
    Class,
    Interface,
    Trait,
    Constant,
    Property,
    Method,
    Function,
    Parameter,
    Variable,
    Namespace,
    ClassConstant,
}

/// Bitset of modifiers a [`Symbol`] may carry (spec.md §3).
///
/// Hand-rolled rather than pulled from the `bitflags` crate: the teacher
/// repo never reaches for `bitflags` anywhere in its own tree either, and a
/// dozen named consts over a `u16` is no less readable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PUBLIC: Modifiers = Modifiers(1 << 0);
    pub const PROTECTED: Modifiers = Modifiers(1 << 1);
    pub const PRIVATE: Modifiers = Modifiers(1 << 2);
    pub const FINAL: Modifiers = Modifiers(1 << 3);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 4);
    pub const STATIC: Modifiers = Modifiers(1 << 5);
    pub const READONLY: Modifiers = Modifiers(1 << 6);
    pub const WRITEONLY: Modifiers = Modifiers(1 << 7);
    pub const MAGIC: Modifiers = Modifiers(1 << 8);
    pub const ANONYMOUS: Modifiers = Modifiers(1 << 9);
    pub const USE: Modifiers = Modifiers(1 << 10);

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Modifiers) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn with(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub const fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Rehydrate a bitset from its raw cache representation (spec.md §6).
    pub const fn from_bits(bits: u16) -> Modifiers {
        Modifiers(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.with(rhs)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        *self = self.with(rhs);
    }
}

/// Whether a symbol's declared `type` came from a type declaration or a
/// doc-comment tag — a declaration always wins over a doc tag (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeSource {
    TypeDeclaration,
    PhpDoc,
}

/// A lightweight, non-owning reference to a base class, implemented
/// interface, used trait, or import target (spec.md §3). `associated`
/// entries never own another `Symbol`; they are resolved back through the
/// [`crate::store::SymbolStore`], the single owner of every symbol tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedRef {
    pub kind: SymbolKind,
    pub name: Name,
}

impl AssociatedRef {
    pub fn new(kind: SymbolKind, name: impl Into<Name>) -> Self {
        Self { kind, name: name.into() }
    }
}

/// A declared element: namespace, class, interface, trait, constant,
/// property, method, function, parameter, variable, or class constant
/// (spec.md §3).
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: Name,
    pub modifiers: Modifiers,
    pub r#type: Option<TypeString>,
    pub description: Option<String>,
    pub value: Option<String>,
    pub location: Option<(DocumentUri, Span)>,
    pub scope: Option<Name>,
    pub associated: Vec<AssociatedRef>,
    pub children: Vec<Symbol>,
    pub type_source: Option<TypeSource>,
}

impl Symbol {
    /// A new symbol with no type, no doc, no location — the minimal shape
    /// every reader case starts from before filling in what it knows.
    pub fn new(kind: SymbolKind, name: impl Into<Name>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Modifiers::NONE,
            r#type: None,
            description: None,
            value: None,
            location: None,
            scope: None,
            associated: Vec::new(),
            children: Vec::new(),
            type_source: None,
        }
    }

    /// The synthetic, empty-named, kind-`None` root every per-document
    /// symbol tree starts from (spec.md §3 tree invariants).
    pub fn root() -> Self {
        Self::new(SymbolKind::None, "")
    }

    /// Attach `child` to `self`, applying the scope-attachment rule:
    /// if `self.name` is non-empty, `child.scope` becomes `self.name`
    /// (spec.md §4.3 "Attachment rule").
    pub fn push_child(&mut self, mut child: Symbol) -> &mut Symbol {
        if !self.name.as_str().is_empty() {
            child.scope = Some(self.name.clone());
        }
        self.children.push(child);
        self.children.last_mut().unwrap()
    }

    /// Whether this symbol may ever be inserted into the workspace index
    /// (spec.md §4.4 "Non-index filter", GLOSSARY "Indexable symbol"):
    /// never a Parameter, never a non-file-scope Variable, never a Use
    /// import, never empty-named.
    pub fn is_indexable(&self) -> bool {
        if self.name.as_str().is_empty() {
            return false;
        }
        if self.kind == SymbolKind::Parameter {
            return false;
        }
        if self.kind == SymbolKind::Variable && self.scope.is_some() {
            return false;
        }
        if self.modifiers.contains(Modifiers::USE) {
            return false;
        }
        true
    }

    /// Pre-order iterator over this symbol and every descendant
    /// (spec.md §5 "Iteration over a symbol tree is pre-order").
    pub fn iter_pre_order(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }
}

/// Pre-order traversal of a symbol subtree.
pub struct PreOrderIter<'a> {
    stack: Vec<&'a Symbol>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
