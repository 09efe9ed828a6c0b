//! The expression type resolver (spec.md §4.7).

use crate::resolve::{NamePhraseKind, ResolverState};
use crate::store::SymbolStore;
use crate::symbols::{Modifiers, Phrase, PhraseKind, Symbol, SymbolKind};
use crate::typestr::{ClassNameResolver, TypeString};
use crate::vartable::VariableTable;

/// Resolves the static type of an expression phrase (spec.md §4.7),
/// consulting the variable table, the name resolver, and the symbol store's
/// member-lookup for member-access constructs.
///
/// Implemented as a single `match` over [`PhraseKind`] — the "exhaustive
/// sum-type match" the symbol reader's own dispatch already uses.
pub struct ExpressionTypeResolver<'a> {
    pub store: &'a SymbolStore,
    pub resolver: &'a ResolverState,
    pub variables: &'a VariableTable,
}

impl<'a> ExpressionTypeResolver<'a> {
    pub fn new(store: &'a SymbolStore, resolver: &'a ResolverState, variables: &'a VariableTable) -> Self {
        Self { store, resolver, variables }
    }

    /// spec.md §4.7 dispatch table.
    pub fn resolve_expression(&self, node: &Phrase) -> TypeString {
        match node.kind {
            PhraseKind::SimpleVariable => {
                let name = node.text.as_deref().unwrap_or_default();
                self.variables.get_type(name, &self.resolver.this_name)
            }
            PhraseKind::SubscriptExpression => node
                .children
                .first()
                .map(|base| self.resolve_expression(base).array_dereference())
                .unwrap_or_else(TypeString::empty),
            PhraseKind::ScopedCallExpression => self.member_on_type(node, SymbolKind::Method, Modifiers::STATIC, Modifiers::NONE, false),
            PhraseKind::ScopedPropertyAccessExpression => {
                self.member_on_type(node, SymbolKind::Property, Modifiers::STATIC, Modifiers::NONE, false)
            }
            PhraseKind::PropertyAccessExpression => self.member_on_type(node, SymbolKind::Property, Modifiers::NONE, Modifiers::STATIC, true),
            PhraseKind::MethodCallExpression => self.member_on_type(node, SymbolKind::Method, Modifiers::NONE, Modifiers::STATIC, false),
            PhraseKind::FunctionCallExpression => {
                let text = node.text.as_deref().unwrap_or_default();
                let fqn = self.resolver.name_phrase_to_fqn(text, NamePhraseKind::Qualified, SymbolKind::Function);
                self.store
                    .find(&fqn, Some(&|s: &Symbol| s.kind == SymbolKind::Function))
                    .and_then(|s| s.r#type.clone())
                    .unwrap_or_else(TypeString::empty)
            }
            PhraseKind::TernaryExpression => {
                let then_ty = node.children.get(1).map(|n| self.resolve_expression(n)).unwrap_or_else(TypeString::empty);
                let else_ty = node.children.get(2).map(|n| self.resolve_expression(n)).unwrap_or_else(TypeString::empty);
                then_ty.merge(else_ty)
            }
            PhraseKind::Assignment | PhraseKind::ByRefAssignment => node
                .children
                .get(1)
                .map(|rhs| self.resolve_expression(rhs))
                .unwrap_or_else(TypeString::empty),
            PhraseKind::ObjectCreationExpression => {
                // An anonymous class carries its synthesized name directly
                // on the phrase (spec.md §4.3 `.anonymous.<span>` naming);
                // otherwise the type comes from the designator child.
                if let Some(anon_name) = &node.text {
                    return TypeString::parse(anon_name);
                }
                node.children.first().map(|d| self.resolve_expression(d)).unwrap_or_else(TypeString::empty)
            }
            PhraseKind::ClassTypeDesignator | PhraseKind::InstanceofDesignator => {
                let text = node.text.as_deref().unwrap_or_default();
                if text.is_empty() {
                    return TypeString::empty();
                }
                if text == "self" || text == "static" {
                    return TypeString::parse(&self.resolver.this_name);
                }
                let fqn = self.resolver.resolve_class_name(text);
                TypeString::parse(&fqn)
            }
            PhraseKind::QualifiedName | PhraseKind::FullyQualifiedName | PhraseKind::RelativeQualifiedName => {
                let text = node.text.as_deref().unwrap_or_default();
                let phrase_kind = match node.kind {
                    PhraseKind::FullyQualifiedName => NamePhraseKind::FullyQualified,
                    PhraseKind::RelativeQualifiedName => NamePhraseKind::RelativeQualified,
                    _ => NamePhraseKind::Qualified,
                };
                TypeString::parse(&self.resolver.name_phrase_to_fqn(text, phrase_kind, SymbolKind::Class))
            }
            PhraseKind::RelativeScope => TypeString::parse(&self.resolver.this_name),
            _ => TypeString::empty(),
        }
    }

    /// Shared member-on-type lookup for the four member-access phrase kinds
    /// (spec.md §4.7 "Visibility filter in member lookup").
    fn member_on_type(
        &self,
        node: &Phrase,
        kind: SymbolKind,
        required: Modifiers,
        excluded: Modifiers,
        prefix_dollar: bool,
    ) -> TypeString {
        let Some(base) = node.children.first() else {
            return TypeString::empty();
        };
        let base_type = self.resolve_expression(base);
        let raw_name = node.text.as_deref().unwrap_or_default();
        let member_name = if prefix_dollar && !raw_name.starts_with('$') {
            format!("${raw_name}")
        } else {
            raw_name.to_string()
        };

        let mut result = TypeString::empty();
        for type_name in base_type.atomic_class_array() {
            let type_name = type_name.to_string();
            let visibility_mask = self.visibility_mask(&type_name);
            let member = self.store.lookup_type_member(&type_name, &|s: &Symbol| {
                s.kind == kind
                    && s.name.as_str() == member_name
                    && s.modifiers.contains(required)
                    && !s.modifiers.intersects(excluded)
                    && !s.modifiers.intersects(visibility_mask)
            });
            if let Some(member) = member {
                if let Some(ty) = &member.r#type {
                    result = result.merge(ty.clone());
                }
            }
        }
        result
    }

    /// spec.md §4.7 "Visibility filter": the modifier mask to exclude,
    /// based on how `type_name` relates to the caller's `thisName`/
    /// `thisBaseName`.
    fn visibility_mask(&self, type_name: &str) -> Modifiers {
        if type_name == self.resolver.this_name {
            Modifiers::NONE
        } else if type_name == self.resolver.this_base_name {
            Modifiers::PRIVATE
        } else {
            Modifiers::PRIVATE.with(Modifiers::PROTECTED)
        }
    }
}
