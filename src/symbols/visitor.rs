//! The consumed parsed-document / doc-comment interfaces (spec.md §6).
//!
//! Lexing, parsing, and doc-comment sub-parsing are explicitly out of scope
//! (spec.md §1); this module only defines the contract the symbol reader
//! needs from them, plus `SyntaxNode`/`SyntaxDocument`, a minimal in-crate
//! implementation of that contract used by the reader's own tests and by a
//! host that has no richer CST of its own to plug in.

use crate::base::{DocumentUri, Position, Span};

/// Opaque per-phrase identifier, stable within one document (spec.md §6:
/// "the specific numeric values are an opaque enum contract between parser
/// and core").
pub type PhraseId = u32;

/// The syntactic constructs the symbol reader dispatches on (spec.md §4.3,
/// §9 "dense table of handlers keyed by numeric kind"). `Unknown` is the
/// required fallback for any construct the reader does not recognize —
/// spec.md §9: "treat unknown kinds as skip and continue".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKind {
    NamespaceDefinition,
    NamespaceUseDeclaration,
    NamespaceUseClause,
    ConstElement,
    FunctionDeclaration,
    FunctionDeclarationHeader,
    ParameterDeclaration,
    TypeDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TraitDeclaration,
    ClassDeclarationHeader,
    ClassBaseClause,
    ClassInterfaceClause,
    ClassConstDeclaration,
    ClassConstElement,
    PropertyDeclaration,
    PropertyElement,
    MethodDeclaration,
    MethodDeclarationHeader,
    MemberModifierList,
    TraitUseClause,
    AnonymousClassDeclaration,
    AnonymousFunctionCreationExpression,
    SimpleVariable,
    ForeachStatement,
    ForeachKey,
    ForeachValue,
    ListIntrinsic,
    CatchClause,
    CatchNameList,
    QualifiedName,
    FullyQualifiedName,
    RelativeQualifiedName,
    DocumentComment,
    CloseBraceToken,

    // Expression / flow constructs (spec.md §4.7, §4.8).
    Assignment,
    ByRefAssignment,
    SubscriptExpression,
    ScopedCallExpression,
    ScopedPropertyAccessExpression,
    PropertyAccessExpression,
    MethodCallExpression,
    FunctionCallExpression,
    TernaryExpression,
    ObjectCreationExpression,
    ClassTypeDesignator,
    InstanceofDesignator,
    InstanceOfExpression,
    RelativeScope,
    IfStatement,
    SwitchStatement,
    CaseStatement,
    DefaultStatement,
    ElseIfClause,
    ElseIfClauseList,
    ElseClause,

    Unknown(u32),
}

/// The use-kind / modifier / visibility tokens the reader needs to read off
/// a phrase (spec.md §4.3 "use kind token", "modifier list").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    UseClass,
    UseFunction,
    UseConst,
    ModPublic,
    ModProtected,
    ModPrivate,
    ModFinal,
    ModAbstract,
    ModStatic,
    ModReadonly,
}

/// A generic syntax node. The reader treats every construct by its
/// [`PhraseKind`] and never downcasts further, matching spec.md §6's
/// "opaque enum contract between parser and core".
#[derive(Debug, Clone)]
pub struct Phrase {
    pub id: PhraseId,
    pub kind: PhraseKind,
    pub span: Span,
    /// The primary name/text token for this phrase, if it carries one
    /// (a class name, a variable name, a member name, ...).
    pub text: Option<String>,
    /// An explicit alias, where the construct has one (`use X as Y`).
    pub alias: Option<String>,
    /// A default-value / expression text, where the construct has one
    /// (parameter default, const/property initializer).
    pub value: Option<String>,
    pub token_kind: Option<TokenKind>,
    pub children: Vec<Phrase>,
}

impl Phrase {
    pub fn new(id: PhraseId, kind: PhraseKind, span: Span) -> Self {
        Self {
            id,
            kind,
            span,
            text: None,
            alias: None,
            value: None,
            token_kind: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_token_kind(mut self, kind: TokenKind) -> Self {
        self.token_kind = Some(kind);
        self
    }

    pub fn with_children(mut self, children: Vec<Phrase>) -> Self {
        self.children = children;
        self
    }
}

/// Two-phase tree visitor (spec.md §9): `pre_order` returning `false`
/// skips the subtree (but `post_order` is still not called for it); the
/// reader relies on `post_order` to pop its spine.
pub trait Visitor {
    fn pre_order(&mut self, node: &Phrase, ancestry: &[PhraseId]) -> bool;
    fn post_order(&mut self, node: &Phrase, ancestry: &[PhraseId]);
}

/// A parsed source document (spec.md §6, "Consumed — Parsed document").
pub trait ParsedDocument {
    fn uri(&self) -> &DocumentUri;
    fn accept(&self, visitor: &mut dyn Visitor);
    fn token_text(&self, span: Span) -> String;
    fn offset_to_position(&self, offset: u32) -> Position;
    /// A stable name for an anonymous class/function phrase, derived from
    /// its source range (spec.md §4.3: `.anonymous.<line>.<col>.<endLine>.<endCol>`).
    fn anonymous_name(&self, phrase: &Phrase) -> String {
        format!(
            ".anonymous.{}.{}.{}.{}",
            phrase.span.start.line, phrase.span.start.character, phrase.span.end.line, phrase.span.end.character
        )
    }
}

/// A minimal, in-crate [`ParsedDocument`] over an owned [`Phrase`] tree.
/// Not a real parser — it exists so the reader can be exercised without an
/// external one, and so a host with no richer CST of its own has somewhere
/// to start.
pub struct SyntaxDocument {
    uri: DocumentUri,
    root: Phrase,
    source: String,
}

impl SyntaxDocument {
    pub fn new(uri: impl Into<DocumentUri>, root: Phrase, source: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            root,
            source: source.into(),
        }
    }

    fn walk(node: &Phrase, ancestry: &mut Vec<PhraseId>, visitor: &mut dyn Visitor) {
        if visitor.pre_order(node, ancestry) {
            ancestry.push(node.id);
            for child in &node.children {
                Self::walk(child, ancestry, visitor);
            }
            ancestry.pop();
        }
        visitor.post_order(node, ancestry);
    }
}

impl ParsedDocument for SyntaxDocument {
    fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    fn accept(&self, visitor: &mut dyn Visitor) {
        let mut ancestry = Vec::new();
        Self::walk(&self.root, &mut ancestry, visitor);
    }

    fn token_text(&self, span: Span) -> String {
        // Byte offsets aren't tracked on `Span` (it's line/character-only,
        // per spec.md §6); a real parser's own offset table would back
        // this. The in-crate fixture documents carry `text` directly on
        // the phrase instead, so this is only a fallback.
        let _ = span;
        self.source.clone()
    }

    fn offset_to_position(&self, offset: u32) -> Position {
        let mut line = 0u32;
        let mut last_newline = 0u32;
        for (i, c) in self.source.char_indices() {
            if i as u32 >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                last_newline = i as u32 + 1;
            }
        }
        Position::new(line, offset.saturating_sub(last_newline))
    }
}

/// A `@param`/`@var`/`@property`/`@method`/`@return` tag parsed out of a
/// doc comment (spec.md §6, "Consumed — Doc-comment parser").
#[derive(Debug, Clone)]
pub struct DocTag {
    pub name: String,
    pub type_string: String,
    pub description: Option<String>,
}

/// A `@method` tag, which additionally carries a synthetic parameter list.
#[derive(Debug, Clone)]
pub struct MethodTag {
    pub name: String,
    pub type_string: String,
    pub description: Option<String>,
    pub parameters: Vec<(String, String)>,
}

/// The parsed form of a single doc-comment token (spec.md §6).
#[derive(Debug, Clone, Default)]
pub struct DocComment {
    pub text: String,
    pub return_tag: Option<DocTag>,
    pub property_tags: Vec<DocTag>,
    pub property_read_tags: Vec<DocTag>,
    pub property_write_tags: Vec<DocTag>,
    pub method_tags: Vec<MethodTag>,
    pub var_tags: Vec<DocTag>,
    pub param_tags: Vec<DocTag>,
}

impl DocComment {
    pub fn find_param_tag(&self, name: &str) -> Option<&DocTag> {
        self.param_tags.iter().find(|t| t.name == name)
    }

    pub fn find_var_tag(&self, name: &str) -> Option<&DocTag> {
        self.var_tags.iter().find(|t| t.name == name || t.name.is_empty())
    }
}

/// Sub-parses a single doc-comment token's text (spec.md §6, "Consumed —
/// Doc-comment parser"). Never implemented by this crate.
pub trait DocCommentParser {
    fn parse(&self, text: &str) -> DocComment;
}
