//! The single-traversal symbol reader (spec.md §4.3).

use crate::base::{DocumentUri, Name};
use crate::resolve::ResolverState;
use crate::symbols::symbol::{AssociatedRef, Modifiers, Symbol, SymbolKind, TypeSource};
use crate::symbols::visitor::{DocComment, DocCommentParser, ParsedDocument, Phrase, PhraseId, PhraseKind, TokenKind, Visitor};
use crate::typestr::TypeString;

/// Superglobal names the reader never emits as Variable symbols (spec.md §4.3).
const SUPERGLOBALS: &[&str] = &[
    "$GLOBALS",
    "$_SERVER",
    "$_GET",
    "$_POST",
    "$_FILES",
    "$_REQUEST",
    "$_SESSION",
    "$_ENV",
    "$_COOKIE",
    "$php_errormsg",
    "$HTTP_RAW_POST_DATA",
    "$http_response_header",
    "$argc",
    "$argv",
    "$this",
];

/// The one configurable surface of the reader (spec.md §4.3 "fixed set of
/// superglobal names"): a host embedding a dialect with additional
/// implicit globals can extend the exclusion list without forking the
/// reader.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    pub extra_excluded_variables: Vec<Name>,
}

/// What to do for a node's `post_order` callback, decided when its
/// `pre_order` callback ran (kept 1:1 with every visited node so the stack
/// never desyncs).
enum OpenAction {
    None,
    ResetNamespace,
    CloseAndAttach,
    CloseAndAttachRestoringThis(String, String),
}

/// Builds a [`Symbol`] tree from one parsed document by a single
/// depth-first traversal, maintaining the **spine** — the stack of
/// currently-open symbols — described in spec.md §4.3.
pub struct SymbolReader<'a, D: DocCommentParser> {
    uri: DocumentUri,
    doc: &'a dyn ParsedDocument,
    doc_parser: &'a D,
    options: ReaderOptions,
    resolver: ResolverState,
    spine: Vec<Symbol>,
    open_stack: Vec<OpenAction>,
    last_doc: Option<DocComment>,
}

impl<'a, D: DocCommentParser> SymbolReader<'a, D> {
    pub fn new(uri: DocumentUri, doc: &'a dyn ParsedDocument, doc_parser: &'a D, options: ReaderOptions) -> Self {
        Self {
            uri,
            doc,
            doc_parser,
            options,
            resolver: ResolverState::new(),
            spine: vec![Symbol::root()],
            open_stack: Vec::new(),
            last_doc: None,
        }
    }

    /// Run the traversal and return the completed per-document root symbol
    /// plus the resolver state as it stood at the end of the document
    /// (namespace of the last open namespace, etc).
    pub fn read(mut self) -> (Symbol, ResolverState) {
        let doc = self.doc;
        doc.accept(&mut self);
        let root = self.spine.pop().expect("reader spine underflow: root missing at end of traversal");
        (root, self.resolver)
    }

    fn current(&mut self) -> &mut Symbol {
        self.spine.last_mut().expect("reader spine underflow")
    }

    fn open(&mut self, sym: Symbol) {
        self.spine.push(sym);
    }

    fn close(&mut self) -> Symbol {
        self.spine.pop().expect("reader spine underflow on close")
    }

    fn attach(&mut self, sym: Symbol) {
        self.current().push_child(sym);
    }

    fn is_excluded_variable(&self, name: &str) -> bool {
        SUPERGLOBALS.contains(&name) || self.options.extra_excluded_variables.iter().any(|n| n.as_str() == name)
    }

    /// Emit a Variable child of the current spine top unless it is a
    /// superglobal or already present among the current top's
    /// Parameter/Variable children (spec.md §4.3 "Simple variable").
    fn emit_variable(&mut self, name: &str, span: crate::base::Span, ty: Option<TypeString>) {
        if name.is_empty() || self.is_excluded_variable(name) {
            return;
        }
        let dup = self.current().children.iter().any(|c| {
            matches!(c.kind, SymbolKind::Parameter | SymbolKind::Variable) && c.name.as_str() == name
        });
        if dup {
            return;
        }
        let mut sym = Symbol::new(SymbolKind::Variable, name);
        sym.location = Some((self.uri.clone(), span));
        sym.r#type = ty;
        self.attach(sym);
    }

    fn take_last_doc(&mut self) -> Option<DocComment> {
        self.last_doc.take()
    }

    /// Synthetic Magic-modifier members from `@property`/`@property-read`/
    /// `@property-write`/`@method` doc tags (spec.md §4.3 "Class /
    /// interface / trait declaration").
    fn apply_magic_tags(&mut self, doc: &DocComment) {
        for tag in &doc.property_tags {
            let mut sym = Symbol::new(SymbolKind::Property, tag.name.as_str());
            sym.modifiers = Modifiers::MAGIC;
            sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
            sym.description = tag.description.clone();
            sym.type_source = Some(TypeSource::PhpDoc);
            self.attach(sym);
        }
        for tag in &doc.property_read_tags {
            let mut sym = Symbol::new(SymbolKind::Property, tag.name.as_str());
            sym.modifiers = Modifiers::MAGIC | Modifiers::READONLY;
            sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
            sym.description = tag.description.clone();
            sym.type_source = Some(TypeSource::PhpDoc);
            self.attach(sym);
        }
        for tag in &doc.property_write_tags {
            let mut sym = Symbol::new(SymbolKind::Property, tag.name.as_str());
            sym.modifiers = Modifiers::MAGIC | Modifiers::WRITEONLY;
            sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
            sym.description = tag.description.clone();
            sym.type_source = Some(TypeSource::PhpDoc);
            self.attach(sym);
        }
        for tag in &doc.method_tags {
            let mut sym = Symbol::new(SymbolKind::Method, tag.name.as_str());
            sym.modifiers = Modifiers::MAGIC;
            sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
            sym.description = tag.description.clone();
            sym.type_source = Some(TypeSource::PhpDoc);
            for (pname, ptype) in &tag.parameters {
                let mut psym = Symbol::new(SymbolKind::Parameter, pname.as_str());
                psym.r#type = Some(TypeString::parse(ptype).name_resolve(&self.resolver));
                sym.push_child(psym);
            }
            self.attach(sym);
        }
    }

    fn modifiers_from_list_child(node: &Phrase) -> Modifiers {
        let mut m = Modifiers::NONE;
        if let Some(list) = node.children.iter().find(|c| c.kind == PhraseKind::MemberModifierList) {
            for tok in &list.children {
                m |= match tok.token_kind {
                    Some(TokenKind::ModPublic) => Modifiers::PUBLIC,
                    Some(TokenKind::ModProtected) => Modifiers::PROTECTED,
                    Some(TokenKind::ModPrivate) => Modifiers::PRIVATE,
                    Some(TokenKind::ModFinal) => Modifiers::FINAL,
                    Some(TokenKind::ModAbstract) => Modifiers::ABSTRACT,
                    Some(TokenKind::ModStatic) => Modifiers::STATIC,
                    Some(TokenKind::ModReadonly) => Modifiers::READONLY,
                    None => Modifiers::NONE,
                };
            }
        }
        m
    }

    /// Names listed directly as this node's children's `text`, falling
    /// back to the node's own `text` for the single-name shape.
    fn clause_names(node: &Phrase) -> Vec<String> {
        if !node.children.is_empty() {
            node.children.iter().filter_map(|c| c.text.clone()).collect()
        } else {
            node.text.clone().into_iter().collect()
        }
    }

    fn handle_enter(&mut self, node: &Phrase) -> OpenAction {
        match node.kind {
            PhraseKind::NamespaceDefinition => {
                let name = node.text.clone().unwrap_or_default();
                self.resolver.namespace_name = name.clone();
                let mut sym = Symbol::new(SymbolKind::Namespace, name.as_str());
                sym.location = Some((self.uri.clone(), node.span));
                if node.children.is_empty() {
                    self.attach(sym);
                    OpenAction::ResetNamespace
                } else {
                    self.open(sym);
                    OpenAction::CloseAndAttach
                }
            }

            PhraseKind::NamespaceUseClause => {
                let kind = match node.token_kind {
                    Some(TokenKind::UseFunction) => SymbolKind::Function,
                    Some(TokenKind::UseConst) => SymbolKind::Constant,
                    _ => SymbolKind::Class,
                };
                let fqn = node.text.clone().unwrap_or_default();
                let local = node
                    .alias
                    .clone()
                    .unwrap_or_else(|| fqn.rsplit('\\').next().unwrap_or(&fqn).to_string());
                self.resolver.add_import(kind, local.as_str(), fqn.as_str());
                OpenAction::None
            }

            PhraseKind::ConstElement => {
                let name = node.text.clone().unwrap_or_default();
                let fqn = self.resolver.resolve_relative(&name);
                let mut sym = Symbol::new(SymbolKind::Constant, fqn);
                sym.location = Some((self.uri.clone(), node.span));
                sym.value = node.value.clone();
                if let Some(doc) = self.take_last_doc() {
                    if let Some(tag) = doc.find_var_tag("") {
                        sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
                        sym.description = tag.description.clone();
                        sym.type_source = Some(TypeSource::PhpDoc);
                    }
                }
                self.attach(sym);
                OpenAction::None
            }

            PhraseKind::FunctionDeclaration => {
                self.open(Symbol::new(SymbolKind::Function, ""));
                OpenAction::CloseAndAttach
            }

            PhraseKind::FunctionDeclarationHeader => {
                let name = node.text.clone().unwrap_or_default();
                let fqn = self.resolver.resolve_relative(&name);
                let doc = self.take_last_doc();
                let top = self.current();
                top.name = fqn.into();
                top.location = Some((self.uri.clone(), node.span));
                if let Some(doc) = doc {
                    if let Some(ret) = &doc.return_tag {
                        top.r#type = Some(TypeString::parse(&ret.type_string).name_resolve(&self.resolver));
                        top.type_source = Some(TypeSource::PhpDoc);
                        top.description = ret.description.clone();
                    }
                }
                OpenAction::None
            }

            PhraseKind::MethodDeclaration => {
                self.open(Symbol::new(SymbolKind::Method, ""));
                OpenAction::CloseAndAttach
            }

            PhraseKind::MethodDeclarationHeader => {
                let name = node.text.clone().unwrap_or_default();
                let modifiers = Self::modifiers_from_list_child(node);
                let doc = self.take_last_doc();
                let top = self.current();
                top.name = name.into();
                top.modifiers = modifiers;
                top.location = Some((self.uri.clone(), node.span));
                if let Some(doc) = doc {
                    if let Some(ret) = &doc.return_tag {
                        top.r#type = Some(TypeString::parse(&ret.type_string).name_resolve(&self.resolver));
                        top.type_source = Some(TypeSource::PhpDoc);
                        top.description = ret.description.clone();
                    }
                }
                OpenAction::None
            }

            PhraseKind::ParameterDeclaration => {
                let name = node.text.clone().unwrap_or_default();
                let mut sym = Symbol::new(SymbolKind::Parameter, name.as_str());
                sym.location = Some((self.uri.clone(), node.span));
                sym.value = node.value.clone();
                if let Some(doc) = &self.last_doc {
                    if let Some(tag) = doc.find_param_tag(&name) {
                        sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
                        sym.description = tag.description.clone();
                        sym.type_source = Some(TypeSource::PhpDoc);
                    }
                }
                self.open(sym);
                OpenAction::CloseAndAttach
            }

            PhraseKind::TypeDeclaration => {
                let raw = node.text.clone().unwrap_or_default();
                let ts = TypeString::parse(&raw).name_resolve(&self.resolver);
                let top = self.current();
                top.r#type = Some(ts);
                top.type_source = Some(TypeSource::TypeDeclaration);
                OpenAction::None
            }

            PhraseKind::ClassDeclaration | PhraseKind::InterfaceDeclaration | PhraseKind::TraitDeclaration => {
                let kind = match node.kind {
                    PhraseKind::InterfaceDeclaration => SymbolKind::Interface,
                    PhraseKind::TraitDeclaration => SymbolKind::Trait,
                    _ => SymbolKind::Class,
                };
                let saved = (self.resolver.this_name.clone(), self.resolver.this_base_name.clone());
                self.resolver.this_base_name.clear();
                self.open(Symbol::new(kind, ""));
                OpenAction::CloseAndAttachRestoringThis(saved.0, saved.1)
            }

            PhraseKind::AnonymousClassDeclaration => {
                let name = self.doc.anonymous_name(node);
                let saved = (self.resolver.this_name.clone(), self.resolver.this_base_name.clone());
                self.resolver.this_name = name.clone();
                self.resolver.this_base_name.clear();
                let mut sym = Symbol::new(SymbolKind::Class, name);
                sym.modifiers = Modifiers::ANONYMOUS;
                sym.location = Some((self.uri.clone(), node.span));
                self.open(sym);
                OpenAction::CloseAndAttachRestoringThis(saved.0, saved.1)
            }

            PhraseKind::ClassDeclarationHeader => {
                let name = node.text.clone().unwrap_or_default();
                let fqn = self.resolver.resolve_relative(&name);
                let modifiers = Self::modifiers_from_list_child(node);
                self.resolver.this_name = fqn.clone();
                let doc = self.take_last_doc();
                {
                    let top = self.current();
                    top.name = fqn.into();
                    top.modifiers = modifiers;
                    top.location = Some((self.uri.clone(), node.span));
                }
                if let Some(doc) = doc {
                    self.apply_magic_tags(&doc);
                }
                OpenAction::None
            }

            PhraseKind::ClassBaseClause => {
                let assoc_kind = if self.current().kind == SymbolKind::Interface {
                    SymbolKind::Interface
                } else {
                    SymbolKind::Class
                };
                let mut first = true;
                for name in Self::clause_names(node) {
                    let fqn = self.resolver.resolve_not_fully_qualified(&name, SymbolKind::Class);
                    if first && assoc_kind == SymbolKind::Class {
                        self.resolver.this_base_name = fqn.clone();
                        first = false;
                    }
                    self.current().associated.push(AssociatedRef::new(assoc_kind, fqn.as_str()));
                }
                OpenAction::None
            }

            PhraseKind::ClassInterfaceClause => {
                for name in Self::clause_names(node) {
                    let fqn = self.resolver.resolve_not_fully_qualified(&name, SymbolKind::Class);
                    self.current().associated.push(AssociatedRef::new(SymbolKind::Interface, fqn.as_str()));
                }
                OpenAction::None
            }

            PhraseKind::TraitUseClause => {
                for name in Self::clause_names(node) {
                    let fqn = self.resolver.resolve_not_fully_qualified(&name, SymbolKind::Class);
                    self.current().associated.push(AssociatedRef::new(SymbolKind::Trait, fqn.as_str()));
                }
                OpenAction::None
            }

            PhraseKind::ClassConstDeclaration => {
                let mut modifiers = Self::modifiers_from_list_child(node);
                if !modifiers.intersects(Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE) {
                    modifiers |= Modifiers::PUBLIC;
                }
                for child in &node.children {
                    if child.kind != PhraseKind::ClassConstElement {
                        continue;
                    }
                    let name = child.text.clone().unwrap_or_default();
                    let mut sym = Symbol::new(SymbolKind::ClassConstant, name.as_str());
                    sym.modifiers = modifiers;
                    sym.value = child.value.clone();
                    sym.location = Some((self.uri.clone(), child.span));
                    self.attach(sym);
                }
                OpenAction::None
            }

            PhraseKind::PropertyDeclaration => {
                let modifiers = Self::modifiers_from_list_child(node);
                for child in &node.children {
                    if child.kind != PhraseKind::PropertyElement {
                        continue;
                    }
                    let name = child.text.clone().unwrap_or_default();
                    let mut sym = Symbol::new(SymbolKind::Property, name.as_str());
                    sym.modifiers = modifiers;
                    sym.value = child.value.clone();
                    sym.location = Some((self.uri.clone(), child.span));
                    if let Some(type_child) = child.children.iter().find(|c| c.kind == PhraseKind::TypeDeclaration) {
                        let raw = type_child.text.clone().unwrap_or_default();
                        sym.r#type = Some(TypeString::parse(&raw).name_resolve(&self.resolver));
                        sym.type_source = Some(TypeSource::TypeDeclaration);
                    } else if let Some(doc) = &self.last_doc {
                        if let Some(tag) = doc.find_var_tag(&name) {
                            sym.r#type = Some(TypeString::parse(&tag.type_string).name_resolve(&self.resolver));
                            sym.description = tag.description.clone();
                            sym.type_source = Some(TypeSource::PhpDoc);
                        }
                    }
                    self.attach(sym);
                }
                OpenAction::None
            }

            PhraseKind::AnonymousFunctionCreationExpression => {
                let name = self.doc.anonymous_name(node);
                let mut sym = Symbol::new(SymbolKind::Function, name);
                sym.modifiers = Modifiers::ANONYMOUS;
                sym.location = Some((self.uri.clone(), node.span));
                self.open(sym);
                OpenAction::CloseAndAttach
            }

            PhraseKind::Assignment | PhraseKind::ByRefAssignment => {
                if let Some(lhs) = node.children.first() {
                    match lhs.kind {
                        PhraseKind::SimpleVariable => {
                            let name = lhs.text.clone().unwrap_or_default();
                            self.emit_variable(&name, lhs.span, None);
                        }
                        PhraseKind::ListIntrinsic => {
                            for el in &lhs.children {
                                if el.kind == PhraseKind::SimpleVariable {
                                    let name = el.text.clone().unwrap_or_default();
                                    self.emit_variable(&name, el.span, None);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                OpenAction::None
            }

            PhraseKind::ForeachStatement => {
                for child in &node.children {
                    match child.kind {
                        PhraseKind::ForeachKey | PhraseKind::ForeachValue => {
                            if let Some(v) = child.children.first() {
                                if v.kind == PhraseKind::SimpleVariable {
                                    let name = v.text.clone().unwrap_or_default();
                                    self.emit_variable(&name, v.span, None);
                                } else if v.kind == PhraseKind::ListIntrinsic {
                                    for el in &v.children {
                                        if el.kind == PhraseKind::SimpleVariable {
                                            let name = el.text.clone().unwrap_or_default();
                                            self.emit_variable(&name, el.span, None);
                                        }
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                OpenAction::None
            }

            PhraseKind::CatchClause => {
                let names: Vec<String> = node
                    .children
                    .iter()
                    .find(|c| c.kind == PhraseKind::CatchNameList)
                    .map(Self::clause_names)
                    .unwrap_or_default();
                if let Some(var) = node.children.iter().find(|c| c.kind == PhraseKind::SimpleVariable) {
                    let varname = var.text.clone().unwrap_or_default();
                    let mut ts = TypeString::empty();
                    for n in names {
                        let fqn = self.resolver.resolve_not_fully_qualified(&n, SymbolKind::Class);
                        ts = ts.merge(TypeString::from(fqn.as_str()));
                    }
                    self.emit_variable(&varname, var.span, Some(ts));
                }
                OpenAction::None
            }

            PhraseKind::DocumentComment => {
                let text = node.text.clone().unwrap_or_default();
                self.last_doc = Some(self.doc_parser.parse(&text));
                OpenAction::None
            }

            PhraseKind::CloseBraceToken => {
                self.last_doc = None;
                OpenAction::None
            }

            _ => OpenAction::None,
        }
    }

    fn handle_exit(&mut self, action: OpenAction) {
        match action {
            OpenAction::None => {}
            OpenAction::ResetNamespace => {
                self.resolver.namespace_name.clear();
            }
            OpenAction::CloseAndAttach => {
                let done = self.close();
                self.attach(done);
            }
            OpenAction::CloseAndAttachRestoringThis(this_name, this_base_name) => {
                let done = self.close();
                self.attach(done);
                self.resolver.this_name = this_name;
                self.resolver.this_base_name = this_base_name;
            }
        }
    }
}

impl<'a, D: DocCommentParser> Visitor for SymbolReader<'a, D> {
    fn pre_order(&mut self, node: &Phrase, _ancestry: &[PhraseId]) -> bool {
        let skip_children = matches!(
            node.kind,
            PhraseKind::NamespaceUseClause
                | PhraseKind::ClassBaseClause
                | PhraseKind::ClassInterfaceClause
                | PhraseKind::TraitUseClause
                | PhraseKind::ClassConstDeclaration
                | PhraseKind::PropertyDeclaration
                | PhraseKind::CatchClause
                | PhraseKind::Assignment
                | PhraseKind::ByRefAssignment
                | PhraseKind::ForeachStatement
        );
        let action = self.handle_enter(node);
        self.open_stack.push(action);
        !skip_children
    }

    fn post_order(&mut self, _node: &Phrase, _ancestry: &[PhraseId]) {
        let action = self.open_stack.pop().unwrap_or(OpenAction::None);
        self.handle_exit(action);
    }
}
