//! CST → syntax model lowering.
//!
//! Walks the tree-sitter PHP tree and builds the [`SourceUnit`] the transformation
//! works on.
//!
//! # Design Principles
//!
//! - **Byte-range anchored**: every lowered node keeps its span; nothing is re-derived later
//! - **Doc comments belong to declarations**: across whitespace and plain comments, never
//!   across code
//! - **Unknown is opaque**: statements the migration does not care about become [`Stmt::Other`]

use std::sync::OnceLock;

use regex::Regex;

use super::comments::PendingDoc;
use super::parser::{CstNode, CstTree};
use crate::ast::{
    Arg, Attribute, AttributeGroup, ClassDecl, ClassKind, Declaration, DocComment, Expr,
    Namespace, SourceUnit, Span, Stmt, UseStmt,
};
use crate::imports::parse_use_declaration;

/// Nodes whose text is program data and must survive byte for byte.
const LITERAL_KINDS: &[&str] = &["string", "encapsed_string", "heredoc", "nowdoc", "text"];

const INCLUDE_KINDS: &[&str] = &[
    "include_expression",
    "include_once_expression",
    "require_expression",
    "require_once_expression",
];

/// Lower a parsed tree into a [`SourceUnit`].
#[must_use]
pub fn lower(tree: &CstTree) -> SourceUnit {
    let source = tree.source.as_str();
    let header_end = tree
        .root
        .child_of_kind("php_tag")
        .map_or(0, |tag| tag.end_byte);

    let mut stmts = Vec::new();
    let mut open_namespace: Option<Namespace> = None;
    let mut pending = PendingDoc::default();

    for child in &tree.root.children {
        if child.kind == "namespace_definition" {
            pending.observe(child, source);
            if let Some(ns) = open_namespace.take() {
                stmts.push(Stmt::Namespace(ns));
            }
            let ns = lower_namespace(child, source);
            if ns.braced {
                stmts.push(Stmt::Namespace(ns));
            } else {
                open_namespace = Some(ns);
            }
            continue;
        }

        let Some(stmt) = lower_statement(child, source, &mut pending) else {
            continue;
        };
        match open_namespace.as_mut() {
            Some(ns) => ns.stmts.push(stmt),
            None => stmts.push(stmt),
        }
    }

    if let Some(ns) = open_namespace {
        stmts.push(Stmt::Namespace(ns));
    }

    let mut literals = Vec::new();
    collect_literals(&tree.root, &mut literals);

    SourceUnit {
        stmts,
        header_end,
        literals,
    }
}

fn collect_literals(node: &CstNode, literals: &mut Vec<Span>) {
    if LITERAL_KINDS.contains(&node.kind.as_str()) {
        literals.push(Span::new(node.start_byte, node.end_byte));
        return;
    }
    for child in &node.children {
        collect_literals(child, literals);
    }
}

fn class_kind(kind: &str) -> Option<ClassKind> {
    match kind {
        "class_declaration" => Some(ClassKind::Class),
        "trait_declaration" => Some(ClassKind::Trait),
        "interface_declaration" => Some(ClassKind::Interface),
        "enum_declaration" => Some(ClassKind::Enum),
        _ => None,
    }
}

fn lower_namespace(node: &CstNode, source: &str) -> Namespace {
    match node.child_of_kind("compound_statement") {
        Some(body) => {
            let header_end = body
                .children
                .first()
                .filter(|open| open.kind == "{")
                .map_or(body.start_byte + 1, |open| open.end_byte);
            Namespace {
                origin: Span::new(node.start_byte, node.end_byte),
                header_end,
                braced: true,
                stmts: lower_block(body, source),
            }
        }
        None => Namespace {
            origin: Span::new(node.start_byte, node.end_byte),
            header_end: node.end_byte,
            braced: false,
            stmts: Vec::new(),
        },
    }
}

fn lower_block(block: &CstNode, source: &str) -> Vec<Stmt> {
    let mut pending = PendingDoc::default();
    block
        .children
        .iter()
        .filter_map(|child| lower_statement(child, source, &mut pending))
        .collect()
}

/// Lower one sibling. Comments and punctuation yield `None` but still feed the
/// doc-comment tracker.
fn lower_statement(node: &CstNode, source: &str, pending: &mut PendingDoc) -> Option<Stmt> {
    if node.kind == "comment" {
        pending.observe(node, source);
        return None;
    }
    if !node.is_named || node.kind == "php_tag" {
        return None;
    }

    let span = Span::new(node.start_byte, node.end_byte);
    if let Some(kind) = class_kind(&node.kind) {
        let doc = pending.take_for(node.start_byte, source).map(doc_from_comment);
        pending.observe(node, source);
        return Some(Stmt::Class(lower_class(node, kind, doc, source)));
    }

    let stmt = match node.kind.as_str() {
        "namespace_use_declaration" => Stmt::Use(UseStmt {
            origin: Some(span),
            imports: parse_use_declaration(node.text(source)),
        }),
        "declare_statement" => Stmt::Declare(span),
        "expression_statement" if is_include(node) => Stmt::Include(span),
        _ => {
            let mut classes = Vec::new();
            collect_nested_classes(node, source, &mut classes);
            if classes.is_empty() {
                Stmt::Other(span)
            } else {
                Stmt::Enclosing {
                    origin: span,
                    classes,
                }
            }
        }
    };
    pending.observe(node, source);
    Some(stmt)
}

/// Class-like declarations inside blocks and function bodies of a statement.
///
/// Class bodies, anonymous classes included, are not searched.
fn collect_nested_classes(node: &CstNode, source: &str, classes: &mut Vec<ClassDecl>) {
    let mut pending = PendingDoc::default();
    for child in &node.children {
        if let Some(kind) = class_kind(&child.kind) {
            let doc = pending.take_for(child.start_byte, source).map(doc_from_comment);
            classes.push(lower_class(child, kind, doc, source));
        } else if child.kind != "anonymous_class" {
            collect_nested_classes(child, source, classes);
        }
        pending.observe(child, source);
    }
}

fn is_include(node: &CstNode) -> bool {
    node.named_children()
        .next()
        .is_some_and(|expr| INCLUDE_KINDS.contains(&expr.kind.as_str()))
}

fn doc_from_comment(comment: super::comments::Comment) -> DocComment {
    DocComment::parsed(
        Span::new(comment.start_byte, comment.end_byte),
        comment.text,
    )
}

fn lower_class(node: &CstNode, kind: ClassKind, doc: Option<DocComment>, source: &str) -> ClassDecl {
    let mut methods = Vec::new();
    let body = node
        .child_of_kind("declaration_list")
        .or_else(|| node.child_of_kind("enum_declaration_list"));
    if let Some(body) = body {
        let mut pending = PendingDoc::default();
        for member in &body.children {
            if member.kind == "method_declaration" {
                let doc = pending
                    .take_for(member.start_byte, source)
                    .map(doc_from_comment);
                methods.push(lower_declaration(member, doc, source));
            }
            pending.observe(member, source);
        }
    }

    ClassDecl {
        kind,
        decl: lower_declaration(node, doc, source),
        methods,
    }
}

fn lower_declaration(node: &CstNode, doc: Option<DocComment>, source: &str) -> Declaration {
    let name = node
        .child_of_kind("name")
        .map(|name| name.text(source).to_owned())
        .unwrap_or_default();

    let attr_anchor = node
        .children
        .iter()
        .find(|child| child.kind != "attribute_list" && child.kind != "comment")
        .map_or(node.start_byte, |child| child.start_byte);

    let attr_groups = node
        .child_of_kind("attribute_list")
        .map(|list| {
            list.children
                .iter()
                .filter(|group| group.kind == "attribute_group")
                .map(|group| lower_attribute_group(group, source))
                .collect()
        })
        .unwrap_or_default();

    Declaration {
        name,
        origin: Span::new(node.start_byte, node.end_byte),
        attr_anchor,
        doc,
        attr_groups,
    }
}

fn lower_attribute_group(group: &CstNode, source: &str) -> AttributeGroup {
    let attrs = group
        .children
        .iter()
        .filter(|attr| attr.kind == "attribute")
        .map(|attr| lower_attribute(attr, source))
        .collect();

    AttributeGroup {
        origin: Some(Span::new(group.start_byte, group.end_byte)),
        attrs,
    }
}

fn lower_attribute(attr: &CstNode, source: &str) -> Attribute {
    let name = attr
        .children
        .iter()
        .find(|child| child.kind == "name" || child.kind == "qualified_name")
        .map_or_else(
            || {
                let text = attr.text(source);
                text.split('(').next().unwrap_or(text).trim().to_owned()
            },
            |name| name.text(source).to_owned(),
        );

    let args = attr
        .child_of_kind("arguments")
        .map(|arguments| {
            arguments
                .children
                .iter()
                .filter(|arg| arg.kind == "argument")
                .map(|arg| lower_argument(arg.text(source)))
                .collect()
        })
        .unwrap_or_default();

    Attribute { name, args }
}

/// Split `name: value` and classify the value.
fn lower_argument(text: &str) -> Arg {
    let text = text.trim();
    if let Some((name, value)) = split_named_argument(text) {
        return Arg {
            name: Some(name.to_owned()),
            value: classify_expr(value),
        };
    }
    Arg::positional(classify_expr(text))
}

fn split_named_argument(text: &str) -> Option<(&str, &str)> {
    let ident_len = text
        .char_indices()
        .take_while(|&(i, c)| c == '_' || c.is_alphabetic() || (i > 0 && c.is_ascii_digit()))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    let rest = text[ident_len..].trim_start();
    let value = rest.strip_prefix(':')?;
    if value.starts_with(':') {
        return None;
    }
    Some((&text[..ident_len], value.trim()))
}

fn class_const_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(\\?[A-Za-z_][A-Za-z0-9_\\]*)\s*::\s*class$")
            .expect("Invalid class constant regex pattern")
    })
}

fn classify_expr(text: &str) -> Expr {
    let quoted = |q: char| text.len() >= 2 && text.starts_with(q) && text.ends_with(q);
    if quoted('\'') {
        let inner = &text[1..text.len() - 1];
        return Expr::String {
            value: inner.replace("\\'", "'").replace("\\\\", "\\"),
            raw: Some(text.to_owned()),
        };
    }
    if quoted('"') {
        return Expr::String {
            value: text[1..text.len() - 1].to_owned(),
            raw: Some(text.to_owned()),
        };
    }
    if let Some(caps) = class_const_re().captures(text) {
        return Expr::class_const(&caps[1]);
    }
    Expr::Raw(text.to_owned())
}
