//! Owned syntax model for a single PHP file.
//!
//! The model only covers what the migration touches: namespaces, imports,
//! class-like declarations and their methods, doc comments and attribute groups.
//! Everything else is kept as an opaque statement with its byte range.
//!
//! Every node lowered from source remembers its byte range in the original text
//! (`origin`). Nodes created by the transformation have no origin; the printer uses
//! this to tell preserved regions from freshly printed ones.

use std::fmt::{self, Write as _};

/// A byte range into the original source (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slice the span out of `source`
    #[must_use]
    pub fn slice(self, source: &str) -> &str {
        &source[self.start..self.end]
    }
}

/// One parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// Top-level statements, in source order.
    pub stmts: Vec<Stmt>,
    /// Byte offset right after the opening `<?php` tag (0 when absent).
    pub header_end: usize,
    /// Ranges of string literals, heredocs, nowdocs and inline HTML. Text inside
    /// them is never normalized.
    pub literals: Vec<Span>,
}

impl SourceUnit {
    /// Index of the first namespace statement, if any.
    #[must_use]
    pub fn first_namespace(&self) -> Option<usize> {
        self.stmts
            .iter()
            .position(|stmt| matches!(stmt, Stmt::Namespace(_)))
    }
}

/// A statement the migration knows how to reason about.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `namespace Foo;` (owning the following statements) or `namespace Foo { ... }`.
    Namespace(Namespace),
    /// A `use` import statement.
    Use(UseStmt),
    /// A class, trait, interface or enum declaration.
    Class(ClassDecl),
    /// A statement that declares classes somewhere inside it: a conditional block,
    /// a function body.
    Enclosing {
        /// Range of the whole statement.
        origin: Span,
        /// The class-like declarations found inside, in source order.
        classes: Vec<ClassDecl>,
    },
    /// `include`/`require` (and their `_once` forms) used as a statement.
    Include(Span),
    /// `declare(strict_types=1);` and friends.
    Declare(Span),
    /// Anything else, preserved verbatim.
    Other(Span),
}

impl Stmt {
    /// Byte range of the statement in the original source, `None` for new nodes.
    ///
    /// For declarations this starts at the attached doc comment.
    #[must_use]
    pub fn origin(&self) -> Option<Span> {
        match self {
            Self::Namespace(ns) => Some(ns.origin),
            Self::Use(use_stmt) => use_stmt.origin,
            Self::Class(class) => Some(class.decl.full_span()),
            Self::Enclosing { origin, .. } => Some(*origin),
            Self::Include(span) | Self::Declare(span) | Self::Other(span) => Some(*span),
        }
    }

    /// Whether this statement is an `include`/`require` or `declare` that must
    /// stay in front of the import block.
    #[must_use]
    pub fn is_preamble(&self) -> bool {
        matches!(self, Self::Include(_) | Self::Declare(_))
    }
}

/// A namespace declaration and the statements it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Range of the namespace declaration itself (for the semicolon form this is
    /// only `namespace Foo;`).
    pub origin: Span,
    /// Offset right after `;` or `{`, where leading imports are anchored.
    pub header_end: usize,
    /// Whether the namespace uses the braced form.
    pub braced: bool,
    /// Statements inside the namespace.
    pub stmts: Vec<Stmt>,
}

/// Kind of symbol an import brings into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImportKind {
    /// `use Foo\Bar;`
    Class,
    /// `use function Foo\bar;`
    Function,
    /// `use const Foo\BAR;`
    Const,
}

/// One imported name.
///
/// Ordering is `(kind, name, alias)`, which is the order of the resolved import list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportDirective {
    /// What kind of symbol is imported.
    pub kind: ImportKind,
    /// Fully qualified name without a leading backslash.
    pub name: String,
    /// `as` alias, if any.
    pub alias: Option<String>,
}

impl ImportDirective {
    /// A plain class import without alias.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: ImportKind::Class,
            name: name.into().trim_start_matches('\\').to_owned(),
            alias: None,
        }
    }
}

impl fmt::Display for ImportDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("use ")?;
        match self.kind {
            ImportKind::Class => {}
            ImportKind::Function => f.write_str("function ")?,
            ImportKind::Const => f.write_str("const ")?,
        }
        f.write_str(&self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        f.write_char(';')
    }
}

/// A `use` statement. Lowered statements may hold several directives
/// (`use A, B;` or `use A\{B, C};`); synthesized ones hold exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct UseStmt {
    /// Range in the original source, `None` when synthesized.
    pub origin: Option<Span>,
    /// Imported names, in statement order.
    pub imports: Vec<ImportDirective>,
}

impl UseStmt {
    /// A synthesized single-directive statement.
    #[must_use]
    pub fn new(import: ImportDirective) -> Self {
        Self {
            origin: None,
            imports: vec![import],
        }
    }
}

/// Which class-like construct a [`ClassDecl`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// `class Foo`
    Class,
    /// `trait Foo`
    Trait,
    /// `interface Foo`
    Interface,
    /// `enum Foo`
    Enum,
}

/// A class-like declaration with its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class, trait, interface or enum.
    pub kind: ClassKind,
    /// The class-level declaration data.
    pub decl: Declaration,
    /// Methods, in source order.
    pub methods: Vec<Declaration>,
}

/// Shared shape of class and method declarations: what migrations read and write.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declared name.
    pub name: String,
    /// Range of the declaration node (attributes included, doc comment excluded).
    pub origin: Span,
    /// Where a first attribute group goes when there is none yet: the start of the
    /// first modifier or keyword.
    pub attr_anchor: usize,
    /// Attached `/** ... */` comment.
    pub doc: Option<DocComment>,
    /// Attribute groups, in source order. Only ever appended to.
    pub attr_groups: Vec<AttributeGroup>,
}

impl Declaration {
    /// Range including the attached doc comment.
    #[must_use]
    pub fn full_span(&self) -> Span {
        let start = self
            .doc
            .as_ref()
            .and_then(|doc| doc.origin)
            .map_or(self.origin.start, |span| span.start.min(self.origin.start));
        Span::new(start, self.origin.end)
    }
}

/// Raw text of a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Range in the original source, `None` when synthesized.
    pub origin: Option<Span>,
    /// Full comment text including `/**` and `*/`.
    pub text: String,
}

impl DocComment {
    /// A doc comment read from source.
    #[must_use]
    pub fn parsed(origin: Span, text: impl Into<String>) -> Self {
        Self {
            origin: Some(origin),
            text: text.into(),
        }
    }
}

/// `#[A, B(...)]`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroup {
    /// Range in the original source, `None` when synthesized.
    pub origin: Option<Span>,
    /// Attributes in the group, in order.
    pub attrs: Vec<Attribute>,
}

impl AttributeGroup {
    /// A synthesized group holding a single attribute.
    #[must_use]
    pub fn single(attr: Attribute) -> Self {
        Self {
            origin: None,
            attrs: vec![attr],
        }
    }
}

impl fmt::Display for AttributeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#[")?;
        for (i, attr) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{attr}")?;
        }
        f.write_char(']')
    }
}

/// A single attribute: a (possibly qualified) name and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Name as written (`Test`, `\PHPUnit\Framework\Attributes\Test`, ...).
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Arg>,
}

impl Attribute {
    /// Build an attribute from a name and unnamed argument values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args: values.into_iter().map(Arg::positional).collect(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_char('(')?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if let Some(name) = &arg.name {
                write!(f, "{name}: ")?;
            }
            write!(f, "{}", arg.value)?;
        }
        f.write_char(')')
    }
}

/// An attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Parameter name for named arguments.
    pub name: Option<String>,
    /// Argument value.
    pub value: Expr,
}

impl Arg {
    /// An unnamed argument.
    #[must_use]
    pub fn positional(value: Expr) -> Self {
        Self { name: None, value }
    }
}

/// The argument expressions attributes can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A string literal. `raw` is the source spelling, quotes included, when parsed.
    String {
        /// Unescaped value.
        value: String,
        /// Source text, when lowered from a file.
        raw: Option<String>,
    },
    /// `Foo::class`
    ClassConst {
        /// The class name as written.
        class: String,
    },
    /// Any other expression, kept as source text.
    Raw(String),
}

impl Expr {
    /// A synthesized string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
            raw: None,
        }
    }

    /// A synthesized `Class::class` reference.
    #[must_use]
    pub fn class_const(class: impl Into<String>) -> Self {
        Self::ClassConst {
            class: class.into(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String { raw: Some(raw), .. } => f.write_str(raw),
            Self::String { value, raw: None } => {
                f.write_char('\'')?;
                for c in value.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('\'')
            }
            Self::ClassConst { class } => write!(f, "{class}::class"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_group_display() {
        let group = AttributeGroup::single(Attribute::new(
            "CoversMethod",
            vec![Expr::class_const("Foo"), Expr::string("bar")],
        ));
        assert_eq!(group.to_string(), "#[CoversMethod(Foo::class, 'bar')]");

        let bare = AttributeGroup::single(Attribute::new("Test", vec![]));
        assert_eq!(bare.to_string(), "#[Test]");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(Expr::string(r"it's a\b").to_string(), r"'it\'s a\\b'");
    }

    #[test]
    fn test_import_display() {
        let import = ImportDirective {
            kind: ImportKind::Function,
            name: "App\\helper".to_owned(),
            alias: Some("h".to_owned()),
        };
        assert_eq!(import.to_string(), "use function App\\helper as h;");
        assert_eq!(
            ImportDirective::class("\\PHPUnit\\Framework\\TestCase").to_string(),
            "use PHPUnit\\Framework\\TestCase;"
        );
    }

    #[test]
    fn test_import_ordering_puts_classes_first() {
        let mut imports = vec![
            ImportDirective {
                kind: ImportKind::Function,
                name: "a".to_owned(),
                alias: None,
            },
            ImportDirective::class("Z"),
            ImportDirective::class("B"),
        ];
        imports.sort();
        assert_eq!(imports[0].name, "B");
        assert_eq!(imports[1].name, "Z");
        assert_eq!(imports[2].kind, ImportKind::Function);
    }

    #[test]
    fn test_full_span_includes_doc() {
        let decl = Declaration {
            name: "Foo".to_owned(),
            origin: Span::new(20, 40),
            attr_anchor: 20,
            doc: Some(DocComment::parsed(Span::new(5, 15), "/** x */")),
            attr_groups: Vec::new(),
        };
        assert_eq!(decl.full_span(), Span::new(5, 40));
    }
}
