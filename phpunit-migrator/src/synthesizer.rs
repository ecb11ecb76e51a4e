//! Builds the attribute groups that replace doc comment directives.
//!
//! Every synthesized group holds exactly one attribute, and building it marks the
//! attribute class as a required import in the current scope.

use crate::ast::{Attribute, AttributeGroup, Expr};
use crate::constants::ATTRIBUTES_NAMESPACE;
use crate::context::{CoversRef, TransformContext};

/// PHPUnit attribute classes produced by the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// `#[Test]`
    Test,
    /// `#[Group('name')]`
    Group,
    /// `#[CoversMethod(Foo::class, 'bar')]`, class level
    CoversMethod,
    /// `#[DataProvider('method')]`
    DataProvider,
}

impl AttributeKind {
    /// Unqualified class name used at the declaration site
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Test => "Test",
            Self::Group => "Group",
            Self::CoversMethod => "CoversMethod",
            Self::DataProvider => "DataProvider",
        }
    }

    /// Fully qualified class name to import
    #[must_use]
    pub fn import_name(self) -> String {
        format!("{ATTRIBUTES_NAMESPACE}\\{}", self.short_name())
    }
}

/// One attribute to synthesize, with its directive payload.
#[derive(Debug, Clone, Copy)]
pub enum Directive<'a> {
    /// From `@test`
    Test,
    /// From `@group <name>`
    Group(&'a str),
    /// From `@dataProvider <method>`
    DataProvider(&'a str),
    /// From `@covers Class::method`
    CoversMethod(&'a CoversRef),
}

impl Directive<'_> {
    /// Which attribute class this produces
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Test => AttributeKind::Test,
            Self::Group(_) => AttributeKind::Group,
            Self::DataProvider(_) => AttributeKind::DataProvider,
            Self::CoversMethod(_) => AttributeKind::CoversMethod,
        }
    }
}

/// Build the attribute group for `directive` and record its import in `context`.
pub fn synthesize(directive: Directive<'_>, context: &mut TransformContext) -> AttributeGroup {
    let kind = directive.kind();
    context.require_import(kind.import_name());

    let args = match directive {
        Directive::Test => Vec::new(),
        Directive::Group(value) | Directive::DataProvider(value) => {
            vec![Expr::string(value)]
        }
        Directive::CoversMethod(reference) => vec![
            Expr::class_const(reference.class.as_str()),
            Expr::string(reference.method.as_str()),
        ],
    };

    AttributeGroup::single(Attribute::new(kind.short_name(), args))
}
