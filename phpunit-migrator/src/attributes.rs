//! Structural equality for attributes.
//!
//! Two attributes are equal when their names match as written, they take the same
//! number of arguments, and every argument prints to the same text once the outer
//! quote characters are trimmed. The comparison is intentionally textual: `'A'` and
//! `"A"` are the same argument, `Foo::class` and `\Foo::class` are not.
//!
//! This is the only guard against inserting an attribute twice.

use crate::ast::{Attribute, AttributeGroup, Expr};

/// Canonical text of an argument expression: printed, then stripped of
/// surrounding `'` and `"` characters.
#[must_use]
pub fn canonical_arg(expr: &Expr) -> String {
    expr.to_string()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_owned()
}

/// Compare two attributes structurally.
#[must_use]
pub fn attributes_equal(a: &Attribute, b: &Attribute) -> bool {
    if a.name != b.name {
        return false;
    }

    if a.args.len() != b.args.len() {
        return false;
    }

    a.args
        .iter()
        .zip(&b.args)
        .all(|(a_arg, b_arg)| canonical_arg(&a_arg.value) == canonical_arg(&b_arg.value))
}

/// Compare two attribute groups: same length, pairwise equal attributes.
#[must_use]
pub fn groups_equal(a: &AttributeGroup, b: &AttributeGroup) -> bool {
    a.attrs.len() == b.attrs.len()
        && a.attrs
            .iter()
            .zip(&b.attrs)
            .all(|(a_attr, b_attr)| attributes_equal(a_attr, b_attr))
}

/// Whether any group in `haystack` equals `needle`.
#[must_use]
pub fn contains_group(needle: &AttributeGroup, haystack: &[AttributeGroup]) -> bool {
    haystack.iter().any(|group| groups_equal(needle, group))
}

/// Append `group` unless an equal group is already present.
///
/// Returns whether the group was added.
pub fn push_unique(groups: &mut Vec<AttributeGroup>, group: AttributeGroup) -> bool {
    if contains_group(&group, groups) {
        return false;
    }
    groups.push(group);
    true
}
