//! Import list handling: reading `use` statements and resolving the final list.
//!
//! The resolved list of a scope is the sorted, deduplicated union of the imports
//! already present and the attribute classes the transformation requires. It is
//! written back one directive per statement, right after the namespace declaration or,
//! in a file without namespace, after the leading `declare`/`require` statements.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::{ImportDirective, ImportKind, SourceUnit, Stmt, UseStmt};
use crate::context::{ImportScope, TransformContext};

/// Parse the source text of a `use` declaration into its directives.
///
/// Handles `function`/`const` imports, aliases, comma lists and the group form
/// `use A\{B, C as D};`.
#[must_use]
pub fn parse_use_declaration(text: &str) -> Vec<ImportDirective> {
    let body = text.trim().trim_end_matches(';').trim_end();
    let Some(body) = strip_keyword(body, "use") else {
        return Vec::new();
    };
    let (kind, body) = split_kind(body, ImportKind::Class);

    if let Some(open) = body.find('{') {
        let prefix = body[..open].trim().trim_end_matches('\\');
        let inner = body[open + 1..].trim_end().trim_end_matches('}');
        return inner
            .split(',')
            .filter_map(|item| {
                let (kind, item) = split_kind(item.trim(), kind);
                parse_item(kind, item).map(|mut directive| {
                    directive.name = format!("{}\\{}", prefix.trim_start_matches('\\'), directive.name);
                    directive
                })
            })
            .collect();
    }

    body.split(',')
        .filter_map(|item| parse_item(kind, item.trim()))
        .collect()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

fn split_kind(text: &str, default: ImportKind) -> (ImportKind, &str) {
    if let Some(rest) = strip_keyword(text, "function") {
        (ImportKind::Function, rest)
    } else if let Some(rest) = strip_keyword(text, "const") {
        (ImportKind::Const, rest)
    } else {
        (default, text)
    }
}

fn parse_item(kind: ImportKind, item: &str) -> Option<ImportDirective> {
    let parts: Vec<&str> = item.split_whitespace().collect();
    let (name, alias) = match parts.as_slice() {
        [name] => (*name, None),
        [name, keyword, alias] if keyword.eq_ignore_ascii_case("as") => {
            (*name, Some((*alias).to_owned()))
        }
        _ => return None,
    };
    Some(ImportDirective {
        kind,
        name: name.trim_start_matches('\\').to_owned(),
        alias,
    })
}

/// Directives of every `use` statement in `stmts`, in statement order.
#[must_use]
pub fn present_imports(stmts: &[Stmt]) -> Vec<ImportDirective> {
    stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Use(use_stmt) => Some(use_stmt.imports.iter().cloned()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// Prepend a single-directive `use` statement for every required class name not yet
/// imported by `stmts`. Returns how many were added.
pub fn insert_missing_imports(stmts: &mut Vec<Stmt>, required: &BTreeSet<String>) -> usize {
    let present = present_imports(stmts);
    let missing: Vec<Stmt> = required
        .iter()
        .map(ImportDirective::class)
        .filter(|needed| {
            !present
                .iter()
                .any(|have| have.kind == ImportKind::Class && have.name == needed.name)
        })
        .map(|import| Stmt::Use(UseStmt::new(import)))
        .collect();

    let added = missing.len();
    stmts.splice(0..0, missing);
    added
}

/// Resolve the import list of the file's import scope.
///
/// The scope is the first namespace when there is one, the file otherwise. Nothing
/// happens when the scope required no import, or when its imports are already the
/// resolved list with one directive per statement. Returns whether `unit` changed.
pub fn resolve_imports(unit: &mut SourceUnit, context: &TransformContext) -> bool {
    let scope = unit
        .first_namespace()
        .map_or(ImportScope::Global, ImportScope::Namespace);
    let required = context.required_imports(scope);
    if required.is_empty() {
        return false;
    }

    let stmts = match scope {
        ImportScope::Global => &mut unit.stmts,
        ImportScope::Namespace(index) => match &mut unit.stmts[index] {
            Stmt::Namespace(ns) => &mut ns.stmts,
            _ => return false,
        },
    };

    let present = present_imports(stmts);
    let resolved: Vec<ImportDirective> = present
        .iter()
        .cloned()
        .chain(required.iter().map(ImportDirective::class))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let one_per_statement = stmts.iter().all(|stmt| match stmt {
        Stmt::Use(use_stmt) => use_stmt.imports.len() == 1,
        _ => true,
    });
    if one_per_statement && present == resolved {
        return false;
    }

    debug!(
        scope = ?scope,
        present = present.len(),
        resolved = resolved.len(),
        "rewriting import list"
    );

    stmts.retain(|stmt| !matches!(stmt, Stmt::Use(_)));
    let at = match scope {
        ImportScope::Namespace(_) => 0,
        ImportScope::Global => stmts.iter().take_while(|stmt| stmt.is_preamble()).count(),
    };
    stmts.splice(
        at..at,
        resolved
            .into_iter()
            .map(|import| Stmt::Use(UseStmt::new(import))),
    );
    true
}
