//! Format-preserving printer.
//!
//! Compares the transformed [`SourceUnit`] against the unit as it was parsed and turns
//! every difference into a byte-range edit of the original source. Regions no edit
//! touches are copied through byte for byte.
//!
//! # What produces an edit
//!
//! - A statement without origin (a synthesized `use`) is printed and inserted.
//! - An original statement missing from the new list is deleted with its line.
//! - An attribute group without origin is printed on its own line.
//! - A doc comment whose text changed is replaced.
//!
//! When at least one such edit exists, the blank-line layout rules and the
//! normalization passes of [`crate::normalize`] run as well. Otherwise the
//! source is returned untouched. Inserted line breaks use the line ending the
//! source already uses.

use crate::ast::{ClassDecl, Declaration, SourceUnit, Span, Stmt};
use crate::fix::{ByteRangeRewriter, Edit, RewriteError};
use crate::normalize::{detect_newline, normalize};

/// Printer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printed {
    /// The new file contents.
    pub text: String,
    /// Structural edits applied (layout fixes not counted).
    pub edits: usize,
}

/// Where statements are inserted when a list has no surviving statement to follow.
struct Container {
    anchor: usize,
    indent: String,
    braced: bool,
}

/// Print `new` against `old` and its `source`.
///
/// # Errors
/// Returns an error if the computed edits overlap or fall outside `source`.
pub fn print(new: &SourceUnit, old: &SourceUnit, source: &str) -> Result<Printed, RewriteError> {
    let mut printer = FormatPreservingPrinter::new(source);
    printer.diff_stmts(
        &old.stmts,
        &new.stmts,
        &Container {
            anchor: old.header_end,
            indent: String::new(),
            braced: false,
        },
    );

    let edits = printer.edits.len();
    if edits == 0 {
        return Ok(Printed {
            text: source.to_owned(),
            edits,
        });
    }

    printer.layout(&new.stmts);

    let newline = printer.newline;
    let mut rewriter = ByteRangeRewriter::new(source);
    rewriter.add_edits(printer.edits);
    let protected: Vec<Span> = old
        .literals
        .iter()
        .map(|span| {
            let start = rewriter.map_offset(span.start);
            Span::new(start, start + (span.end - span.start))
        })
        .collect();
    let text = normalize(&rewriter.apply()?, &protected, newline);

    Ok(Printed { text, edits })
}

/// Collects edits for one file.
pub struct FormatPreservingPrinter<'a> {
    source: &'a str,
    newline: &'static str,
    edits: Vec<Edit>,
}

impl<'a> FormatPreservingPrinter<'a> {
    /// A printer over the original `source`
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            newline: detect_newline(source),
            edits: Vec::new(),
        }
    }

    fn diff_stmts(&mut self, old: &[Stmt], new: &[Stmt], container: &Container) {
        let mut old_pos = 0;
        let mut prev: Option<&Stmt> = None;
        let mut added: Vec<&Stmt> = Vec::new();

        for stmt in new {
            let matched = stmt.origin().and_then(|span| {
                old[old_pos..]
                    .iter()
                    .position(|candidate| candidate.origin() == Some(span))
                    .map(|offset| old_pos + offset)
            });
            let Some(index) = matched else {
                added.push(stmt);
                continue;
            };

            let survivor = &old[index];
            self.flush_gap(prev, Some(survivor), &old[old_pos..index], &added, container);
            added.clear();
            self.diff_stmt(survivor, stmt);

            old_pos = index + 1;
            prev = Some(survivor);
        }

        self.flush_gap(prev, None, &old[old_pos..], &added, container);
    }

    fn flush_gap(
        &mut self,
        prev: Option<&Stmt>,
        next: Option<&Stmt>,
        deleted: &[Stmt],
        added: &[&Stmt],
        container: &Container,
    ) {
        match (deleted.split_first(), added.is_empty()) {
            (None, true) => {}
            (Some((first, rest)), false) => {
                let Some(span) = first.origin() else {
                    return;
                };
                let indent = line_indent(self.source, span.start);
                let block = self.render_block(added, &indent);
                self.edits
                    .push(Edit::new(span.start, span.end, block).describe("replace statements"));
                for stmt in rest {
                    self.delete_line_of(stmt);
                }
            }
            (Some(_), true) => {
                for stmt in deleted {
                    self.delete_line_of(stmt);
                }
            }
            (None, false) => self.insert_statements(prev, next, added, container),
        }
    }

    fn insert_statements(
        &mut self,
        prev: Option<&Stmt>,
        next: Option<&Stmt>,
        added: &[&Stmt],
        container: &Container,
    ) {
        if let Some((prev, span)) = prev.and_then(|stmt| stmt.origin().map(|span| (stmt, span))) {
            let indent = line_indent(self.source, span.start);
            let mut text = String::new();
            let mut before = prev;
            for &stmt in added {
                text.push_str(&self.separator(before, stmt, &indent));
                text.push_str(&self.render(stmt));
                before = stmt;
            }
            self.edits
                .push(Edit::insert(span.end, text).describe("insert statements"));
            return;
        }

        if let Some((next, span)) = next.and_then(|stmt| stmt.origin().map(|span| (stmt, span))) {
            let indent = line_indent(self.source, span.start);
            let mut text = String::new();
            for (i, &stmt) in added.iter().enumerate() {
                let following = added.get(i + 1).copied().unwrap_or(next);
                text.push_str(&self.render(stmt));
                text.push_str(&self.separator(stmt, following, &indent));
            }
            self.edits
                .push(Edit::insert(span.start, text).describe("insert statements"));
            return;
        }

        let indent = &container.indent;
        let nl = self.newline;
        let mut text = if container.braced {
            format!("{nl}{indent}")
        } else {
            format!("{nl}{nl}{indent}")
        };
        text.push_str(&self.render_block(added, indent));
        if container.braced {
            text.push_str(nl);
        }
        self.edits
            .push(Edit::insert(container.anchor, text).describe("insert statements"));
    }

    fn render_block(&self, stmts: &[&Stmt], indent: &str) -> String {
        let mut text = String::new();
        for (i, &stmt) in stmts.iter().enumerate() {
            if i > 0 {
                text.push_str(&self.separator(stmts[i - 1], stmt, indent));
            }
            text.push_str(&self.render(stmt));
        }
        text
    }

    fn render(&self, stmt: &Stmt) -> String {
        if let Some(span) = stmt.origin() {
            return span.slice(self.source).to_owned();
        }
        match stmt {
            Stmt::Use(use_stmt) => use_stmt
                .imports
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        }
    }

    /// Delete a statement; when it is alone on its line, the whole line goes.
    fn delete_line_of(&mut self, stmt: &Stmt) {
        let Some(span) = stmt.origin() else {
            return;
        };
        let line_start = self.source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let lead_blank = self.source[line_start..span.start].trim().is_empty();

        let rest = &self.source[span.end..];
        let line_end = rest.find('\n').map_or(self.source.len(), |i| span.end + i + 1);
        let tail_blank = self.source[span.end..line_end].trim().is_empty();

        let (start, end) = if lead_blank && tail_blank {
            (line_start, line_end)
        } else {
            (span.start, span.end)
        };
        self.edits
            .push(Edit::delete(start, end).describe("delete statement"));
    }

    fn diff_stmt(&mut self, old: &Stmt, new: &Stmt) {
        match (old, new) {
            (Stmt::Namespace(old_ns), Stmt::Namespace(new_ns)) => {
                let indent = if new_ns.braced {
                    old_ns
                        .stmts
                        .iter()
                        .find_map(Stmt::origin)
                        .map_or_else(|| "    ".to_owned(), |span| line_indent(self.source, span.start))
                } else {
                    String::new()
                };
                let container = Container {
                    anchor: old_ns.header_end,
                    indent,
                    braced: old_ns.braced,
                };
                self.diff_stmts(&old_ns.stmts, &new_ns.stmts, &container);
            }
            (Stmt::Class(old_class), Stmt::Class(new_class)) => {
                self.diff_class(old_class, new_class);
            }
            (
                Stmt::Enclosing { classes: old_classes, .. },
                Stmt::Enclosing { classes: new_classes, .. },
            ) => {
                for (old_class, new_class) in old_classes.iter().zip(new_classes) {
                    self.diff_class(old_class, new_class);
                }
            }
            _ => {}
        }
    }

    fn diff_class(&mut self, old: &ClassDecl, new: &ClassDecl) {
        self.diff_declaration(&old.decl, &new.decl);
        for (old_method, new_method) in old.methods.iter().zip(&new.methods) {
            self.diff_declaration(old_method, new_method);
        }
    }

    fn diff_declaration(&mut self, old: &Declaration, new: &Declaration) {
        if let (Some(old_doc), Some(new_doc)) = (&old.doc, &new.doc) {
            if let Some(span) = new_doc.origin.filter(|_| old_doc.text != new_doc.text) {
                self.edits.push(
                    Edit::new(span.start, span.end, new_doc.text.clone()).describe("rewrite doc comment"),
                );
            }
        }

        let added: Vec<String> = new
            .attr_groups
            .iter()
            .filter(|group| group.origin.is_none())
            .map(ToString::to_string)
            .collect();
        if added.is_empty() {
            return;
        }

        let indent = line_indent(self.source, new.origin.start);
        let nl = self.newline;
        let last_existing = new.attr_groups.iter().filter_map(|group| group.origin).last();
        let (at, text) = match last_existing {
            Some(span) => (
                span.end,
                added.iter().map(|group| format!("{nl}{indent}{group}")).collect::<String>(),
            ),
            None => (
                new.attr_anchor,
                added.iter().map(|group| format!("{group}{nl}{indent}")).collect::<String>(),
            ),
        };
        self.edits
            .push(Edit::insert(at, text).describe("insert attributes"));
    }

    /// Blank-line rules after method and class bodies.
    fn layout(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Namespace(ns) => self.layout(&ns.stmts),
                Stmt::Class(class) => self.layout_class(class),
                Stmt::Enclosing { classes, .. } => {
                    for class in classes {
                        self.layout_class(class);
                    }
                }
                _ => {}
            }
        }
    }

    fn layout_class(&mut self, class: &ClassDecl) {
        for method in &class.methods {
            self.blank_line_after(method.origin.end);
        }
        self.blank_line_after(class.decl.origin.end);
    }

    fn blank_line_after(&mut self, end: usize) {
        let rest = &self.source[end..];
        let Some(newline) = rest.find('\n') else {
            return;
        };
        if !rest[..newline].trim().is_empty() {
            return;
        }

        let next_start = end + newline + 1;
        let next_line = self.source[next_start..].split('\n').next().unwrap_or_default();
        let next_line = next_line.trim();
        if next_line.is_empty() || next_line.starts_with('}') {
            return;
        }
        self.edits
            .push(Edit::insert(next_start, self.newline).describe("blank line after body"));
    }

    fn separator(&self, before: &Stmt, after: &Stmt, indent: &str) -> String {
        let nl = self.newline;
        if matches!((before, after), (Stmt::Use(_), Stmt::Use(_))) {
            format!("{nl}{indent}")
        } else {
            format!("{nl}{nl}{indent}")
        }
    }
}

/// Leading whitespace of the line containing `pos`.
#[must_use]
pub fn line_indent(source: &str, pos: usize) -> String {
    let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..pos]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
