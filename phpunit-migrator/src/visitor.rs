use tracing::{debug, warn};

use crate::ast::{ClassDecl, ClassKind, Declaration, DocComment, Namespace, SourceUnit, Stmt};
use crate::attributes::push_unique;
use crate::context::TransformContext;
use crate::directives::{extract_directives, strip_directive_lines, DirectiveKind};
use crate::imports::insert_missing_imports;
use crate::synthesizer::{synthesize, Directive};

/// Rewrites doc comment directives into attributes across one [`SourceUnit`].
///
/// The traversal is explicit: namespaces and classes push a frame on the
/// [`TransformContext`] when entered and pop it when left.
///
/// - **Enter class**: class-level `@group` becomes `#[Group]` on the class.
/// - **Enter method**: `@test`, `@group`, `@dataProvider` become method attributes;
///   `@covers` references are queued on the enclosing class.
/// - **Leave class**: queued references become `#[CoversMethod]` on the class.
/// - **Leave namespace**: attribute imports missing from the namespace are added.
///
/// A transformer is consumed by [`AnnotationTransformer::transform`], so state can
/// never leak from one file into the next.
#[derive(Debug, Default)]
pub struct AnnotationTransformer {
    context: TransformContext,
}

impl AnnotationTransformer {
    /// Creates a transformer with an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform `unit` in place and hand back the accumulated context.
    pub fn transform(mut self, unit: &mut SourceUnit) -> TransformContext {
        for (index, stmt) in unit.stmts.iter_mut().enumerate() {
            match stmt {
                Stmt::Namespace(ns) => self.visit_namespace(index, ns),
                Stmt::Class(class) => self.visit_class(class),
                Stmt::Enclosing { classes, .. } => {
                    for class in classes {
                        self.visit_class(class);
                    }
                }
                _ => {}
            }
        }
        debug_assert!(self.context.is_balanced());
        self.context
    }

    fn visit_namespace(&mut self, index: usize, ns: &mut Namespace) {
        self.context.enter_namespace(index);
        for stmt in &mut ns.stmts {
            match stmt {
                Stmt::Class(class) => self.visit_class(class),
                Stmt::Enclosing { classes, .. } => {
                    for class in classes {
                        self.visit_class(class);
                    }
                }
                _ => {}
            }
        }
        let required = self.context.leave_namespace();
        insert_missing_imports(&mut ns.stmts, &required);
    }

    fn visit_class(&mut self, class: &mut ClassDecl) {
        self.context.enter_class(class.kind, class.decl.name.as_str());
        if class.kind == ClassKind::Class {
            self.migrate_class_directives(&mut class.decl);
        }

        for method in &mut class.methods {
            self.migrate_method_directives(method);
        }

        self.flush_covers(class);
    }

    /// Class level: `@group` only.
    fn migrate_class_directives(&mut self, decl: &mut Declaration) {
        let Some(doc) = decl.doc.as_ref() else {
            return;
        };
        let found = extract_directives(&doc.text);
        if found.groups.is_empty() {
            return;
        }

        for group in &found.groups {
            self.add_attribute(decl, Directive::Group(group));
        }
        self.rewrite_doc(decl, &[DirectiveKind::Group]);
    }

    /// Method level: `@test`, `@group`, `@dataProvider`, and queue `@covers`.
    fn migrate_method_directives(&mut self, decl: &mut Declaration) {
        let Some(doc) = decl.doc.as_ref() else {
            return;
        };
        let found = extract_directives(&doc.text);
        if found.is_empty() {
            return;
        }

        let mut migrated = Vec::new();
        if found.test {
            self.add_attribute(decl, Directive::Test);
            migrated.push(DirectiveKind::Test);
        }

        if !found.groups.is_empty() {
            for group in &found.groups {
                self.add_attribute(decl, Directive::Group(group));
            }
            migrated.push(DirectiveKind::Group);
        }

        for reference in found.covers {
            if !self.context.record_covers(reference) {
                break;
            }
        }

        if let Some(provider) = &found.data_provider {
            self.add_attribute(decl, Directive::DataProvider(provider));
            migrated.push(DirectiveKind::DataProvider);
            if !found.ignored_data_providers.is_empty() {
                warn!(
                    method = %decl.name,
                    kept = %provider,
                    dropped = ?found.ignored_data_providers,
                    "only the first @dataProvider is migrated"
                );
            }
        }

        self.rewrite_doc(decl, &migrated);
    }

    fn flush_covers(&mut self, class: &mut ClassDecl) {
        let Some(frame) = self.context.leave_class() else {
            return;
        };
        if frame.covers.is_empty() {
            return;
        }
        if frame.kind != ClassKind::Class {
            debug!(
                name = %frame.name,
                count = frame.covers.len(),
                kind = ?frame.kind,
                "discarding @covers references collected outside a class"
            );
            return;
        }

        debug!(class = %frame.name, count = frame.covers.len(), "flushing @covers references");
        for reference in &frame.covers {
            self.add_attribute(&mut class.decl, Directive::CoversMethod(reference));
        }
    }

    fn add_attribute(&mut self, decl: &mut Declaration, directive: Directive<'_>) {
        let group = synthesize(directive, &mut self.context);
        if push_unique(&mut decl.attr_groups, group) {
            debug!(declaration = %decl.name, attribute = directive.kind().short_name(), "added attribute");
            self.context.note_inserted_attribute();
        }
    }

    fn rewrite_doc(&mut self, decl: &mut Declaration, kinds: &[DirectiveKind]) {
        let Some(doc) = decl.doc.as_mut() else {
            return;
        };
        let updated = strip_directive_lines(&doc.text, kinds);
        if updated != doc.text {
            *doc = DocComment {
                origin: doc.origin,
                text: updated,
            };
            self.context.note_rewritten_doc();
        }
    }
}
