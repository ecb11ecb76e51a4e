//! Per-file transformation state.
//!
//! The traversal keeps an explicit scope stack: entering a namespace or a class pushes a
//! frame, leaving pops it. `covers` references found on methods wait in the enclosing
//! class frame until that class is left; required imports are collected per import
//! scope (the file itself, or one top-level namespace).
//!
//! A context is created fresh for every file and dropped afterwards.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::ClassKind;

/// Where an import directive has to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImportScope {
    /// The file has no enclosing namespace at that point.
    Global,
    /// The namespace at this index of the top-level statement list.
    Namespace(usize),
}

/// A `Class::method` reference taken from a `covers` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoversRef {
    /// Referenced class, as written (may be qualified).
    pub class: String,
    /// Referenced method.
    pub method: String,
}

impl CoversRef {
    /// Build a reference
    #[must_use]
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for CoversRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// What leaving a class hands back for flushing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFrame {
    /// Class or trait.
    pub kind: ClassKind,
    /// Declared name (for diagnostics).
    pub name: String,
    /// Unique `covers` references, in first-seen order.
    pub covers: Vec<CoversRef>,
}

#[derive(Debug)]
enum Frame {
    Namespace(ImportScope),
    Class(ClassFrame),
}

/// Accumulated state for one file.
#[derive(Debug, Default)]
pub struct TransformContext {
    frames: Vec<Frame>,
    required: BTreeMap<ImportScope, BTreeSet<String>>,
    inserted_attributes: usize,
    rewritten_docs: usize,
}

impl TransformContext {
    /// A fresh, empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the top-level namespace at `index`
    pub fn enter_namespace(&mut self, index: usize) {
        self.frames
            .push(Frame::Namespace(ImportScope::Namespace(index)));
    }

    /// Leave the innermost namespace, returning the imports it requires
    pub fn leave_namespace(&mut self) -> BTreeSet<String> {
        match self.frames.pop() {
            Some(Frame::Namespace(scope)) => self.required_imports(scope).clone(),
            Some(frame) => {
                // Unbalanced traversal; put it back rather than lose class state.
                self.frames.push(frame);
                BTreeSet::new()
            }
            None => BTreeSet::new(),
        }
    }

    /// Enter a class or trait, opening a fresh `covers` accumulator
    pub fn enter_class(&mut self, kind: ClassKind, name: impl Into<String>) {
        self.frames.push(Frame::Class(ClassFrame {
            kind,
            name: name.into(),
            covers: Vec::new(),
        }));
    }

    /// Leave the innermost class, handing back its accumulated references.
    ///
    /// The frame is gone afterwards, so every reference is flushed exactly once.
    pub fn leave_class(&mut self) -> Option<ClassFrame> {
        match self.frames.pop() {
            Some(Frame::Class(frame)) => Some(frame),
            Some(frame) => {
                self.frames.push(frame);
                None
            }
            None => None,
        }
    }

    /// Queue a `covers` reference on the innermost class.
    ///
    /// Returns `false` when there is no enclosing class. Repeated references are
    /// kept once.
    pub fn record_covers(&mut self, reference: CoversRef) -> bool {
        let Some(frame) = self.frames.iter_mut().rev().find_map(|frame| match frame {
            Frame::Class(class) => Some(class),
            Frame::Namespace(_) => None,
        }) else {
            return false;
        };
        if !frame.covers.contains(&reference) {
            frame.covers.push(reference);
        }
        true
    }

    /// Import scope of the current traversal position
    #[must_use]
    pub fn current_import_scope(&self) -> ImportScope {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Namespace(scope) => Some(*scope),
                Frame::Class(_) => None,
            })
            .unwrap_or(ImportScope::Global)
    }

    /// Mark a fully qualified name as required in the current import scope
    pub fn require_import(&mut self, name: impl Into<String>) {
        let scope = self.current_import_scope();
        self.required.entry(scope).or_default().insert(name.into());
    }

    /// Names required in `scope`
    #[must_use]
    pub fn required_imports(&self, scope: ImportScope) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.required.get(&scope).unwrap_or(&EMPTY)
    }

    /// Whether any scope requires an import
    #[must_use]
    pub fn requires_any_import(&self) -> bool {
        self.required.values().any(|names| !names.is_empty())
    }

    /// Count an attribute group added to a declaration
    pub fn note_inserted_attribute(&mut self) {
        self.inserted_attributes += 1;
    }

    /// Count a doc comment whose text changed
    pub fn note_rewritten_doc(&mut self) {
        self.rewritten_docs += 1;
    }

    /// Attribute groups added so far
    #[must_use]
    pub fn inserted_attributes(&self) -> usize {
        self.inserted_attributes
    }

    /// Doc comments rewritten so far
    #[must_use]
    pub fn rewritten_docs(&self) -> usize {
        self.rewritten_docs
    }

    /// Whether the traversal is back at file level
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_flush_once_and_dedup() {
        let mut ctx = TransformContext::new();
        ctx.enter_class(ClassKind::Class, "FooTest");
        assert!(ctx.record_covers(CoversRef::new("Foo", "bar")));
        assert!(ctx.record_covers(CoversRef::new("Foo", "baz")));
        assert!(ctx.record_covers(CoversRef::new("Foo", "bar")));

        let frame = ctx.leave_class().unwrap();
        assert_eq!(frame.name, "FooTest");
        assert_eq!(
            frame.covers,
            vec![CoversRef::new("Foo", "bar"), CoversRef::new("Foo", "baz")]
        );
        assert!(ctx.leave_class().is_none());
        assert!(ctx.is_balanced());
    }

    #[test]
    fn test_covers_without_class_is_rejected() {
        let mut ctx = TransformContext::new();
        assert!(!ctx.record_covers(CoversRef::new("Foo", "bar")));
    }

    #[test]
    fn test_imports_are_scoped_to_namespace() {
        let mut ctx = TransformContext::new();
        ctx.require_import("Global\\A");
        ctx.enter_namespace(2);
        ctx.enter_class(ClassKind::Class, "T");
        ctx.require_import("Ns\\B");
        ctx.require_import("Ns\\B");
        ctx.leave_class();
        let required = ctx.leave_namespace();

        assert_eq!(required.into_iter().collect::<Vec<_>>(), vec!["Ns\\B"]);
        assert_eq!(ctx.required_imports(ImportScope::Global).len(), 1);
        assert!(ctx.required_imports(ImportScope::Namespace(7)).is_empty());
        assert!(ctx.requires_any_import());
    }

    #[test]
    fn test_nested_frames_keep_class_state() {
        let mut ctx = TransformContext::new();
        ctx.enter_class(ClassKind::Trait, "Helpers");
        // Leaving a namespace while a class is open must not drop the class frame.
        assert!(ctx.leave_namespace().is_empty());
        assert!(ctx.leave_class().is_some());
    }

    #[test]
    fn test_covers_ref_display() {
        assert_eq!(CoversRef::new("\\App\\Foo", "bar").to_string(), "\\App\\Foo::bar");
    }
}
