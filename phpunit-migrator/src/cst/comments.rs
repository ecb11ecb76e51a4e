//! Doc comment detection on the PHP CST.
//!
//! Tree-sitter captures comments as explicit `comment` nodes that sit next to the
//! declaration they document, so attachment is a matter of adjacency.

use super::parser::CstNode;

/// A comment extracted from source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text (including delimiters)
    pub text: String,
    /// Start byte offset
    pub start_byte: usize,
    /// End byte offset
    pub end_byte: usize,
}

impl Comment {
    /// Build from a `comment` node
    #[must_use]
    pub fn from_node(node: &CstNode, source: &str) -> Self {
        Self {
            text: node.text(source).to_owned(),
            start_byte: node.start_byte,
            end_byte: node.end_byte,
        }
    }

    /// Whether this is a `/** ... */` doc comment
    #[must_use]
    pub fn is_doc(&self) -> bool {
        is_doc_comment(&self.text)
    }
}

/// Whether comment text opens with `/**` (and is not the empty `/**/`)
#[must_use]
pub fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

/// Tracks the most recent doc comment while walking a list of sibling nodes.
///
/// Plain comments after the doc comment keep it pending; any other sibling clears
/// it. A declaration takes it when only whitespace separates the declaration from
/// the last comment seen.
#[derive(Debug, Default)]
pub struct PendingDoc {
    comment: Option<Comment>,
    trail_end: usize,
}

impl PendingDoc {
    /// Feed the next sibling node
    pub fn observe(&mut self, node: &CstNode, source: &str) {
        if node.kind != "comment" {
            self.comment = None;
            return;
        }
        let comment = Comment::from_node(node, source);
        self.trail_end = comment.end_byte;
        if comment.is_doc() {
            self.comment = Some(comment);
        }
    }

    /// Take the pending doc comment if it is attached to a declaration starting at `start`
    pub fn take_for(&mut self, start: usize, source: &str) -> Option<Comment> {
        let comment = self.comment.take()?;
        let attached = self.trail_end <= start
            && source[self.trail_end..start].chars().all(char::is_whitespace);
        attached.then_some(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parser::CstParser;

    fn pending_for(source: &str) -> Option<Comment> {
        let mut parser = CstParser::new().unwrap();
        let tree = parser.parse(source).unwrap();
        let mut pending = PendingDoc::default();
        for child in &tree.root.children {
            if child.kind == "class_declaration" {
                return pending.take_for(child.start_byte, source);
            }
            pending.observe(child, source);
        }
        None
    }

    #[test]
    fn test_doc_attaches_across_whitespace() {
        let doc = pending_for("<?php\n/**\n * Class doc\n */\n\nclass FooTest {}\n").unwrap();
        assert!(doc.text.contains("Class doc"));
        assert!(doc.is_doc());
    }

    #[test]
    fn test_doc_attaches_across_plain_comments() {
        let source = "<?php\n/** @group a */\n// note\n/* more */\nclass FooTest {}\n";
        let doc = pending_for(source).unwrap();
        assert_eq!(doc.text, "/** @group a */");
    }

    #[test]
    fn test_last_doc_comment_wins() {
        let source = "<?php\n/** first */\n/** second */\nclass FooTest {}\n";
        assert_eq!(pending_for(source).unwrap().text, "/** second */");
    }

    #[test]
    fn test_statement_between_detaches_doc() {
        let source = "<?php\n/** doc */\n$x = 1;\nclass FooTest {}\n";
        assert!(pending_for(source).is_none());
    }

    #[test]
    fn test_is_doc_comment() {
        assert!(is_doc_comment("/** x */"));
        assert!(!is_doc_comment("/* x */"));
        assert!(!is_doc_comment("/**/"));
        assert!(!is_doc_comment("// x"));
    }
}
