//! Tree-sitter based CST parser for PHP source code.
//!
//! Provides precise byte-range information for format-preserving rewriting.

use tree_sitter::{Node, Parser};

/// A CST node with exact source location
#[derive(Debug, Clone)]
pub struct CstNode {
    /// Node kind (e.g., "class_declaration", "comment")
    pub kind: String,
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Whether this is a named node (vs anonymous like punctuation)
    pub is_named: bool,
    /// Child nodes
    pub children: Vec<CstNode>,
}

impl CstNode {
    /// Create a `CstNode` from a tree-sitter `Node`
    fn from_ts_node(node: Node<'_>) -> Self {
        let children = (0..node.child_count())
            .filter_map(|i| node.child(u32::try_from(i).ok()?))
            .map(Self::from_ts_node)
            .collect();

        Self {
            kind: node.kind().to_owned(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            is_named: node.is_named(),
            children,
        }
    }

    /// Source text covered by this node
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start_byte..self.end_byte]
    }

    /// First direct child of the given kind
    #[must_use]
    pub fn child_of_kind(&self, kind: &str) -> Option<&CstNode> {
        self.children.iter().find(|child| child.kind == kind)
    }

    /// Named direct children
    pub fn named_children(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter(|child| child.is_named)
    }
}

/// A parsed CST tree
#[derive(Debug)]
pub struct CstTree {
    /// Root node of the CST
    pub root: CstNode,
    /// Original source code
    pub source: String,
}

/// Error during CST parsing
#[derive(Debug, thiserror::Error)]
pub enum CstError {
    /// Failed to create parser
    #[error("Failed to create CST parser: {0}")]
    ParserCreation(String),
    /// Tree-sitter returned no tree at all
    #[error("Failed to parse source as PHP")]
    ParseFailed,
    /// The tree contains an error or missing node
    #[error("Syntax error at line {line}, column {column}")]
    Syntax {
        /// 1-indexed line of the first error node
        line: usize,
        /// 1-indexed column of the first error node
        column: usize,
    },
}

/// Tree-sitter based CST parser
pub struct CstParser {
    parser: Parser,
}

impl CstParser {
    /// Create a new CST parser for PHP (with `<?php` tags and inline HTML)
    ///
    /// # Errors
    /// Returns error if parser creation fails
    pub fn new() -> Result<Self, CstError> {
        let mut parser = Parser::new();

        // Use the LANGUAGE_PHP constant exported by tree-sitter-php crate
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| CstError::ParserCreation(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Parse source code into a CST
    ///
    /// # Errors
    /// Returns error if parsing fails or the source is not valid PHP
    pub fn parse(&mut self, source: &str) -> Result<CstTree, CstError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(CstError::ParseFailed)?;

        let root_node = tree.root_node();
        if root_node.has_error() {
            let position = first_error(root_node).map_or(root_node.start_position(), |node| {
                node.start_position()
            });
            return Err(CstError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(CstTree {
            root: CstNode::from_ts_node(root_node),
            source: source.to_owned(),
        })
    }
}

/// Depth-first search for the first `ERROR` or `MISSING` node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    (0..node.child_count())
        .filter_map(|i| node.child(u32::try_from(i).ok()?))
        .find_map(first_error)
}
