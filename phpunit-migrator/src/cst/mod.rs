//! CST (Concrete Syntax Tree) layer for PHP sources.
//!
//! This module provides Tree-sitter based parsing for:
//! - Precise byte ranges of declarations, doc comments and attribute groups
//! - Syntax error detection before anything is rewritten
//! - Lowering into the owned [`crate::ast`] model the migration mutates
//!
//! # Design Principles
//!
//! - **Parse once**: the tree is lowered immediately and dropped
//! - **Byte-range anchored**: the printer maps changes back through the spans kept here

mod comments;
mod mapper;
mod parser;

pub use mapper::lower;
pub use parser::{CstError, CstNode, CstParser, CstTree};
