//! Text rewriting infrastructure.
//!
//! The printer never regenerates a whole file. It computes byte-range edits
//! against the original source and hands them to [`ByteRangeRewriter`], which
//! leaves every untouched byte as it was.

mod rewriter;

pub use rewriter::{ByteRangeRewriter, Edit, RewriteError};
