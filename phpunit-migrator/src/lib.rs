//! Core library for the PHPUnit annotation migrator.
//!
//! This library rewrites PHPUnit doc-comment annotations (`@test`, `@group`,
//! `@dataProvider`, `@covers`) into PHP 8 attributes while leaving the rest of each
//! source file byte-for-byte as it was.

#![allow(
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the syntax tree model the migration works on.
/// Every node lowered from a parsed file carries its original byte span.
pub mod ast;

/// Module rendering attribute groups and import statements to PHP text.
pub mod attributes;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module holding the per-file transform state.
pub mod context;

/// Module for concrete syntax tree parsing with tree-sitter-php.
pub mod cst;

/// Module for reading and stripping PHPUnit doc-comment directives.
pub mod directives;

/// Module defining the entry point logic shared by the binaries.
pub mod entry_point;

/// Module defining the error types of the migration pipeline.
pub mod error;

/// Module for byte-range source rewriting.
pub mod fix;

/// Module resolving the `use` imports required by synthesized attributes.
pub mod imports;

/// Module tying parse, transform and print together for one source file.
pub mod migrator;

/// Module for the text clean-up applied to rewritten files.
pub mod normalize;

/// Module for console output.
pub mod output;

/// Module for the format-preserving printer.
pub mod printer;

/// Module building attribute nodes from directive values.
pub mod synthesizer;

/// Module containing utility functions.
/// This includes file discovery and exclude pattern handling.
pub mod utils;

/// Module containing the annotation-to-attribute tree transformer.
pub mod visitor;
