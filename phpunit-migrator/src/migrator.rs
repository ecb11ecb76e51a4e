//! Per-file orchestration: parse, transform, resolve imports, print, compare, write.
//!
//! ```
//! use phpunit_migrator::migrator::transform_source;
//!
//! let source = "<?php\nclass FooTest\n{\n    /**\n     * @test\n     */\n    public function it_works(): void {}\n}\n";
//! let migrated = transform_source(source).unwrap();
//! assert!(migrated.contains("#[Test]\n    public function it_works()"));
//! assert!(migrated.contains("use PHPUnit\\Framework\\Attributes\\Test;"));
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::cst::{lower, CstParser};
use crate::error::{MigrateError, TransformError};
use crate::imports::resolve_imports;
use crate::printer;
use crate::visitor::AnnotationTransformer;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output equals input; nothing written.
    Unchanged,
    /// Output differs and was written.
    Written,
    /// Output differs; dry run, nothing written.
    WouldChange,
}

/// Transform one source text with a fresh parser.
///
/// # Errors
/// Returns an error if the source does not parse or cannot be printed back.
pub fn transform_source(source: &str) -> Result<String, TransformError> {
    Migrator::new()?.transform(source)
}

/// Runs the migration over files, reusing one parser.
pub struct Migrator {
    parser: CstParser,
    dry_run: bool,
}

impl Migrator {
    /// A migrator that writes changed files.
    ///
    /// # Errors
    /// Returns an error if the PHP grammar cannot be loaded.
    pub fn new() -> Result<Self, TransformError> {
        Ok(Self {
            parser: CstParser::new()?,
            dry_run: false,
        })
    }

    /// Report changes without writing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Transform `source` and return the new text.
    ///
    /// Every call starts from a fresh [`AnnotationTransformer`]; the input comes back
    /// unchanged when there is nothing to migrate.
    ///
    /// # Errors
    /// Returns an error if the source does not parse or cannot be printed back.
    pub fn transform(&mut self, source: &str) -> Result<String, TransformError> {
        let tree = self.parser.parse(source)?;
        let original = lower(&tree);
        drop(tree);

        let mut unit = original.clone();
        let context = AnnotationTransformer::new().transform(&mut unit);
        if context.requires_any_import() {
            resolve_imports(&mut unit, &context);
        }

        let printed = printer::print(&unit, &original, source)?;
        debug!(
            attributes = context.inserted_attributes(),
            docs = context.rewritten_docs(),
            edits = printed.edits,
            "transformed source"
        );
        Ok(printed.text)
    }

    /// Migrate one file in place.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or written, is not UTF-8, does not
    /// parse, or cannot be printed back.
    pub fn migrate_file(&mut self, path: &Path) -> Result<FileOutcome, MigrateError> {
        let bytes = fs::read(path).map_err(|source| MigrateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8(bytes).map_err(|_| MigrateError::NotUtf8 {
            path: path.to_path_buf(),
        })?;

        let migrated = match self.transform(&source) {
            Ok(text) => text,
            Err(TransformError::Print(err)) => {
                eprintln!("format missing...");
                error!(path = %path.display(), "cannot print migrated source: {err}");
                return Err(MigrateError::Print {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => return Err(MigrateError::from_transform(path, err)),
        };

        if migrated == source {
            return Ok(FileOutcome::Unchanged);
        }
        if self.dry_run {
            return Ok(FileOutcome::WouldChange);
        }

        fs::write(path, migrated).map_err(|source| MigrateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(FileOutcome::Written)
    }
}
