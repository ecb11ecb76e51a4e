//! The migrate command: walk a directory and migrate every PHP file in it.

use crate::migrator::{FileOutcome, Migrator};
use crate::output::{print_completion, print_file_outcome, print_file_start};
use crate::utils::{build_exclude_set, collect_php_files, WalkOptions};

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Options for the migrate command
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Directory to walk
    pub root: PathBuf,
    /// Exclude globs (command line and configuration, merged)
    pub exclude: Vec<String>,
    /// Extensions to process
    pub extensions: Vec<String>,
    /// Whether `.gitignore` rules apply
    pub respect_gitignore: bool,
    /// Report instead of writing
    pub dry_run: bool,
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateSummary {
    /// Files visited
    pub processed: usize,
    /// Files written (or that would be, in a dry run)
    pub changed: usize,
}

/// Migrate every matching file under `options.root`, one at a time.
///
/// The first failing file aborts the run; files processed before it keep their new
/// contents.
///
/// # Errors
///
/// Returns an error if an exclude pattern is invalid, a file cannot be read, parsed,
/// printed or written, or writing progress output fails.
pub fn run_migrate<W: Write>(options: &MigrateOptions, mut writer: W) -> Result<MigrateSummary> {
    let exclude = build_exclude_set(&options.exclude)?;
    let files = collect_php_files(
        &options.root,
        &WalkOptions {
            exclude: &exclude,
            extensions: &options.extensions,
            respect_gitignore: options.respect_gitignore,
        },
    );
    tracing::debug!(count = files.len(), root = %options.root.display(), "collected files");

    let mut migrator = Migrator::new()?.dry_run(options.dry_run);
    let mut summary = MigrateSummary::default();

    for path in &files {
        print_file_start(&mut writer, path)?;
        let outcome = match migrator.migrate_file(path) {
            Ok(outcome) => outcome,
            Err(err) => {
                writeln!(writer)?;
                return Err(err.into());
            }
        };
        print_file_outcome(&mut writer, outcome)?;

        summary.processed += 1;
        if outcome != FileOutcome::Unchanged {
            summary.changed += 1;
        }
    }

    print_completion(&mut writer, summary.changed, options.dry_run)?;
    tracing::debug!(
        processed = summary.processed,
        changed = summary.changed,
        "migration finished"
    );
    Ok(summary)
}
