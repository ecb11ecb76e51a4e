//! Console output for the migration run.
//!
//! The per-file progress lines are a plain-text protocol (`process <path>` followed by
//! ` no diff` or a newline) and stay uncolored; only the messages around them use color.

use crate::constants::{COMPLETION_MESSAGE, NOT_A_DIRECTORY_MESSAGE};
use crate::migrator::FileOutcome;
use crate::utils::normalize_display_path;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Usage text printed when the positional arguments are wrong.
pub const USAGE: &str = "\
Usage: migrate [--exclude <glob path>] [--dry-run] <directory_path>
  <directory_path>: Path to the directory to recursively fetch PHP files from.
  --exclude <glob path>: Glob pattern for excluding files (e.g., */bootstrap.php, /path/to/*).";

/// Print the usage block.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_usage(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "{USAGE}")
}

/// Print the "not a directory" error.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_not_a_directory(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "{}", NOT_A_DIRECTORY_MESSAGE.red())
}

/// Start the progress line of a file. The line is completed by [`print_file_outcome`].
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_start(writer: &mut impl Write, path: &Path) -> std::io::Result<()> {
    write!(writer, "process {}", normalize_display_path(path))?;
    writer.flush()
}

/// Complete the progress line of a file.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_outcome(writer: &mut impl Write, outcome: FileOutcome) -> std::io::Result<()> {
    match outcome {
        FileOutcome::Unchanged => writeln!(writer, " no diff"),
        FileOutcome::Written => writeln!(writer),
        FileOutcome::WouldChange => writeln!(writer, " would change"),
    }
}

/// Print the closing line of a run.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_completion(
    writer: &mut impl Write,
    changed: usize,
    dry_run: bool,
) -> std::io::Result<()> {
    if dry_run {
        writeln!(
            writer,
            "{} {}",
            "[DRY-RUN]".yellow(),
            format!("{changed} file(s) would change").dimmed()
        )?;
    }
    writeln!(writer, "{}", COMPLETION_MESSAGE.green().bold())
}

/// Print a fatal error to stderr.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "Error:".red().bold());
}
