use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use crate::error::MigrateError;

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use phpunit_migrator::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\tests\\FooTest.php")), "tests/FooTest.php");
/// assert_eq!(normalize_display_path(Path::new("./tests/FooTest.php")), "tests/FooTest.php");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Compile exclude patterns.
///
/// Patterns behave like `fnmatch` without `FNM_PATHNAME`: `*` also matches `/`.
///
/// # Errors
/// Returns [`MigrateError::InvalidGlob`] for the first pattern that does not compile.
pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, MigrateError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|source| MigrateError::InvalidGlob {
                pattern: pattern.to_owned(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| MigrateError::InvalidGlob {
        pattern: patterns.join(","),
        source,
    })
}

/// Options for [`collect_php_files`].
#[derive(Debug, Clone)]
pub struct WalkOptions<'a> {
    /// Compiled exclude patterns
    pub exclude: &'a GlobSet,
    /// Extensions to keep (without the dot)
    pub extensions: &'a [String],
    /// Whether `.gitignore` rules apply
    pub respect_gitignore: bool,
}

/// Recursively collect the files to migrate under `root`.
///
/// Paths are absolute, sorted by file name within each directory, and matched against
/// the exclude set in that absolute form.
#[must_use]
pub fn collect_php_files(root: &Path, options: &WalkOptions<'_>) -> Vec<PathBuf> {
    use ignore::WalkBuilder;

    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let extensions: FxHashSet<&str> = options.extensions.iter().map(String::as_str).collect();

    let walker = WalkBuilder::new(&root)
        .hidden(false)
        .parents(options.respect_gitignore)
        .ignore(options.respect_gitignore)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(ext));
        if !wanted {
            continue;
        }

        if options.exclude.is_match(path) {
            tracing::debug!(path = %path.display(), "excluded");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files
}
