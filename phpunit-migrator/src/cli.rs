use clap::Parser;
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.phpunit-migrator.toml):
  Looked up from the target directory upwards; the first one found wins.

  [migrator]
  exclude = [\"*/vendor/*\"]    # Glob patterns, merged with --exclude
  extensions = [\"php\"]        # File extensions to process
  respect_gitignore = false   # Skip files ignored by .gitignore

LOGGING:
  Diagnostics go to stderr. RUST_LOG overrides --verbose.
";

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    name = "migrate",
    author,
    version,
    about = "Migrate PHPUnit doc comment annotations (@test, @group, @covers, @dataProvider) to attributes",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Directory to migrate recursively.
    /// Exactly one directory is expected; anything else prints the usage.
    pub paths: Vec<PathBuf>,

    /// Glob patterns to skip, matched against absolute paths (`*` crosses `/`).
    /// Repeatable and comma separated: --exclude '*/vendor/*,*/Fixtures/*'.
    #[arg(long, short = 'e', value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Report which files would change without writing them.
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Enable debug logging (shows every migrated directive).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The single target directory, if exactly one path was given.
    #[must_use]
    pub fn target(&self) -> Option<&PathBuf> {
        match self.paths.as_slice() {
            [path] => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_is_repeatable_and_comma_separated() {
        let cli = Cli::try_parse_from([
            "migrate",
            "--exclude",
            "*/vendor/*,*/Fixtures/*",
            "-e",
            "*/cache/*",
            "tests",
        ])
        .unwrap();
        assert_eq!(cli.exclude, vec!["*/vendor/*", "*/Fixtures/*", "*/cache/*"]);
        assert_eq!(cli.target(), Some(&PathBuf::from("tests")));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_target_requires_exactly_one_path() {
        let none = Cli::try_parse_from(["migrate"]).unwrap();
        assert!(none.target().is_none());

        let two = Cli::try_parse_from(["migrate", "a", "b", "--dry-run"]).unwrap();
        assert!(two.target().is_none());
        assert!(two.dry_run);
    }
}
