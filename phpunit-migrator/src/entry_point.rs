use crate::cli::Cli;
use crate::commands::{run_migrate, MigrateOptions};
use crate::config::Config;
use crate::output::{print_error, print_not_a_directory, print_usage};
use anyhow::Result;
use clap::Parser;
use std::sync::Once;

/// Install the stderr `tracing` subscriber once per process.
///
/// `RUST_LOG` wins; otherwise `verbose` selects `debug` and the default is `warn`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let default_level = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        // A host process may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Runs the migrator with the given arguments.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run the migrator with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
/// Migration failures are reported on stderr and turn into exit code 1.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["migrate".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    init_tracing(cli.verbose);

    let Some(target) = cli.target() else {
        print_usage(writer)?;
        return Ok(1);
    };
    if !target.is_dir() {
        print_not_a_directory(writer)?;
        return Ok(1);
    }

    let config = Config::load_from_path(target);
    let mut exclude = config.migrator.exclude().to_vec();
    exclude.extend(cli.exclude.iter().cloned());

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config.config_file_path,
        exclude = ?exclude,
        "starting migration"
    );

    let options = MigrateOptions {
        root: target.clone(),
        exclude,
        extensions: config.migrator.extensions(),
        respect_gitignore: config.migrator.respect_gitignore(),
        dry_run: cli.dry_run,
    };

    match run_migrate(&options, &mut *writer) {
        Ok(_) => Ok(0),
        Err(err) => {
            writer.flush()?;
            print_error(&err);
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> (i32, String) {
        let mut out = Vec::new();
        let code =
            run_with_args_to(args.iter().map(|s| (*s).to_owned()).collect(), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_usage_on_missing_or_extra_paths() {
        let (code, out) = run(&[]);
        assert_eq!(code, 1);
        assert!(out.starts_with("Usage:"));

        let (code, _) = run(&["a", "b"]);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("FooTest.php");
        std::fs::write(&file, "<?php\n").unwrap();

        let (code, out) = run(&[file.to_str().unwrap()]);
        assert_eq!(code, 1);
        assert!(out.contains("Error: Given path is not a directory."));
    }

    #[test]
    fn test_help_exits_zero() {
        let (code, out) = run(&["--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("--exclude"));
        assert!(out.contains(".phpunit-migrator.toml"));
    }

    #[test]
    fn test_config_excludes_merge_with_flags() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(
            dir.path().join(".phpunit-migrator.toml"),
            "[migrator]\nexclude = [\"*/a/*\"]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a/ATest.php"), "<?php\n").unwrap();
        std::fs::write(dir.path().join("b/BTest.php"), "<?php\n").unwrap();
        std::fs::write(dir.path().join("CTest.php"), "<?php\n").unwrap();

        let root = dir.path().to_str().unwrap();
        let (code, out) = run(&["--exclude", "*/b/*", root]);
        assert_eq!(code, 0);
        assert!(!out.contains("ATest.php"));
        assert!(!out.contains("BTest.php"));
        assert!(out.contains("CTest.php no diff"));
    }
}
