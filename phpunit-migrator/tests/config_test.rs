//! Tests for configuration loading.
#![allow(clippy::unwrap_used)]

use phpunit_migrator::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_nested_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".phpunit-migrator.toml"),
        r#"
[migrator]
exclude = ["*/Fixtures/*"]
extensions = [".php", "phpt"]
respect_gitignore = true
"#,
    )
    .unwrap();
    let nested = dir.path().join("tests/Unit");
    fs::create_dir_all(&nested).unwrap();

    let config = Config::load_from_path(&nested);

    assert_eq!(config.migrator.exclude(), ["*/Fixtures/*".to_owned()]);
    assert_eq!(config.migrator.extensions(), vec!["php", "phpt"]);
    assert!(config.migrator.respect_gitignore());
    assert_eq!(
        config.config_file_path,
        Some(dir.path().join(".phpunit-migrator.toml"))
    );
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".phpunit-migrator.toml"),
        "[migrator]\nexclude = \"not-a-list\"\n",
    )
    .unwrap();

    let config = Config::load_from_path(dir.path());

    assert!(config.migrator.exclude().is_empty());
    assert_eq!(config.migrator.extensions(), vec!["php"]);
    assert!(!config.migrator.respect_gitignore());
}
