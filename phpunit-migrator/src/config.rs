use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILENAME, DEFAULT_EXTENSIONS};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[migrator]` section.
    pub migrator: MigratorConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Options of the `[migrator]` section.
pub struct MigratorConfig {
    /// Glob patterns excluded from the walk, merged with `--exclude`.
    pub exclude: Option<Vec<String>>,
    /// File extensions to process (without the dot).
    pub extensions: Option<Vec<String>>,
    /// Whether `.gitignore` rules apply while walking.
    pub respect_gitignore: Option<bool>,
}

impl MigratorConfig {
    /// Extensions to process, falling back to [`DEFAULT_EXTENSIONS`].
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(extensions) if !extensions.is_empty() => extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_owned())
                .collect(),
            _ => DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
        }
    }

    /// Exclude patterns from the file (possibly empty).
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or_default()
    }

    /// Whether to honour `.gitignore` (default: no).
    #[must_use]
    pub fn respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(false)
    }
}

impl Config {
    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// The first readable, well-formed file wins; a malformed file is skipped with a
    /// warning.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                match fs::read_to_string(&candidate).map(|content| toml::from_str::<Config>(&content)) {
                    Ok(Ok(mut config)) => {
                        tracing::debug!(path = %candidate.display(), "loaded configuration");
                        config.config_file_path = Some(candidate);
                        return config;
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(path = %candidate.display(), "ignoring malformed configuration: {err}");
                    }
                    Err(err) => {
                        tracing::warn!(path = %candidate.display(), "cannot read configuration: {err}");
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
