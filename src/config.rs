//! `.cdist.toml` loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::dist::aggregator::Settings;

pub const CONFIG_FILE: &str = ".cdist.toml";

const DEFAULT_MAINTENANCE_GLOBS: &[&str] = &[
    "**/*.md",
    "**/*.txt",
    "**/*.toml",
    "**/*.yml",
    "**/*.yaml",
    "**/*.json",
    "**/*.lock",
    "**/go.sum",
    "**/.gitignore",
    "**/.gitattributes",
    "**/LICENSE*",
    ".github/**",
    ".gitlab-ci.yml",
    "docs/**",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid maintenance glob {pattern:?}: {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub refinement_max_lines: usize,
    pub new_ratio: f64,
    pub maintenance_globs: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            refinement_max_lines: 20,
            new_ratio: 0.75,
            maintenance_globs: DEFAULT_MAINTENANCE_GLOBS
                .iter()
                .map(|g| g.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub chunk_size: usize,
    pub max_leaves: usize,
    pub yield_delay_ms: u64,
    pub cache_ttl_secs: u64,
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            chunk_size: settings.chunk_size,
            max_leaves: settings.max_leaves,
            yield_delay_ms: 0,
            cache_ttl_secs: 300,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration for a repository.
    ///
    /// An explicit path must exist. Without one, `<root>/.cdist.toml` is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = root.join(CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.max_leaves == 0 {
            return Err(ConfigError::Invalid("max_leaves must be at least 1".into()));
        }
        let ratio = self.classifier.new_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "classifier.new_ratio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            chunk_size: self.chunk_size,
            max_leaves: self.max_leaves,
        }
    }

    pub fn yield_delay(&self) -> Duration {
        Duration::from_millis(self.yield_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
