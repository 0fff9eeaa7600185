//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the rstbuild.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_extension")]
    pub source_extension: String,

    // Directory relative paths resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_extension() -> String {
    String::from("rst")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_cache")]
    pub cache: PathBuf,

    #[serde(default = "default_build")]
    pub build: PathBuf,
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_cache() -> PathBuf {
    PathBuf::from("cache")
}

fn default_build() -> PathBuf {
    PathBuf::from("build")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            cache: default_cache(),
            build: default_build(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            source_extension: default_extension(),
            base_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file; paths resolve against its directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Default layout (`src/`, `cache/`, `build/`) under `base_dir`
    pub fn for_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Re-root relative paths at `base_dir`
    pub fn with_base_dir<P: AsRef<Path>>(mut self, base_dir: P) -> Self {
        self.base_dir = Some(base_dir.as_ref().to_path_buf());
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.cache)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.build)
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
