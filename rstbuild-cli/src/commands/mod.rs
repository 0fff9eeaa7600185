//! CLI command implementations.

pub mod build;
pub mod clean;

pub use build::{build_project, rebuild_project};
pub use clean::clean_project;

use anyhow::{Context, Result};
use rstbuild_core::Config;
use std::path::Path;

/// Load the config file if there is one, otherwise use the default layout.
///
/// `base_dir` replaces the directory relative paths resolve against.
pub fn load_config(config_path: &Path, base_dir: Option<&Path>) -> Result<Config> {
    let config = if config_path.is_file() {
        tracing::debug!("Loading config from {:?}", config_path);
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load configuration from {:?}", config_path))?
    } else {
        tracing::debug!("No config at {:?}, using defaults", config_path);
        Config::for_base_dir(".")
    };

    Ok(match base_dir {
        Some(dir) => config.with_base_dir(dir),
        None => config,
    })
}
