//! Clean command implementation.

use anyhow::{Context, Result};
use rstbuild_core::{project, Config};

/// Remove the cache and build directories
pub fn clean_project(config: &Config) -> Result<()> {
    project::clean(config).context("Failed to clean project")
}
