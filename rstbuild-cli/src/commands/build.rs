//! Build and rebuild commands.

use anyhow::{Context, Result};
use rstbuild_core::{project, BuildError, BuildReport, Config};

/// Compile and link the project
pub fn build_project(config: &Config) -> Result<()> {
    tracing::info!("Building {:?} into {:?}", config.source_dir(), config.build_dir());
    finish(project::build(config))
}

/// Discard the cache and build output, then build from scratch
pub fn rebuild_project(config: &Config) -> Result<()> {
    tracing::info!("Rebuilding {:?} into {:?}", config.source_dir(), config.build_dir());
    finish(project::rebuild(config))
}

fn finish(result: Result<BuildReport, BuildError>) -> Result<()> {
    match result {
        Ok(report) => {
            tracing::info!("Wrote {} pages", report.linked.len());
            Ok(())
        }
        Err(BuildError::LinkFailed(failures)) => {
            let documents: Vec<&str> = failures.iter().map(|f| f.document().as_str()).collect();
            anyhow::bail!(
                "{} document(s) failed to link: {}",
                failures.len(),
                documents.join(", ")
            )
        }
        Err(err) => Err(err).context("Build failed"),
    }
}
