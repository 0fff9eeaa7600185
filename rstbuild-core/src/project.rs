//! Build targets: build, clean and rebuild.

use crate::config::Config;
use crate::session::{BuildError, BuildReport, BuildSession};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Target selector accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Build,
    Clean,
    Rebuild,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Build, Target::Clean, Target::Rebuild];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Build => "build",
            Target::Clean => "clean",
            Target::Rebuild => "rebuild",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Target::Build => "Build project",
            Target::Clean => "Clean intermediate files",
            Target::Rebuild => "Force rebuild",
        }
    }
}

impl FromStr for Target {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| BuildError::UnknownTarget(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the selected target
pub fn run(config: &Config, target: Target) -> Result<(), BuildError> {
    match target {
        Target::Build => build(config).map(|_| ()),
        Target::Clean => clean(config),
        Target::Rebuild => rebuild(config).map(|_| ()),
    }
}

/// Compile and link every document.
///
/// Every document that can be linked is written; if any could not, the
/// failures are returned together as [`BuildError::LinkFailed`].
pub fn build(config: &Config) -> Result<BuildReport, BuildError> {
    let mut session = BuildSession::open(config.clone())?;
    session.run()?;
    let mut report = session.into_report();

    tracing::info!(
        "Built {} pages ({} compiled, {} unchanged)",
        report.linked.len(),
        report.compiled.len(),
        report.reused.len()
    );

    if report.is_success() {
        Ok(report)
    } else {
        Err(BuildError::LinkFailed(std::mem::take(&mut report.failures)))
    }
}

/// Remove the cache and build output directories
pub fn clean(config: &Config) -> Result<(), BuildError> {
    remove_dir(&config.build_dir())?;
    remove_dir(&config.cache_dir())?;
    tracing::info!("Cleaned up.");
    Ok(())
}

/// Clean, then build from scratch
pub fn rebuild(config: &Config) -> Result<BuildReport, BuildError> {
    clean(config)?;
    build(config)
}

fn remove_dir(path: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!("Removed {:?}", path);
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
