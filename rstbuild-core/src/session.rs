//! Build session - drives the compile and link phases over a source directory.
//!
//! All state of one build lives in a [`BuildSession`]: the configuration, the
//! artifact cache and two task queues. The compile queue
//! (scan → parse → transform → write cache) drains completely and the cache
//! is saved before the first link task runs.

use crate::ast::AstDoc;
use crate::code::CodeModel;
use crate::config::Config;
use crate::linker::{link, LinkError};
use crate::parser::parse_source;
use crate::transformer::transform;
use rstbuild_cache::{fingerprint, ArtifactCache, CacheError};
use rstbuild_types::DocName;
use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source directory not found: {0:?}")]
    MissingSourceDir(PathBuf),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Unsupported target: {0}")]
    UnknownTarget(String),

    #[error("{} document(s) failed to link", .0.len())]
    LinkFailed(Vec<LinkError>),
}

impl BuildError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A source file and the document it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: DocName,
    pub path: PathBuf,
}

/// One unit of work in a build
#[derive(Debug)]
pub enum Task {
    Scan,
    Parse(Source),
    Transform { ast: AstDoc, fingerprint: String },
    WriteCache { code: CodeModel, fingerprint: String },
    Link(DocName),
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Scan => write!(f, "scan"),
            Task::Parse(source) => write!(f, "parse({})", source.name),
            Task::Transform { ast, .. } => write!(f, "transform({})", ast.name),
            Task::WriteCache { code, .. } => write!(f, "writecache({})", code.name),
            Task::Link(name) => write!(f, "link({})", name),
        }
    }
}

/// What a build did, document by document
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Documents parsed and transformed in this generation
    pub compiled: Vec<DocName>,
    /// Documents whose previous-generation entries were still valid
    pub reused: Vec<DocName>,
    /// Documents written to the build directory
    pub linked: Vec<DocName>,
    /// Cache entries dropped because their source disappeared
    pub pruned: Vec<DocName>,
    pub failures: Vec<LinkError>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List source files with the given extension directly inside `dir`, sorted by name
pub fn scan_sources(dir: &Path, extension: &str) -> Result<Vec<Source>, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::MissingSourceDir(dir.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            BuildError::io(dir, source)
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!("Skipping source with non UTF-8 name: {:?}", path);
            continue;
        };
        sources.push(Source {
            name: DocName::new(stem),
            path: path.to_path_buf(),
        });
    }
    Ok(sources)
}

pub struct BuildSession {
    config: Config,
    cache: ArtifactCache,
    compile_tasks: VecDeque<Task>,
    link_tasks: VecDeque<Task>,
    sources: Vec<DocName>,
    executed: Vec<String>,
    report: BuildReport,
}

impl BuildSession {
    /// Start a session, loading the previous cache generation from the cache dir
    pub fn open(config: Config) -> Result<Self, BuildError> {
        let cache = ArtifactCache::open(&config.cache_dir())?;
        Ok(Self::with_cache(config, cache))
    }

    pub fn with_cache(config: Config, cache: ArtifactCache) -> Self {
        Self {
            config,
            cache,
            compile_tasks: VecDeque::new(),
            link_tasks: VecDeque::new(),
            sources: Vec::new(),
            executed: Vec::new(),
            report: BuildReport::default(),
        }
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Names of executed tasks, in order
    pub fn executed_tasks(&self) -> &[String] {
        &self.executed
    }

    /// Compile every source, persist the cache, then link every document.
    ///
    /// Link failures do not stop the other documents; they are collected in
    /// the report.
    pub fn run(&mut self) -> Result<&BuildReport, BuildError> {
        self.compile_tasks.push_back(Task::Scan);
        while let Some(task) = self.compile_tasks.pop_front() {
            self.execute(task)?;
        }

        self.report.pruned = self.cache.prune(self.sources.iter());
        for name in &self.report.pruned {
            tracing::debug!("Pruned stale cache entries for {}", name);
        }
        self.cache.save()?;
        tracing::info!("Compiled artifacts: {}", self.cache.stats());

        let build_dir = self.config.build_dir();
        fs::create_dir_all(&build_dir).map_err(|e| BuildError::io(&build_dir, e))?;
        while let Some(task) = self.link_tasks.pop_front() {
            self.execute(task)?;
        }

        Ok(&self.report)
    }

    pub fn into_report(self) -> BuildReport {
        self.report
    }

    fn execute(&mut self, task: Task) -> Result<(), BuildError> {
        let label = task.to_string();
        tracing::trace!("Executing {}", label);

        match task {
            Task::Scan => {
                let sources =
                    scan_sources(&self.config.source_dir(), &self.config.source_extension)?;
                tracing::info!("Found {} source documents", sources.len());
                for source in sources {
                    self.sources.push(source.name.clone());
                    self.link_tasks.push_back(Task::Link(source.name.clone()));
                    self.compile_tasks.push_back(Task::Parse(source));
                }
            }
            Task::Parse(source) => {
                let bytes =
                    fs::read(&source.path).map_err(|e| BuildError::io(&source.path, e))?;
                let fingerprint = fingerprint(&bytes);
                if self.cache.is_fresh(&source.name, &fingerprint) {
                    tracing::debug!("Unchanged: {}", source.name);
                    self.report.reused.push(source.name);
                } else {
                    let text = String::from_utf8_lossy(&bytes);
                    let ast = parse_source(source.name.as_str(), &text);
                    self.compile_tasks
                        .push_back(Task::Transform { ast, fingerprint });
                }
            }
            Task::Transform { ast, fingerprint } => {
                let code = transform(&ast);
                self.compile_tasks
                    .push_back(Task::WriteCache { code, fingerprint });
            }
            Task::WriteCache { code, fingerprint } => {
                code.write_cache(&mut self.cache);
                self.cache.set_fingerprint(&code.name, fingerprint);
                tracing::debug!("Compiled: {}", code.name);
                self.report.compiled.push(code.name);
            }
            Task::Link(name) => match link(&self.cache, &name) {
                Ok(lines) => {
                    let path = self.config.build_dir().join(name.html_name());
                    let mut html = lines.join("\n");
                    html.push('\n');
                    fs::write(&path, html).map_err(|e| BuildError::io(&path, e))?;
                    tracing::debug!("Linked: {}", name);
                    self.report.linked.push(name);
                }
                Err(err) => {
                    tracing::error!("Failed to link {}", err);
                    self.report.failures.push(err);
                }
            },
        }

        self.executed.push(label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_filters_and_sorts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.rst"), "B")?;
        fs::write(dir.path().join("a.rst"), "A")?;
        fs::write(dir.path().join("notes.txt"), "skip")?;
        fs::create_dir(dir.path().join("nested.rst"))?;

        let sources = scan_sources(dir.path(), "rst")?;
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = tempdir().unwrap();
        let err = scan_sources(&dir.path().join("nope"), "rst").unwrap_err();
        assert!(matches!(err, BuildError::MissingSourceDir(_)));
    }

    #[test]
    fn test_task_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir(&src)?;
        fs::write(src.join("a.rst"), "A\n=\n")?;
        fs::write(src.join("b.rst"), "B\n=\n")?;

        let mut session = BuildSession::open(Config::for_base_dir(dir.path()))?;
        session.run()?;

        assert_eq!(
            session.executed_tasks(),
            [
                "scan",
                "parse(a)",
                "parse(b)",
                "transform(a)",
                "transform(b)",
                "writecache(a)",
                "writecache(b)",
                "link(a)",
                "link(b)",
            ]
        );

        let documents: Vec<&str> = session.cache().documents().map(DocName::as_str).collect();
        assert_eq!(documents, vec!["a", "b"]);
        Ok(())
    }
}
