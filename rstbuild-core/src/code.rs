//! Compiled, not yet linked form of a document.
//!
//! A [`CodeModel`] holds the HTML fragments of one document in order. Any
//! value owned by another document appears in those fragments as a deferred
//! placeholder (`{{title:install}}`, `{{navtree:api}}`) and is recorded in the
//! dependency set, which the linker resolves against the artifact cache.
//!
//! A placeholder is always a fragment of its own. Placeholder-shaped text
//! inside a longer fragment came from the source and is never resolved.

use regex::Regex;
use rstbuild_cache::ArtifactCache;
use rstbuild_types::{ArtifactKind, Dependency, DocName};
use std::collections::BTreeSet;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"^\{\{(title|navtree|doc):([^{}]+)\}\}$").unwrap())
}

/// Text standing in for `dep` until link time
pub fn placeholder(dep: &Dependency) -> String {
    format!("{{{{{}:{}}}}}", dep.kind, dep.target)
}

/// The dependency `fragment` stands for, if the whole fragment is a placeholder
pub fn parse_placeholder(fragment: &str) -> Option<Dependency> {
    let caps = placeholder_regex().captures(fragment)?;
    let kind = ArtifactKind::from_name(caps.get(1)?.as_str())?;
    Some(Dependency::new(kind, caps.get(2)?.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeModel {
    pub name: DocName,
    pub title: String,
    pub html: Vec<String>,
    pub navigation: Vec<String>,
    pub dependencies: BTreeSet<Dependency>,
    output_registered: bool,
}

impl CodeModel {
    pub fn new(name: DocName, title: impl Into<String>) -> Self {
        Self {
            name,
            title: title.into(),
            html: Vec::new(),
            navigation: Vec::new(),
            dependencies: BTreeSet::new(),
            output_registered: false,
        }
    }

    pub fn html_name(&self) -> String {
        self.name.html_name()
    }

    pub fn add_html<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.html.extend(fragments.into_iter().map(Into::into));
    }

    pub fn add_navigation<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.navigation.extend(fragments.into_iter().map(Into::into));
    }

    /// Emit a deferred placeholder and record the dependency it stands for
    pub fn add_placeholder(&mut self, dep: Dependency) {
        self.html.push(placeholder(&dep));
        self.dependencies.insert(dep);
    }

    /// Mark the HTML of this document as an output stored under its own name
    pub fn register_output(&mut self) {
        self.output_registered = true;
    }

    pub fn is_output_registered(&self) -> bool {
        self.output_registered
    }

    /// Write every field the link phase reads into the cache
    pub fn write_cache(&self, cache: &mut ArtifactCache) {
        cache.set_output(&self.name, self.dependencies.clone());
        cache.set_input(ArtifactKind::Title, &self.name, self.title.as_str());
        cache.set_input(ArtifactKind::Navtree, &self.name, self.navigation.join("\n"));
        if self.output_registered {
            cache.set_input(ArtifactKind::Doc, &self.name, self.html.join("\n"));
        }
        tracing::debug!(
            "Cached {} ({} fragments, {} dependencies)",
            self.name,
            self.html.len(),
            self.dependencies.len()
        );
    }
}
