//! Shared types for rstbuild
//!
//! This crate provides the vocabulary shared by the compiler, the artifact
//! cache and the CLI: document names, artifact kinds and the dependency
//! records a compiled document carries into the link phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical document name (the source file stem, e.g. `install`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocName(pub String);

impl DocName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the linked page (`install.html`)
    pub fn html_name(&self) -> String {
        format!("{}.html", self.0)
    }
}

impl fmt::Display for DocName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocName {
    fn from(name: &str) -> Self {
        DocName(name.to_string())
    }
}

impl From<String> for DocName {
    fn from(name: String) -> Self {
        DocName(name)
    }
}

/// Kind of compiled artifact stored in the input namespace of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Resolved document title
    Title,
    /// Generated navigation markup
    Navtree,
    /// Full HTML fragment list of a document
    Doc,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Title, ArtifactKind::Navtree, ArtifactKind::Doc];

    /// Look up a kind by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(ArtifactKind::Title),
            "navtree" => Some(ArtifactKind::Navtree),
            "doc" => Some(ArtifactKind::Doc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Title => "title",
            ArtifactKind::Navtree => "navtree",
            ArtifactKind::Doc => "doc",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a document needs from another document at link time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dependency {
    pub kind: ArtifactKind,
    pub target: DocName,
}

impl Dependency {
    pub fn new(kind: ArtifactKind, target: impl Into<DocName>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    pub fn title(target: impl Into<DocName>) -> Self {
        Self::new(ArtifactKind::Title, target)
    }

    pub fn navtree(target: impl Into<DocName>) -> Self {
        Self::new(ArtifactKind::Navtree, target)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.target)
    }
}
