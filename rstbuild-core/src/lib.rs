//! # rstbuild-core
//!
//! Core library for the rstbuild documentation compiler.
//!
//! Documents are compiled one at a time (parse → transform → cache write) and
//! linked afterwards from the artifact cache alone, so cross-references to
//! other documents never force those documents to be parsed again.

pub mod ast;
pub mod code;
pub mod config;
pub mod linker;
pub mod parser;
pub mod project;
pub mod session;
pub mod slug;
pub mod transformer;

pub use ast::{AstDoc, AstError, AstNode, HeaderLevel, NodeKind, UNTITLED};
pub use code::CodeModel;
pub use config::{Config, ConfigError};
pub use linker::{link, LinkError};
pub use parser::{parse, parse_file, parse_source};
pub use project::Target;
pub use session::{BuildError, BuildReport, BuildSession};
pub use slug::slugify;
pub use transformer::transform;

pub use rstbuild_cache::ArtifactCache;
pub use rstbuild_types::{ArtifactKind, Dependency, DocName};
