//! # rstbuild-cache
//!
//! Persistent artifact store that sits between the compile and link phases.
//!
//! The store has two independent namespaces:
//!
//! ```text
//! output[name]        -> set of dependencies the document needs at link time
//! input[(kind, name)] -> title | navigation markup | html document
//! ```
//!
//! Compilation writes both namespaces for every document; linking only reads
//! them. A lookup of a key that was never written is a [`CacheError::NotFound`]
//! (or [`CacheError::OutputNotFound`]) rather than an empty default, so a
//! broken cross-reference cannot silently produce an empty string.
//!
//! Source fingerprints are kept alongside so an unchanged document can reuse
//! the entries of the previous build generation.

pub mod store;

pub use store::{fingerprint, ArtifactCache, CacheError, CacheStats, CACHE_FILENAME, CACHE_VERSION};
