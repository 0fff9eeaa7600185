//! Two-namespace artifact store with JSON persistence.

use chrono::Utc;
use rstbuild_types::{ArtifactKind, Dependency, DocName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CACHE_VERSION: &str = "1";
pub const CACHE_FILENAME: &str = "artifacts.json";

/// Errors that can occur while reading or persisting the cache
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no cached {kind} for document '{name}'")]
    NotFound { kind: ArtifactKind, name: DocName },

    #[error("document '{0}' has no cached output")]
    OutputNotFound(DocName),

    #[error("cache I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Store {
    #[serde(default)]
    output: BTreeMap<DocName, BTreeSet<Dependency>>,

    #[serde(default)]
    input: BTreeMap<ArtifactKind, BTreeMap<DocName, String>>,

    #[serde(default)]
    fingerprints: BTreeMap<DocName, String>,
}

#[derive(Serialize, Deserialize)]
struct CachedArtifacts {
    version: String,
    generated_at: String,
    #[serde(flatten)]
    store: Store,
}

/// Counts of what a cache generation holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub documents: usize,
    pub titles: usize,
    pub navtrees: usize,
    pub docs: usize,
    pub fingerprints: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents ({} titles, {} navtrees, {} pages, {} fingerprints)",
            self.documents, self.titles, self.navtrees, self.docs, self.fingerprints
        )
    }
}

/// Persistent artifact cache
#[derive(Debug, Clone, Default)]
pub struct ArtifactCache {
    store: Store,
    path: Option<PathBuf>,
}

impl ArtifactCache {
    /// Create an empty in-memory cache with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that persists to `cache_dir/artifacts.json`
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self {
            store: Store::default(),
            path: Some(cache_dir.join(CACHE_FILENAME)),
        }
    }

    /// Open the cache in `cache_dir`, loading the previous generation if present
    pub fn open(cache_dir: &Path) -> Result<Self, CacheError> {
        let mut cache = Self::in_dir(cache_dir);
        cache.load()?;
        Ok(cache)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the in-memory contents with the persisted generation.
    ///
    /// A missing file leaves the cache empty. A file written by another cache
    /// version, or one that fails to parse, is discarded with a warning.
    pub fn load(&mut self) -> Result<(), CacheError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        self.store = Store::default();

        if !path.exists() {
            tracing::debug!("No artifact cache at {:?}", path);
            return Ok(());
        }

        let data = fs::read(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        match serde_json::from_slice::<CachedArtifacts>(&data) {
            Ok(cached) if cached.version == CACHE_VERSION => {
                tracing::debug!(
                    "Loaded artifact cache generated at {} ({} documents)",
                    cached.generated_at,
                    cached.store.output.len()
                );
                self.store = cached.store;
            }
            Ok(cached) => {
                tracing::warn!(
                    "Discarding artifact cache with version {} (expected {})",
                    cached.version,
                    CACHE_VERSION
                );
            }
            Err(err) => {
                tracing::warn!("Failed to parse artifact cache {:?}: {}", path, err);
            }
        }
        Ok(())
    }

    /// Persist the whole store, replacing the previous file atomically
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;

        let payload = CachedArtifacts {
            version: CACHE_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            store: self.store.clone(),
        };
        let json = serde_json::to_vec_pretty(&payload)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        tracing::debug!("Saved artifact cache to {:?}", path);
        Ok(())
    }

    pub fn set_output(&mut self, name: &DocName, deps: BTreeSet<Dependency>) {
        self.store.output.insert(name.clone(), deps);
    }

    pub fn get_output(&self, name: &DocName) -> Result<&BTreeSet<Dependency>, CacheError> {
        self.store
            .output
            .get(name)
            .ok_or_else(|| CacheError::OutputNotFound(name.clone()))
    }

    pub fn set_input(&mut self, kind: ArtifactKind, name: &DocName, value: impl Into<String>) {
        self.store
            .input
            .entry(kind)
            .or_default()
            .insert(name.clone(), value.into());
    }

    pub fn get_input(&self, kind: ArtifactKind, name: &DocName) -> Result<&str, CacheError> {
        self.store
            .input
            .get(&kind)
            .and_then(|values| values.get(name))
            .map(String::as_str)
            .ok_or_else(|| CacheError::NotFound {
                kind,
                name: name.clone(),
            })
    }

    pub fn fingerprint(&self, name: &DocName) -> Option<&str> {
        self.store.fingerprints.get(name).map(String::as_str)
    }

    pub fn set_fingerprint(&mut self, name: &DocName, fingerprint: impl Into<String>) {
        self.store
            .fingerprints
            .insert(name.clone(), fingerprint.into());
    }

    /// True when the document was compiled from a source with this fingerprint
    /// and every entry compilation writes for it is still present.
    pub fn is_fresh(&self, name: &DocName, fingerprint: &str) -> bool {
        self.fingerprint(name) == Some(fingerprint)
            && self.store.output.contains_key(name)
            && ArtifactKind::ALL
                .iter()
                .all(|kind| self.get_input(*kind, name).is_ok())
    }

    /// Remove every entry that belongs to `name`
    pub fn remove_document(&mut self, name: &DocName) {
        self.store.output.remove(name);
        self.store.fingerprints.remove(name);
        for values in self.store.input.values_mut() {
            values.remove(name);
        }
    }

    /// Drop documents that are not in `live`; returns the names removed
    pub fn prune<'a>(&mut self, live: impl IntoIterator<Item = &'a DocName>) -> Vec<DocName> {
        let live: BTreeSet<&DocName> = live.into_iter().collect();
        let mut known: BTreeSet<DocName> = self.store.output.keys().cloned().collect();
        known.extend(self.store.fingerprints.keys().cloned());
        for values in self.store.input.values() {
            known.extend(values.keys().cloned());
        }

        let stale: Vec<DocName> = known.into_iter().filter(|n| !live.contains(n)).collect();
        for name in &stale {
            self.remove_document(name);
        }
        stale
    }

    /// Names present in the output namespace, in sorted order
    pub fn documents(&self) -> impl Iterator<Item = &DocName> {
        self.store.output.keys()
    }

    /// All values of one input kind
    pub fn inputs(&self, kind: ArtifactKind) -> impl Iterator<Item = (&DocName, &str)> {
        self.store
            .input
            .get(&kind)
            .into_iter()
            .flat_map(|values| values.iter().map(|(k, v)| (k, v.as_str())))
    }

    pub fn stats(&self) -> CacheStats {
        let count = |kind: ArtifactKind| self.store.input.get(&kind).map_or(0, BTreeMap::len);
        CacheStats {
            documents: self.store.output.len(),
            titles: count(ArtifactKind::Title),
            navtrees: count(ArtifactKind::Navtree),
            docs: count(ArtifactKind::Doc),
            fingerprints: self.store.fingerprints.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.store == Store::default()
    }
}

/// Fingerprint of a source file's bytes
pub fn fingerprint(source: &[u8]) -> String {
    blake3::hash(source).to_hex().to_string()
}
