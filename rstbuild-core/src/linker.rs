//! Final HTML from cached code models.
//!
//! Linking reads only the artifact cache. Every dependency a document
//! declared must be present there; the resolved values are substituted for
//! their placeholders in a single, non-recursive pass.

use crate::code::parse_placeholder;
use rstbuild_cache::ArtifactCache;
use rstbuild_types::{ArtifactKind, Dependency, DocName};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("{document}: missing {kind} of '{target}'")]
    MissingArtifact {
        document: DocName,
        kind: ArtifactKind,
        target: DocName,
    },

    #[error("{0}: document was never compiled")]
    NotCompiled(DocName),
}

impl LinkError {
    pub fn document(&self) -> &DocName {
        match self {
            LinkError::MissingArtifact { document, .. } | LinkError::NotCompiled(document) => {
                document
            }
        }
    }
}

/// Resolve every placeholder of `name` against the cache and return its HTML lines
pub fn link(cache: &ArtifactCache, name: &DocName) -> Result<Vec<String>, LinkError> {
    let deps = cache
        .get_output(name)
        .map_err(|_| LinkError::NotCompiled(name.clone()))?;
    let page = cache
        .get_input(ArtifactKind::Doc, name)
        .map_err(|_| LinkError::MissingArtifact {
            document: name.clone(),
            kind: ArtifactKind::Doc,
            target: name.clone(),
        })?;

    let mut resolved: HashMap<&Dependency, &str> = HashMap::with_capacity(deps.len());
    for dep in deps {
        let value = cache
            .get_input(dep.kind, &dep.target)
            .map_err(|_| LinkError::MissingArtifact {
                document: name.clone(),
                kind: dep.kind,
                target: dep.target.clone(),
            })?;
        resolved.insert(dep, value);
    }

    Ok(page
        .split('\n')
        .map(|fragment| substitute(fragment, &resolved))
        .collect())
}

/// Replace a fragment that is exactly one declared placeholder; any other
/// fragment is source text and is kept as written.
fn substitute(fragment: &str, resolved: &HashMap<&Dependency, &str>) -> String {
    parse_placeholder(fragment)
        .and_then(|dep| resolved.get(&dep).copied())
        .unwrap_or(fragment)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::transformer::transform;

    fn compile(cache: &mut ArtifactCache, name: &str, lines: &[&str]) {
        transform(&parse(name, lines)).write_cache(cache);
    }

    #[test]
    fn test_link_resolves_titles() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "index", &["Home", "====", "Read :doc:`install` first."]);
        compile(&mut cache, "install", &["Installation", "============"]);

        let html = link(&cache, &"index".into()).unwrap();
        assert!(html.contains(&"Installation".to_string()));
        assert!(!html.iter().any(|l| l.contains("{{")));
    }

    #[test]
    fn test_link_order_is_irrelevant() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "install", &["Installation", "============"]);
        compile(&mut cache, "index", &["Home", "====", ":doc:`install`"]);
        let first = link(&cache, &"index".into()).unwrap();

        let mut reversed = ArtifactCache::new();
        compile(&mut reversed, "index", &["Home", "====", ":doc:`install`"]);
        compile(&mut reversed, "install", &["Installation", "============"]);
        let second = link(&reversed, &"index".into()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_target_is_reported() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "index", &["Home", "====", "See :doc:`ghost`."]);

        let err = link(&cache, &"index".into()).unwrap_err();
        assert_eq!(
            err,
            LinkError::MissingArtifact {
                document: "index".into(),
                kind: ArtifactKind::Title,
                target: "ghost".into(),
            }
        );
        assert_eq!(err.to_string(), "index: missing title of 'ghost'");
    }

    #[test]
    fn test_missing_navtree_is_reported() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "index", &[".. toctree::", "   ghost"]);

        let err = link(&cache, &"index".into()).unwrap_err();
        assert!(matches!(
            err,
            LinkError::MissingArtifact { kind: ArtifactKind::Navtree, ref target, .. } if target.as_str() == "ghost"
        ));
    }

    #[test]
    fn test_uncompiled_document() {
        let cache = ArtifactCache::new();
        let err = link(&cache, &"index".into()).unwrap_err();
        assert_eq!(err, LinkError::NotCompiled("index".into()));
        assert_eq!(err.document().as_str(), "index");
    }

    #[test]
    fn test_resolved_values_are_not_rescanned() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "index", &[":doc:`odd`"]);
        compile(&mut cache, "odd", &["{{title:index}}", "==============="]);

        let html = link(&cache, &"index".into()).unwrap();
        assert!(html.contains(&"{{title:index}}".to_string()));
    }

    #[test]
    fn test_literal_placeholder_text_is_kept() {
        let mut cache = ArtifactCache::new();
        compile(&mut cache, "index", &["Write {{title:x}} to reference x."]);

        let html = link(&cache, &"index".into()).unwrap();
        assert!(html.contains(&"<p>Write {{title:x}} to reference x.</p>".to_string()));
    }

    #[test]
    fn test_declared_placeholder_text_in_source_is_kept() {
        let mut cache = ArtifactCache::new();
        compile(
            &mut cache,
            "index",
            &["Type {{title:install}} then see :doc:`install`."],
        );
        compile(&mut cache, "install", &["Installation", "============"]);

        let html = link(&cache, &"index".into()).unwrap();
        let body: Vec<&str> = html[5..html.len() - 2].iter().map(String::as_str).collect();
        assert_eq!(
            body,
            vec![
                "<p>",
                "Type {{title:install}} then see ",
                r#"<a href="install.html">"#,
                "Installation",
                "</a>",
                ".",
                "</p>",
            ]
        );
    }

    #[test]
    fn test_substitute_whole_fragment_only() {
        let dep = Dependency::title("a");
        let resolved = HashMap::from([(&dep, "Alpha")]);
        assert_eq!(substitute("{{title:a}}", &resolved), "Alpha");
        assert_eq!(substitute("[{{title:a}}]", &resolved), "[{{title:a}}]");
        assert_eq!(substitute("{{title:b}}", &resolved), "{{title:b}}");
        assert_eq!(substitute("plain", &resolved), "plain");
    }
}
