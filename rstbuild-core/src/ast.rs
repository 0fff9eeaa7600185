//! In-memory tree for one parsed document.
//!
//! Only documents, paragraphs and navigation trees own children; every other
//! node is a leaf that carries its payload directly. The enum layout makes
//! that invariant structural.

use rstbuild_types::DocName;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Title used when a document has no level-1 header
pub const UNTITLED: &str = "Untitled";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),
}

/// Header level, always in `1..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeaderLevel(u8);

impl HeaderLevel {
    pub const H1: HeaderLevel = HeaderLevel(1);
    pub const H2: HeaderLevel = HeaderLevel(2);

    pub fn new(level: u8) -> Result<Self, AstError> {
        if (1..=6).contains(&level) {
            Ok(HeaderLevel(level))
        } else {
            Err(AstError::UnknownKind(format!("h{}", level)))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Header(HeaderLevel),
    Paragraph,
    Text,
    Xref,
    Navtree,
    NavEntry,
}

impl NodeKind {
    pub fn name(&self) -> String {
        match self {
            NodeKind::Doc => "doc".to_string(),
            NodeKind::Header(level) => format!("h{}", level.get()),
            NodeKind::Paragraph => "p".to_string(),
            NodeKind::Text => "text".to_string(),
            NodeKind::Xref => "xref".to_string(),
            NodeKind::Navtree => "navtree".to_string(),
            NodeKind::NavEntry => "naventry".to_string(),
        }
    }
}

impl FromStr for NodeKind {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doc" => Ok(NodeKind::Doc),
            "p" => Ok(NodeKind::Paragraph),
            "text" => Ok(NodeKind::Text),
            "xref" => Ok(NodeKind::Xref),
            "navtree" => Ok(NodeKind::Navtree),
            "naventry" => Ok(NodeKind::NavEntry),
            _ => match s.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
                Some(level) => HeaderLevel::new(level).map(NodeKind::Header),
                None => Err(AstError::UnknownKind(s.to_string())),
            },
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A node below the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Header { level: HeaderLevel, text: String },
    Paragraph(Vec<AstNode>),
    Text(String),
    Xref(DocName),
    Navtree(Vec<AstNode>),
    NavEntry(DocName),
}

impl AstNode {
    pub fn header(level: u8, text: impl Into<String>) -> Result<Self, AstError> {
        Ok(AstNode::Header {
            level: HeaderLevel::new(level)?,
            text: text.into(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Header { level, .. } => NodeKind::Header(*level),
            AstNode::Paragraph(_) => NodeKind::Paragraph,
            AstNode::Text(_) => NodeKind::Text,
            AstNode::Xref(_) => NodeKind::Xref,
            AstNode::Navtree(_) => NodeKind::Navtree,
            AstNode::NavEntry(_) => NodeKind::NavEntry,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            AstNode::Header { text, .. } | AstNode::Text(text) => Some(text.as_str()),
            AstNode::Xref(target) | AstNode::NavEntry(target) => Some(target.as_str()),
            AstNode::Paragraph(_) | AstNode::Navtree(_) => None,
        }
    }

    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Paragraph(children) | AstNode::Navtree(children) => children,
            _ => &[],
        }
    }

    pub fn header_level(&self) -> Option<HeaderLevel> {
        match self {
            AstNode::Header { level, .. } => Some(*level),
            _ => None,
        }
    }

    fn dump_into(&self, depth: usize, out: &mut Vec<String>) {
        out.push(node_line(depth, &self.kind(), self.payload()));
        for child in self.children() {
            child.dump_into(depth + 1, out);
        }
    }
}

fn node_line(depth: usize, kind: &NodeKind, payload: Option<&str>) -> String {
    let indent = " ".repeat(depth * 2);
    match payload {
        Some(data) if !data.is_empty() => format!("{}{}({})", indent, kind, data),
        _ => format!("{}{}", indent, kind),
    }
}

/// Root of a parsed document; its payload is the document name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstDoc {
    pub name: DocName,
    pub children: Vec<AstNode>,
}

impl AstDoc {
    pub fn new(name: impl Into<DocName>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn append_child(&mut self, child: AstNode) {
        self.children.push(child);
    }

    /// Headers reachable from the root, in document order
    pub fn headers(&self) -> Vec<(HeaderLevel, &str)> {
        self.children
            .iter()
            .filter_map(|node| match node {
                AstNode::Header { level, text } => Some((*level, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Text of the first level-1 header, or [`UNTITLED`]
    pub fn title(&self) -> &str {
        self.headers()
            .into_iter()
            .find(|(level, _)| *level == HeaderLevel::H1)
            .map(|(_, text)| text)
            .unwrap_or(UNTITLED)
    }

    /// Indented pre-order listing of the tree, one node per line
    pub fn dump_ast(&self) -> String {
        let mut lines = vec![node_line(0, &NodeKind::Doc, Some(self.name.as_str()))];
        for child in &self.children {
            child.dump_into(1, &mut lines);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_level_bounds() {
        assert!(HeaderLevel::new(1).is_ok());
        assert!(HeaderLevel::new(6).is_ok());
        assert_eq!(
            HeaderLevel::new(7),
            Err(AstError::UnknownKind("h7".to_string()))
        );
        assert!(HeaderLevel::new(0).is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("p".parse::<NodeKind>(), Ok(NodeKind::Paragraph));
        assert_eq!("h3".parse::<NodeKind>().map(|k| k.name()), Ok("h3".to_string()));
        assert_eq!(
            "table".parse::<NodeKind>(),
            Err(AstError::UnknownKind("table".to_string()))
        );
        assert!("h9".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_leaves_have_no_children() {
        let header = AstNode::header(2, "Usage").unwrap();
        assert!(header.children().is_empty());
        assert_eq!(header.payload(), Some("Usage"));
        assert_eq!(header.kind().name(), "h2");

        let p = AstNode::Paragraph(vec![AstNode::Text("hi".into())]);
        assert_eq!(p.children().len(), 1);
        assert_eq!(p.payload(), None);
    }

    #[test]
    fn test_title_is_first_h1() {
        let mut doc = AstDoc::new("guide");
        doc.append_child(AstNode::header(2, "Intro").unwrap());
        doc.append_child(AstNode::header(1, "Guide").unwrap());
        doc.append_child(AstNode::header(1, "Appendix").unwrap());
        assert_eq!(doc.title(), "Guide");
    }

    #[test]
    fn test_untitled_default() {
        let mut doc = AstDoc::new("notes");
        doc.append_child(AstNode::header(2, "Only a section").unwrap());
        assert_eq!(doc.title(), UNTITLED);
    }

    #[test]
    fn test_dump_ast() {
        let mut doc = AstDoc::new("install");
        doc.append_child(AstNode::header(1, "Installation").unwrap());
        doc.append_child(AstNode::Paragraph(vec![
            AstNode::Text("See ".into()),
            AstNode::Xref("api".into()),
        ]));
        assert_eq!(
            doc.dump_ast(),
            "doc(install)\n  h1(Installation)\n  p\n    text(See )\n    xref(api)"
        );
    }
}
