//! Structured text to AST.
//!
//! Parsing runs three passes, each consuming the token stream produced by the
//! previous one:
//!
//! 1. header recognition (a title line followed by an `=` or `-` underline)
//! 2. navigation blocks (`.. toctree::` followed by indented entries)
//! 3. paragraphs, split around `` :doc:`target` `` cross-references
//!
//! The parser never fails. Markup it does not understand ends up as
//! paragraph text.

use crate::ast::{AstDoc, AstNode, HeaderLevel};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Line that opens a navigation block
pub const NAVTREE_MARKER: &str = ".. toctree::";

static XREF_REGEX: OnceLock<Regex> = OnceLock::new();

fn xref_regex() -> &'static Regex {
    XREF_REGEX.get_or_init(|| Regex::new(r":doc:`([^`]+)`").unwrap())
}

/// Output of one pass: either a recognised node or a raw line still to classify
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Raw(String),
    Node(AstNode),
}

/// Read a source file and parse it; the document is named after the file stem
pub fn parse_file(path: &Path) -> std::io::Result<AstDoc> {
    let content = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_source(&name, &content))
}

/// Parse source text, dropping blank lines and trailing whitespace first
pub fn parse_source(name: &str, source: &str) -> AstDoc {
    let lines: Vec<&str> = source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect();
    parse(name, &lines)
}

/// Parse already split lines into a document
pub fn parse<S: AsRef<str>>(name: &str, lines: &[S]) -> AstDoc {
    let tokens = parse_headers(lines);
    let tokens = parse_navtrees(tokens);

    let mut doc = AstDoc::new(name);
    for node in parse_paragraphs(tokens) {
        doc.append_child(node);
    }
    doc
}

fn underline_level(line: &str) -> Option<HeaderLevel> {
    let line = line.trim_end();
    let first = line.chars().next()?;
    if !line.chars().all(|c| c == first) {
        return None;
    }
    match first {
        '=' => Some(HeaderLevel::H1),
        '-' => Some(HeaderLevel::H2),
        _ => None,
    }
}

fn parse_headers<S: AsRef<str>>(lines: &[S]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index].as_ref().trim_end();
        let underline = lines
            .get(index + 1)
            .and_then(|next| underline_level(next.as_ref()));

        match underline {
            Some(level) if !line.trim().is_empty() => {
                tokens.push(Token::Node(AstNode::Header {
                    level,
                    text: line.trim().to_string(),
                }));
                index += 2;
            }
            _ => {
                tokens.push(Token::Raw(line.to_string()));
                index += 1;
            }
        }
    }

    tokens
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn parse_navtrees(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let is_marker = matches!(&token, Token::Raw(line) if line.trim() == NAVTREE_MARKER);
        if !is_marker {
            result.push(token);
            continue;
        }

        // Raw lines are trimmed at the end, so an indented line is never blank
        let mut entries = Vec::new();
        while let Some(Token::Raw(line)) = iter.peek() {
            if !is_indented(line) {
                break;
            }
            entries.push(AstNode::NavEntry(line.trim().into()));
            iter.next();
        }
        result.push(Token::Node(AstNode::Navtree(entries)));
    }

    result
}

fn parse_paragraphs(tokens: Vec<Token>) -> Vec<AstNode> {
    tokens
        .into_iter()
        .filter_map(|token| match token {
            Token::Node(node) => Some(node),
            Token::Raw(line) if line.trim().is_empty() => None,
            Token::Raw(line) => Some(AstNode::Paragraph(split_inline(line.trim()))),
        })
        .collect()
}

/// Split a paragraph line into text runs and cross-references
fn split_inline(text: &str) -> Vec<AstNode> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for caps in xref_regex().captures_iter(text) {
        let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(AstNode::Text(text[last..whole.start()].to_string()));
        }
        nodes.push(AstNode::Xref(target.as_str().trim().into()));
        last = whole.end();
    }

    if last < text.len() {
        nodes.push(AstNode::Text(text[last..].to_string()));
    }
    nodes
}
