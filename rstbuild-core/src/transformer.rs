//! AST to code model.

use crate::ast::{AstDoc, AstNode, HeaderLevel};
use crate::code::CodeModel;
use crate::slug::slugify;
use rstbuild_types::Dependency;

/// Compile a parsed document into its code model
pub fn transform(doc: &AstDoc) -> CodeModel {
    let mut code = CodeModel::new(doc.name.clone(), doc.title());
    transform_navigation(doc, &mut code);
    CodeVisitor::new(&mut code).visit_doc(doc);
    code
}

/// A header together with the headers nested below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub level: HeaderLevel,
    pub text: String,
    pub children: Vec<OutlineNode>,
}

/// Rebuild the header tree from a flat list of levels in document order.
///
/// Every level-1 header is a root. The children of a header are the run of
/// headers exactly one level deeper that immediately follows it; the run ends
/// at the first header of any other level. Headers outside such a run are not
/// reachable.
pub fn build_outline(headers: &[(HeaderLevel, &str)]) -> Vec<OutlineNode> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, (level, _))| *level == HeaderLevel::H1)
        .map(|(index, _)| outline_node(headers, index))
        .collect()
}

fn outline_node(headers: &[(HeaderLevel, &str)], index: usize) -> OutlineNode {
    let (level, text) = headers[index];
    let children = headers[index + 1..]
        .iter()
        .enumerate()
        .take_while(|(_, (next, _))| next.get() == level.get() + 1)
        .map(|(offset, _)| outline_node(headers, index + 1 + offset))
        .collect();

    OutlineNode {
        level,
        text: text.to_string(),
        children,
    }
}

/// Pre-order listing of an outline, the inverse of [`build_outline`]
pub fn flatten_outline(outline: &[OutlineNode]) -> Vec<(HeaderLevel, String)> {
    let mut flat = Vec::new();
    for node in outline {
        flat.push((node.level, node.text.clone()));
        flat.extend(flatten_outline(&node.children));
    }
    flat
}

/// Render the header outline as nested `<ul>` markup
fn transform_navigation(doc: &AstDoc, code: &mut CodeModel) {
    let outline = build_outline(&doc.headers());

    code.add_navigation(["<ul>"]);
    for node in &outline {
        navigation_item(node, code);
    }
    code.add_navigation(["</ul>"]);
}

fn navigation_item(node: &OutlineNode, code: &mut CodeModel) {
    let mut target = code.html_name();
    if node.level > HeaderLevel::H1 {
        target.push('#');
        target.push_str(&slugify(&node.text));
    }
    let link = format!(
        r#"<a class="toc-h{}" href="{}">{}</a>"#,
        node.level.get(),
        target,
        node.text
    );

    if node.children.is_empty() {
        code.add_navigation([format!("<li>{}</li>", link)]);
    } else {
        code.add_navigation(["<li>".to_string(), link, "<ul>".to_string()]);
        for child in &node.children {
            navigation_item(child, code);
        }
        code.add_navigation(["</ul>", "</li>"]);
    }
}

struct CodeVisitor<'a> {
    code: &'a mut CodeModel,
}

impl<'a> CodeVisitor<'a> {
    fn new(code: &'a mut CodeModel) -> Self {
        Self { code }
    }

    fn visit_doc(&mut self, doc: &AstDoc) {
        let title = format!("<title>{}</title>", doc.title());
        self.code
            .add_html(["<html>", "<head>", title.as_str(), "</head>", "<body>"]);
        self.visit_children(&doc.children);
        self.code.add_html(["</body>", "</html>"]);
        self.code.register_output();
    }

    fn visit_children(&mut self, children: &[AstNode]) {
        for child in children {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: &AstNode) {
        match node {
            AstNode::Header { level, text } => {
                let level = level.get();
                if level > 1 {
                    self.code.add_html([format!(r#"<a name="{}"/>"#, slugify(text))]);
                }
                self.code
                    .add_html([format!("<h{level}>{text}</h{level}>")]);
            }
            AstNode::Paragraph(children) => match children.as_slice() {
                [AstNode::Text(text)] => self.code.add_html([format!("<p>{}</p>", text)]),
                _ => {
                    self.code.add_html(["<p>"]);
                    self.visit_children(children);
                    self.code.add_html(["</p>"]);
                }
            },
            AstNode::Text(text) => self.code.add_html([text.as_str()]),
            AstNode::Xref(target) => {
                self.code.add_html([format!(r#"<a href="{}">"#, target.html_name())]);
                self.code.add_placeholder(Dependency::title(target.clone()));
                self.code.add_html(["</a>"]);
            }
            AstNode::Navtree(entries) => {
                self.code.add_html([r#"<div class="toctree">"#]);
                self.visit_children(entries);
                self.code.add_html(["</div>"]);
            }
            AstNode::NavEntry(target) => {
                self.code.add_placeholder(Dependency::navtree(target.clone()));
            }
        }
    }
}
