//! Renderer for evaluating a hamlite tree against a scope.
//!
//! Output is built line by line. Every node starts a line at its indentation
//! unless the previous node asked to stay on the same line (the `<`
//! modifier), in which case the node continues right where that one ended.

use crate::attributes;
use crate::doctype;
use crate::html_escape;
use crate::options::Options;
use crate::scope::Scope;
use crate::value::Value;
use hamlite_ast::{
    AssignmentNode, Deferred, DoctypeNode, Expr, FilterNode, Literal, Node, RangeNode, TagNode,
    TextNode, Tree,
};
use tracing::{debug, warn};

/// Renderer for evaluating a hamlite tree
pub struct Renderer<'a> {
    options: &'a Options,
    output: String,
    /// The next node continues the current line.
    inline: bool,
}

impl<'a> Renderer<'a> {
    /// Create a new renderer
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            output: String::new(),
            inline: false,
        }
    }

    /// Render a tree; trailing whitespace at the end of the document is trimmed
    pub fn render(mut self, tree: &Tree, scope: &mut Scope) -> String {
        self.render_nodes(tree.nodes(), "", scope);
        let len = self.output.trim_end().len();
        self.output.truncate(len);
        self.output
    }

    fn render_nodes(&mut self, nodes: &[Node], indent: &str, scope: &mut Scope) {
        for node in nodes {
            match node {
                Node::Tag(n) => self.render_tag(n, indent, scope),
                Node::Range(n) => self.render_range(n, indent, scope),
                Node::Doctype(n) => self.render_doctype(n, indent),
                Node::Text(n) => self.render_text(n, indent, scope),
                Node::Filter(n) => self.render_filter(n, indent),
                Node::Assignment(n) => self.render_assignment(n, scope),
            }
            // Only elements open a level; anything nested under another node
            // continues at that node's indentation.
            if !matches!(node, Node::Tag(_) | Node::Range(_)) {
                self.render_nodes(node.children(), indent, scope);
            }
        }
    }

    fn render_tag(&mut self, node: &TagNode, indent: &str, scope: &mut Scope) {
        let attrs = attributes::render(&node.attributes, scope, self.options);
        let content = node
            .content
            .as_ref()
            .map(|content| self.resolve_content(content, scope))
            .unwrap_or_default();

        self.begin_line(indent);
        if node.children.is_empty() && !content.is_empty() {
            self.push(&format!("<{}{attrs}>{content}</{}>", node.name, node.name));
            self.end_line(node.no_newline);
        } else if !node.children.is_empty() {
            self.push(&format!("<{}{attrs}>", node.name));
            if node.no_newline {
                self.inline = true;
                self.emit_line(&content, indent, false);
                self.render_nodes(&node.children, indent, scope);
                if self.output.ends_with('\n') {
                    self.output.pop();
                }
                self.inline = false;
            } else {
                self.output.push('\n');
                let child_indent = format!("{indent}{}", self.options.indentation);
                self.emit_line(&content, &child_indent, false);
                self.render_nodes(&node.children, &child_indent, scope);
                self.begin_line(indent);
            }
            self.push(&format!("</{}>", node.name));
            self.end_line(false);
        } else {
            let closed = node.force_close || self.options.is_autoclosed(&node.name);
            let close = if closed {
                self.options.format.self_close()
            } else {
                ">"
            };
            self.push(&format!("<{}{attrs}{close}", node.name));
            self.end_line(node.no_newline);
        }
    }

    fn render_doctype(&mut self, node: &DoctypeNode, indent: &str) {
        match doctype::declaration(self.options.format, &node.specifier) {
            Some("") => {}
            Some(decl) => {
                self.begin_line(indent);
                self.push(decl);
                self.end_line(false);
            }
            None => warn!(
                format = ?self.options.format,
                specifier = %node.specifier,
                line = node.location.line,
                "unknown doctype"
            ),
        }
    }

    fn render_text(&mut self, node: &TextNode, indent: &str, scope: &Scope) {
        let text = self.resolve_content(&node.content, scope);
        self.emit_line(&text, indent, node.no_newline);
    }

    /// Emit `text` as one output line; empty text emits nothing.
    fn emit_line(&mut self, text: &str, indent: &str, no_newline: bool) {
        if text.is_empty() {
            return;
        }
        self.begin_line(indent);
        self.push(text);
        self.end_line(no_newline);
    }

    fn render_filter(&mut self, node: &FilterNode, indent: &str) {
        for line in &node.lines {
            if !line.text.is_empty() {
                self.begin_line(indent);
                for _ in 0..line.level {
                    self.output.push_str(&self.options.indentation);
                }
                self.push(&line.text);
            }
            self.end_line(false);
        }
    }

    fn render_assignment(&mut self, node: &AssignmentNode, scope: &mut Scope) {
        let value = match &node.value {
            Expr::Literal(Literal::String(s)) => Value::String(s.clone()),
            Expr::Literal(Literal::Int(n)) => Value::Int(*n),
            Expr::Literal(Literal::Float(f)) => Value::Float(*f),
            Expr::Lookup(path) => scope.resolve(path).cloned().unwrap_or_default(),
        };
        scope.insert(node.name.clone(), value);
    }

    fn render_range(&mut self, node: &RangeNode, indent: &str, scope: &mut Scope) {
        let Some(entries) = scope.resolve(&node.collection).and_then(Value::entries) else {
            debug!(
                collection = %node.collection.as_str(),
                line = node.location.line,
                "range over a missing or non-collection value, skipping"
            );
            return;
        };

        let bound: Vec<&String> = node.key.iter().chain(node.value.iter()).collect();
        let saved: Vec<(String, Option<Value>)> = bound
            .iter()
            .map(|name| (name.to_string(), scope.get(name).cloned()))
            .collect();

        for (key, value) in entries {
            if let Some(name) = &node.key {
                scope.insert(name.clone(), key);
            }
            if let Some(name) = &node.value {
                scope.insert(name.clone(), value);
            }
            self.render_nodes(&node.children, indent, scope);
        }

        for (name, previous) in saved.into_iter().rev() {
            match previous {
                Some(value) => {
                    scope.insert(name, value);
                }
                None => {
                    scope.remove(&name);
                }
            }
        }
    }

    fn resolve_content(&self, content: &Deferred, scope: &Scope) -> String {
        let text = scope.text(content);
        if self.options.escape_html && content.is_lookup() {
            html_escape::escape(&text).into_owned()
        } else {
            text
        }
    }

    fn begin_line(&mut self, indent: &str) {
        if !self.inline {
            self.output.push_str(indent);
        }
        self.inline = false;
    }

    fn end_line(&mut self, no_newline: bool) {
        if no_newline {
            self.inline = true;
        } else {
            self.output.push('\n');
        }
    }

    fn push(&mut self, text: &str) {
        self.output.push_str(text);
    }
}
