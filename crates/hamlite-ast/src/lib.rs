//! Construction phase for hamlite templates.
//!
//! Source text is consumed one line at a time: each line is classified into a
//! node by a small state machine, filter bodies are captured verbatim, and the
//! resulting nodes are placed into a tree purely from their indentation depth.

mod classifier;
mod code;
mod filter;
mod lexer;
mod parser;
mod token;

pub use filter::{FilterFn, FilterLine, FilterRegistry};

use thiserror::Error;

// ============================================================================
// Location
// ============================================================================

/// Location in source code (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

// ============================================================================
// Values
// ============================================================================

/// A dot-separated lookup path (e.g., user.profile.name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a dotted path, dropping empty segments.
    pub fn parse(source: &str) -> Self {
        Self {
            segments: source
                .split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path as a dot-separated string.
    pub fn as_str(&self) -> String {
        self.segments.join(".")
    }
}

/// A value resolved at render time: either literal text or a scope lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Literal(String),
    Lookup(Path),
}

impl Deferred {
    pub fn literal(text: impl Into<String>) -> Self {
        Deferred::Literal(text.into())
    }

    pub fn lookup(path: &str) -> Self {
        Deferred::Lookup(Path::parse(path))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Deferred::Lookup(_))
    }
}

/// One `key => value` pair from a tag's class/id shorthand or attribute block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: Deferred,
    pub value: Deferred,
}

impl Attribute {
    pub fn new(key: Deferred, value: Deferred) -> Self {
        Self { key, value }
    }
}

/// Literal operand of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Lookup(Path),
}

// ============================================================================
// Nodes
// ============================================================================

/// A compiled template: top-level nodes plus the indentation detected in the
/// source.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    indentation: Option<String>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>, indentation: Option<String>) -> Self {
        Self { nodes, indentation }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Leading whitespace of the first indented source line, if any.
    pub fn indentation(&self) -> Option<&str> {
        self.indentation.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Tag(TagNode),
    Doctype(DoctypeNode),
    Text(TextNode),
    Filter(FilterNode),
    Assignment(AssignmentNode),
    Range(RangeNode),
}

impl Node {
    pub fn location(&self) -> Location {
        match self {
            Node::Tag(n) => n.location,
            Node::Doctype(n) => n.location,
            Node::Text(n) => n.location,
            Node::Filter(n) => n.location,
            Node::Assignment(n) => n.location,
            Node::Range(n) => n.location,
        }
    }

    /// Depth is the number of leading whitespace characters on the source line.
    pub fn depth(&self) -> usize {
        match self {
            Node::Tag(n) => n.depth,
            Node::Doctype(n) => n.depth,
            Node::Text(n) => n.depth,
            Node::Filter(n) => n.depth,
            Node::Assignment(n) => n.depth,
            Node::Range(n) => n.depth,
        }
    }

    /// Lines nested below this node. Every node kind can hold them; only
    /// tags and loops give them their own indentation level.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Tag(n) => &n.children,
            Node::Doctype(n) => &n.children,
            Node::Text(n) => &n.children,
            Node::Filter(n) => &n.children,
            Node::Assignment(n) => &n.children,
            Node::Range(n) => &n.children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Node::Tag(n) => &mut n.children,
            Node::Doctype(n) => &mut n.children,
            Node::Text(n) => &mut n.children,
            Node::Filter(n) => &mut n.children,
            Node::Assignment(n) => &mut n.children,
            Node::Range(n) => &mut n.children,
        }
    }
}

/// `%name.class#id{attrs}< content`
#[derive(Debug, Clone, PartialEq)]
pub struct TagNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub content: Option<Deferred>,
    pub children: Vec<Node>,
    /// Set by a trailing `/`.
    pub force_close: bool,
    /// Set by `<`.
    pub no_newline: bool,
    pub depth: usize,
    pub location: Location,
}

/// `!!! specifier`
#[derive(Debug, Clone, PartialEq)]
pub struct DoctypeNode {
    pub specifier: String,
    pub children: Vec<Node>,
    pub depth: usize,
    pub location: Location,
}

/// A bare output line: literal text or `= lookup`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub content: Deferred,
    pub no_newline: bool,
    pub children: Vec<Node>,
    pub depth: usize,
    pub location: Location,
}

/// `:name` followed by a raw body, already formatted by the named filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub name: String,
    pub lines: Vec<FilterLine>,
    pub children: Vec<Node>,
    pub depth: usize,
    pub location: Location,
}

/// `- name := expr`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub name: String,
    pub value: Expr,
    pub children: Vec<Node>,
    pub depth: usize,
    pub location: Location,
}

/// `- for key, value := range collection`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    /// Index (lists) or key (maps) binding; `None` when omitted or `_`.
    pub key: Option<String>,
    /// Element binding; `None` when omitted or `_`.
    pub value: Option<String>,
    pub collection: Path,
    pub children: Vec<Node>,
    pub depth: usize,
    pub location: Location,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("inconsistent indentation at line {line}, column {column}: changed from {from} to {to} characters")]
    InconsistentIndentation {
        from: &'static str,
        to: &'static str,
        line: usize,
        column: usize,
    },

    #[error("invalid tag: missing tag name at line {line}, column {column}")]
    EmptyTagName { line: usize, column: usize },

    #[error("unexpected character '{found}' at line {line}, column {column}")]
    UnexpectedCharacter {
        found: char,
        line: usize,
        column: usize,
    },

    #[error("illegal element: classes and ids must have values at line {line}, column {column}")]
    EmptyClassOrId { line: usize, column: usize },

    #[error("attributes must have a closing '{close}' at line {line}, column {column}")]
    UnterminatedAttributes {
        close: char,
        line: usize,
        column: usize,
    },

    #[error("malformed attribute at line {line}, column {column}: {message}")]
    MalformedAttribute {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("missing expression after '=' at line {line}, column {column}")]
    MissingExpression { line: usize, column: usize },

    #[error("self-closing tag cannot have content at line {line}, column {column}")]
    SelfClosingContent { line: usize, column: usize },

    #[error("invalid filter declaration at line {line}, column {column}")]
    MalformedFilter { line: usize, column: usize },

    #[error("filter not found: '{name}' at line {line}, column {column}")]
    UnknownFilter {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("unrecognized code at line {line}, column {column}: {message}")]
    Code {
        message: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            ParseError::InconsistentIndentation { line, column, .. }
            | ParseError::EmptyTagName { line, column }
            | ParseError::UnexpectedCharacter { line, column, .. }
            | ParseError::EmptyClassOrId { line, column }
            | ParseError::UnterminatedAttributes { line, column, .. }
            | ParseError::MalformedAttribute { line, column, .. }
            | ParseError::MissingExpression { line, column }
            | ParseError::SelfClosingContent { line, column }
            | ParseError::MalformedFilter { line, column }
            | ParseError::UnknownFilter { line, column, .. }
            | ParseError::Code { line, column, .. } => Location::new(*line, *column),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a template source string using the default filters.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    parse_with_filters(source, &FilterRegistry::default())
}

/// Parse a template source string, resolving `:name` blocks against `filters`.
pub fn parse_with_filters(source: &str, filters: &FilterRegistry) -> Result<Tree, ParseError> {
    parser::Parser::new(filters).parse(source)
}

// ============================================================================
// Tests
// ============================================================================
