//! Per-line state machine.
//!
//! A line arrives with its leading whitespace already measured. The first
//! significant character selects how the rest of the line is read; tag lines
//! then move through name, id, class and tail states until the first
//! whitespace outside an attribute block hands the remainder to the tag as
//! inline content.

use crate::code::{self, CodeLine};
use crate::{
    AssignmentNode, Attribute, Deferred, DoctypeNode, Location, Node, ParseError, RangeNode,
    TagNode, TextNode,
};

/// Result of classifying one source line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Classified {
    Node(Node),
    /// A `:name` declaration; the following deeper lines form its body.
    Filter(FilterHeader),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilterHeader {
    pub name: String,
    /// Text following the name on the declaration line.
    pub inline: Option<String>,
    pub location: Location,
}

/// States a tag line moves through after its leading sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    Name,
    Id,
    Class,
    Tail,
}

pub(crate) struct Classifier {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    depth: usize,
}

impl Classifier {
    /// `depth` is the number of leading whitespace characters, where
    /// classification starts.
    pub(crate) fn new(text: &str, line: usize, depth: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: depth,
            line,
            depth,
        }
    }

    pub(crate) fn classify(mut self) -> Result<Classified, ParseError> {
        let location = self.location();
        let node = match self.current_char() {
            Some('!') if self.looking_at("!!!") => {
                self.pos += 3;
                Node::Doctype(DoctypeNode {
                    specifier: self.rest().trim().to_string(),
                    children: Vec::new(),
                    depth: self.depth,
                    location,
                })
            }
            Some('%') => {
                self.advance();
                self.classify_tag(TagState::Name, location)?
            }
            Some('#') => self.classify_tag(TagState::Id, location)?,
            Some('.') => self.classify_tag(TagState::Class, location)?,
            Some('=') => {
                self.advance();
                let (content, no_newline) = self.lookup_remainder(location.column)?;
                self.text_node(content, no_newline, location)
            }
            Some('\\') => {
                self.advance();
                let (text, no_newline) = self.remainder();
                self.text_node(Deferred::Literal(text), no_newline, location)
            }
            Some('-') => {
                self.advance();
                self.classify_code(location)?
            }
            Some(':') => return self.classify_filter(location).map(Classified::Filter),
            _ => {
                let (text, no_newline) = self.remainder();
                self.text_node(Deferred::Literal(text), no_newline, location)
            }
        };
        Ok(Classified::Node(node))
    }

    fn classify_tag(&mut self, mut state: TagState, location: Location) -> Result<Node, ParseError> {
        let mut tag = TagNode {
            name: String::new(),
            attributes: Vec::new(),
            content: None,
            children: Vec::new(),
            force_close: false,
            no_newline: false,
            depth: self.depth,
            location,
        };

        loop {
            state = match state {
                TagState::Name => {
                    let name = self.read_while(is_tag_name_char);
                    if name.is_empty() {
                        return Err(ParseError::EmptyTagName {
                            line: self.line,
                            column: location.column,
                        });
                    }
                    tag.name = name;
                    TagState::Tail
                }
                TagState::Id | TagState::Class => {
                    let column = self.column();
                    self.advance();
                    let value = self.read_while(is_selector_char);
                    if value.is_empty() {
                        return Err(ParseError::EmptyClassOrId {
                            line: self.line,
                            column,
                        });
                    }
                    let key = if state == TagState::Id { "id" } else { "class" };
                    tag.attributes
                        .push(Attribute::new(Deferred::literal(key), Deferred::Literal(value)));
                    TagState::Tail
                }
                TagState::Tail => match self.current_char() {
                    None => break,
                    Some('.') => TagState::Class,
                    Some('#') => TagState::Id,
                    Some('{') => {
                        self.parse_hash_attributes(&mut tag.attributes)?;
                        TagState::Tail
                    }
                    Some('(') => {
                        self.parse_html_attributes(&mut tag.attributes)?;
                        TagState::Tail
                    }
                    Some('<') => {
                        self.advance();
                        tag.no_newline = true;
                        TagState::Tail
                    }
                    Some('/') => {
                        self.advance();
                        self.skip_whitespace();
                        if self.current_char().is_some() {
                            return Err(ParseError::SelfClosingContent {
                                line: self.line,
                                column: self.column(),
                            });
                        }
                        tag.force_close = true;
                        break;
                    }
                    Some('=') => {
                        let column = self.column();
                        self.advance();
                        let (content, no_newline) = self.lookup_remainder(column)?;
                        tag.content = Some(content);
                        tag.no_newline |= no_newline;
                        break;
                    }
                    Some(c) if c.is_whitespace() => {
                        self.skip_whitespace();
                        let (text, no_newline) = self.remainder();
                        if !text.is_empty() {
                            tag.content = Some(Deferred::Literal(text));
                        }
                        tag.no_newline |= no_newline;
                        break;
                    }
                    Some(found) => {
                        return Err(ParseError::UnexpectedCharacter {
                            found,
                            line: self.line,
                            column: self.column(),
                        })
                    }
                },
            };
        }

        if tag.name.is_empty() {
            tag.name = "div".to_string();
        }
        Ok(Node::Tag(tag))
    }

    fn classify_code(&mut self, location: Location) -> Result<Node, ParseError> {
        let source = self.rest();
        let node = match code::parse(&source, self.line, self.column())? {
            CodeLine::Assignment { name, value } => Node::Assignment(AssignmentNode {
                name,
                value,
                children: Vec::new(),
                depth: self.depth,
                location,
            }),
            CodeLine::Range {
                key,
                value,
                collection,
            } => Node::Range(RangeNode {
                key,
                value,
                collection,
                children: Vec::new(),
                depth: self.depth,
                location,
            }),
        };
        Ok(node)
    }

    fn classify_filter(&mut self, location: Location) -> Result<FilterHeader, ParseError> {
        self.advance(); // :
        let name = self.read_while(is_selector_char);
        let terminated = self.current_char().map_or(true, char::is_whitespace);
        if name.is_empty() || !terminated {
            return Err(ParseError::MalformedFilter {
                line: self.line,
                column: location.column,
            });
        }
        let inline = self.rest().trim().to_string();
        Ok(FilterHeader {
            name,
            inline: (!inline.is_empty()).then_some(inline),
            location,
        })
    }

    fn text_node(&self, content: Deferred, no_newline: bool, location: Location) -> Node {
        Node::Text(TextNode {
            content,
            no_newline,
            children: Vec::new(),
            depth: self.depth,
            location,
        })
    }

    /// Rest of the line with trailing whitespace removed; a final `<` is
    /// stripped and reported as the no-newline modifier.
    fn remainder(&mut self) -> (String, bool) {
        let rest = self.rest();
        self.pos = self.chars.len();
        let text = rest.trim_end();
        match text.strip_suffix('<') {
            Some(stripped) => (stripped.to_string(), true),
            None => (text.to_string(), false),
        }
    }

    /// Remainder after `=`, read as a lookup path. `column` points at the `=`.
    fn lookup_remainder(&mut self, column: usize) -> Result<(Deferred, bool), ParseError> {
        self.skip_whitespace();
        let (text, no_newline) = self.remainder();
        let path = text.trim();
        if path.is_empty() {
            return Err(ParseError::MissingExpression {
                line: self.line,
                column,
            });
        }
        Ok((Deferred::lookup(path), no_newline))
    }

    // ------------------------------------------------------------------------
    // Attribute blocks
    // ------------------------------------------------------------------------

    /// `{:key => value, key: value, "key" => value}`
    fn parse_hash_attributes(&mut self, attributes: &mut Vec<Attribute>) -> Result<(), ParseError> {
        let open = self.pos;
        let close = self.find_closing(open, '}')?;
        for (start, end) in self.split_entries(open + 1, close) {
            attributes.push(self.parse_hash_entry(start, end)?);
        }
        self.pos = close + 1;
        Ok(())
    }

    /// `(key="value" key=lookup flag)`
    fn parse_html_attributes(&mut self, attributes: &mut Vec<Attribute>) -> Result<(), ParseError> {
        let open = self.pos;
        let close = self.find_closing(open, ')')?;
        let mut i = open + 1;

        loop {
            i = self.skip_spaces_in(i, close);
            if i >= close {
                break;
            }
            let key_start = i;
            while i < close && !self.chars[i].is_whitespace() && self.chars[i] != '=' {
                i += 1;
            }
            let key = self.text(key_start, i);
            if key.is_empty() || !key.chars().all(is_tag_name_char) {
                return Err(self.malformed(format!("invalid attribute name '{key}'"), key_start));
            }

            i = self.skip_spaces_in(i, close);
            let value = if i < close && self.chars[i] == '=' {
                i = self.skip_spaces_in(i + 1, close);
                let value_start = i;
                if i < close && is_quote(self.chars[i]) {
                    i = self
                        .quote_end(i, close)
                        .ok_or_else(|| self.malformed("unterminated string", value_start))?
                        + 1;
                } else {
                    while i < close && !self.chars[i].is_whitespace() {
                        i += 1;
                    }
                }
                self.parse_value(value_start, i)?
            } else {
                Deferred::literal("true")
            };
            attributes.push(Attribute::new(Deferred::Literal(key), value));
        }

        self.pos = close + 1;
        Ok(())
    }

    fn parse_hash_entry(&self, start: usize, end: usize) -> Result<Attribute, ParseError> {
        if let Some(rocket) = self.find_rocket(start, end) {
            let key = self.parse_key(start, rocket)?;
            let value = self.parse_value(rocket + 2, end)?;
            return Ok(Attribute::new(key, value));
        }

        // `name: value` or `"name": value`
        let (key, colon) = if is_quote(self.chars[start]) {
            let close = self
                .quote_end(start, end)
                .ok_or_else(|| self.malformed("unterminated string", start))?;
            (self.unquote(start, close), close + 1)
        } else {
            let mut i = start;
            while i < end && is_selector_char(self.chars[i]) {
                i += 1;
            }
            (self.text(start, i), i)
        };
        let separated = colon < end
            && self.chars[colon] == ':'
            && (colon + 1 == end || self.chars[colon + 1].is_whitespace());
        if key.is_empty() || !separated {
            return Err(self.malformed("expected '=>' or ':' after attribute name", start));
        }
        let value = self.parse_value(colon + 1, end)?;
        Ok(Attribute::new(Deferred::Literal(key), value))
    }

    fn parse_key(&self, start: usize, end: usize) -> Result<Deferred, ParseError> {
        let (start, end) = self.trim_range(start, end);
        if start == end {
            return Err(self.malformed("missing attribute name", start));
        }
        let text = self.text(start, end);
        if let Some(symbol) = text.strip_prefix(':') {
            if !symbol.is_empty() && symbol.chars().all(is_selector_char) {
                return Ok(Deferred::literal(symbol));
            }
        } else if let Some(key) = self.quoted(start, end) {
            return Ok(Deferred::Literal(key));
        } else if is_path(&text) {
            return Ok(Deferred::lookup(&text));
        }
        Err(self.malformed(format!("invalid attribute name '{text}'"), start))
    }

    fn parse_value(&self, start: usize, end: usize) -> Result<Deferred, ParseError> {
        let (start, end) = self.trim_range(start, end);
        if start == end {
            return Err(self.malformed("attribute requires a value", start));
        }
        if let Some(value) = self.quoted(start, end) {
            return Ok(Deferred::Literal(value));
        }
        let text = self.text(start, end);
        if let Some(symbol) = text.strip_prefix(':') {
            if !symbol.is_empty() && symbol.chars().all(is_selector_char) {
                return Ok(Deferred::literal(symbol));
            }
        } else if text == "true" || text == "false" || is_number(&text) {
            return Ok(Deferred::Literal(text));
        } else if is_path(&text) {
            return Ok(Deferred::lookup(&text));
        }
        Err(self.malformed(format!("unsupported attribute value '{text}'"), start))
    }

    /// Index of the `close` delimiter matching the opener at `open`, skipping
    /// quoted strings.
    fn find_closing(&self, open: usize, close: char) -> Result<usize, ParseError> {
        let mut i = open + 1;
        while i < self.chars.len() {
            let c = self.chars[i];
            if is_quote(c) {
                match self.quote_end(i, self.chars.len()) {
                    Some(end) => i = end,
                    None => break,
                }
            } else if c == close {
                return Ok(i);
            }
            i += 1;
        }
        Err(ParseError::UnterminatedAttributes {
            close,
            line: self.line,
            column: open + 1,
        })
    }

    /// Comma separated entries between `start` and `end`, trimmed, empty ones
    /// dropped.
    fn split_entries(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut entries = Vec::new();
        let mut entry_start = start;
        let mut i = start;
        while i < end {
            let c = self.chars[i];
            if is_quote(c) {
                i = self.quote_end(i, end).unwrap_or(end);
            } else if c == ',' {
                entries.push(self.trim_range(entry_start, i));
                entry_start = i + 1;
            }
            i += 1;
        }
        entries.push(self.trim_range(entry_start, end));
        entries.retain(|(s, e)| s < e);
        entries
    }

    fn find_rocket(&self, start: usize, end: usize) -> Option<usize> {
        let mut i = start;
        while i + 1 < end {
            let c = self.chars[i];
            if is_quote(c) {
                i = self.quote_end(i, end)?;
            } else if c == '=' && self.chars[i + 1] == '>' {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Index of the quote closing the one at `open`, honoring backslash escapes.
    fn quote_end(&self, open: usize, end: usize) -> Option<usize> {
        let quote = self.chars[open];
        let mut i = open + 1;
        while i < end {
            match self.chars[i] {
                '\\' => i += 1,
                c if c == quote => return Some(i),
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// The string value when `start..end` is exactly one quoted string.
    fn quoted(&self, start: usize, end: usize) -> Option<String> {
        if !is_quote(self.chars[start]) {
            return None;
        }
        let close = self.quote_end(start, end)?;
        (close + 1 == end).then(|| self.unquote(start, close))
    }

    fn unquote(&self, open: usize, close: usize) -> String {
        let mut value = String::new();
        let mut escaped = false;
        for &c in &self.chars[open + 1..close] {
            if escaped || c != '\\' {
                value.push(c);
                escaped = false;
            } else {
                escaped = true;
            }
        }
        value
    }

    fn trim_range(&self, mut start: usize, mut end: usize) -> (usize, usize) {
        while start < end && self.chars[start].is_whitespace() {
            start += 1;
        }
        while end > start && self.chars[end - 1].is_whitespace() {
            end -= 1;
        }
        (start, end)
    }

    fn skip_spaces_in(&self, mut i: usize, end: usize) -> usize {
        while i < end && self.chars[i].is_whitespace() {
            i += 1;
        }
        i
    }

    fn malformed(&self, message: impl Into<String>, index: usize) -> ParseError {
        ParseError::MalformedAttribute {
            message: message.into(),
            line: self.line,
            column: index + 1,
        }
    }

    // ------------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------------

    fn read_while(&mut self, accept: fn(char) -> bool) -> String {
        let start = self.pos;
        while self.current_char().is_some_and(accept) {
            self.advance();
        }
        self.text(start, self.pos)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn looking_at(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(offset, c)| self.chars.get(self.pos + offset) == Some(&c))
    }

    fn rest(&self) -> String {
        self.text(self.pos, self.chars.len())
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// 1-based column of the cursor.
    fn column(&self) -> usize {
        self.pos + 1
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column())
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':')
}

fn is_selector_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_')
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn is_path(text: &str) -> bool {
    text.split('.').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit()) && text.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Expr, Literal, Path};
    use pretty_assertions::assert_eq;

    fn classify(text: &str) -> Classified {
        let depth = text.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        Classifier::new(text, 1, depth).classify().unwrap()
    }

    fn classify_err(text: &str) -> ParseError {
        Classifier::new(text, 4, 0).classify().unwrap_err()
    }

    fn tag(text: &str) -> TagNode {
        match classify(text) {
            Classified::Node(Node::Tag(tag)) => tag,
            other => panic!("expected tag, got {other:?}"),
        }
    }

    fn text(text: &str) -> TextNode {
        match classify(text) {
            Classified::Node(Node::Text(node)) => node,
            other => panic!("expected text, got {other:?}"),
        }
    }

    fn attr(key: &str, value: &str) -> Attribute {
        Attribute::new(Deferred::literal(key), Deferred::literal(value))
    }

    #[test]
    fn test_plain_text() {
        let node = text("  Hello there");
        assert_eq!(node.content, Deferred::literal("Hello there"));
        assert_eq!(node.depth, 2);
        assert_eq!(node.location, Location::new(1, 3));
        assert!(!node.no_newline);
    }

    #[test]
    fn test_text_no_newline_marker() {
        let node = text("I love <");
        assert_eq!(node.content, Deferred::literal("I love "));
        assert!(node.no_newline);
    }

    #[test]
    fn test_escaped_text() {
        assert_eq!(text("\\%p not a tag").content, Deferred::literal("%p not a tag"));
        assert_eq!(text("\\= x").content, Deferred::literal("= x"));
    }

    #[test]
    fn test_lookup_text() {
        let node = text("= user.name");
        assert_eq!(node.content, Deferred::lookup("user.name"));

        let node = text("=key<");
        assert_eq!(node.content, Deferred::lookup("key"));
        assert!(node.no_newline);
    }

    #[test]
    fn test_simple_tag_with_content() {
        let tag = tag("%p Hello, world");
        assert_eq!(tag.name, "p");
        assert_eq!(tag.content, Some(Deferred::literal("Hello, world")));
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn test_tag_with_lookup_content() {
        let tag = tag("%span= item.title");
        assert_eq!(tag.content, Some(Deferred::lookup("item.title")));
    }

    #[test]
    fn test_id_and_class_shorthand() {
        let tag = tag("%p#main.intro.lead text");
        assert_eq!(
            tag.attributes,
            vec![attr("id", "main"), attr("class", "intro"), attr("class", "lead")]
        );
        assert_eq!(tag.content, Some(Deferred::literal("text")));
    }

    #[test]
    fn test_implicit_div() {
        let tag = tag("#header");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attributes, vec![attr("id", "header")]);

        let tag = self::tag(".a.b");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attributes, vec![attr("class", "a"), attr("class", "b")]);
    }

    #[test]
    fn test_hash_attributes() {
        let tag = tag(r#"%a{:href => "/page", title: "x, y", "data-id" => 7, rel => link.rel}"#);
        assert_eq!(
            tag.attributes,
            vec![
                attr("href", "/page"),
                attr("title", "x, y"),
                attr("data-id", "7"),
                Attribute::new(Deferred::lookup("rel"), Deferred::lookup("link.rel")),
            ]
        );
    }

    #[test]
    fn test_hash_attributes_then_content() {
        let tag = tag(r#"%a{:href => "/another/page"}< Press me"#);
        assert_eq!(tag.attributes, vec![attr("href", "/another/page")]);
        assert!(tag.no_newline);
        assert_eq!(tag.content, Some(Deferred::literal("Press me")));
    }

    #[test]
    fn test_boolean_and_symbol_values() {
        let tag = tag("%input{:checked => true, :disabled => false, :type => :checkbox}");
        assert_eq!(
            tag.attributes,
            vec![
                attr("checked", "true"),
                attr("disabled", "false"),
                attr("type", "checkbox"),
            ]
        );
    }

    #[test]
    fn test_html_style_attributes() {
        let tag = tag(r#"%input(type="checkbox" name=field.name checked)"#);
        assert_eq!(
            tag.attributes,
            vec![
                attr("type", "checkbox"),
                Attribute::new(Deferred::literal("name"), Deferred::lookup("field.name")),
                attr("checked", "true"),
            ]
        );
    }

    #[test]
    fn test_html_style_namespaced_name() {
        let tag = tag(r#"%html(xml:lang="en" lang="en")"#);
        assert_eq!(tag.attributes, vec![attr("xml:lang", "en"), attr("lang", "en")]);
        assert!(matches!(
            classify_err("%a(x!y=\"1\")"),
            ParseError::MalformedAttribute { .. }
        ));
    }

    #[test]
    fn test_quoted_delimiters_inside_attributes() {
        let tag = tag(r#"%a{:title => "a } b"} x"#);
        assert_eq!(tag.attributes, vec![attr("title", "a } b")]);
        assert_eq!(tag.content, Some(Deferred::literal("x")));
    }

    #[test]
    fn test_force_close() {
        let tag = tag("%br/");
        assert!(tag.force_close);
        assert_eq!(tag.content, None);
    }

    #[test]
    fn test_doctype() {
        match classify("!!! Strict") {
            Classified::Node(Node::Doctype(doctype)) => assert_eq!(doctype.specifier, "Strict"),
            other => panic!("expected doctype, got {other:?}"),
        }
        match classify("!!!") {
            Classified::Node(Node::Doctype(doctype)) => assert_eq!(doctype.specifier, ""),
            other => panic!("expected doctype, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_header() {
        match classify("  :javascript") {
            Classified::Filter(header) => {
                assert_eq!(header.name, "javascript");
                assert_eq!(header.inline, None);
                assert_eq!(header.location, Location::new(1, 3));
            }
            other => panic!("expected filter, got {other:?}"),
        }
        match classify(":cdata  inline body ") {
            Classified::Filter(header) => assert_eq!(header.inline.as_deref(), Some("inline body")),
            other => panic!("expected filter, got {other:?}"),
        }
    }

    #[test]
    fn test_code_lines() {
        match classify("- a := \"s\"") {
            Classified::Node(Node::Assignment(node)) => {
                assert_eq!(node.name, "a");
                assert_eq!(node.value, Expr::Literal(Literal::String("s".to_string())));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        match classify("  - for i, v := range list") {
            Classified::Node(Node::Range(node)) => {
                assert_eq!(node.collection, Path::parse("list"));
                assert_eq!(node.depth, 2);
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tag_name() {
        assert_eq!(
            classify_err("% text"),
            ParseError::EmptyTagName { line: 4, column: 1 }
        );
    }

    #[test]
    fn test_empty_class_or_id() {
        assert_eq!(
            classify_err("%p. text"),
            ParseError::EmptyClassOrId { line: 4, column: 3 }
        );
        assert!(matches!(
            classify_err("#{:a => 1}"),
            ParseError::EmptyClassOrId { column: 1, .. }
        ));
    }

    #[test]
    fn test_unterminated_attributes() {
        assert_eq!(
            classify_err("%a{:href => \"x\""),
            ParseError::UnterminatedAttributes {
                close: '}',
                line: 4,
                column: 3
            }
        );
        assert!(matches!(
            classify_err("%a(href=\"x\""),
            ParseError::UnterminatedAttributes { close: ')', .. }
        ));
    }

    #[test]
    fn test_malformed_attributes() {
        assert!(matches!(
            classify_err("%a{:href}"),
            ParseError::MalformedAttribute { .. }
        ));
        assert!(matches!(
            classify_err("%a{:href => }"),
            ParseError::MalformedAttribute { .. }
        ));
        assert!(matches!(
            classify_err("%a{:href => a b}"),
            ParseError::MalformedAttribute { .. }
        ));
    }

    #[test]
    fn test_content_after_self_close() {
        assert_eq!(
            classify_err("%br/ oops"),
            ParseError::SelfClosingContent { line: 4, column: 6 }
        );
    }

    #[test]
    fn test_missing_expression() {
        assert_eq!(
            classify_err("%p=   "),
            ParseError::MissingExpression { line: 4, column: 3 }
        );
        assert!(matches!(classify_err("="), ParseError::MissingExpression { .. }));
    }

    #[test]
    fn test_malformed_filter() {
        assert!(matches!(classify_err(":"), ParseError::MalformedFilter { .. }));
        assert!(matches!(classify_err(":a{b}"), ParseError::MalformedFilter { .. }));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            classify_err("%p}"),
            ParseError::UnexpectedCharacter {
                found: '}',
                line: 4,
                column: 3
            }
        );
    }
}
