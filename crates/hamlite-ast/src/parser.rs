//! Line loop and tree assembly.

use crate::classifier::{Classified, Classifier, FilterHeader};
use crate::filter::FilterRegistry;
use crate::{FilterFn, FilterNode, Location, Node, ParseError, Tree};

/// Parser context for one compile call.
pub struct Parser<'a> {
    filters: &'a FilterRegistry,
}

impl<'a> Parser<'a> {
    pub fn new(filters: &'a FilterRegistry) -> Self {
        Self { filters }
    }

    pub fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        let mut indentation = Indentation::default();
        let mut assembler = Assembler::default();
        let mut capture: Option<Capture> = None;

        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            let is_blank = text.trim().is_empty();

            if let Some(active) = capture.as_mut() {
                if is_blank {
                    active.pending_blanks += 1;
                    continue;
                }
                if leading_whitespace(text) > active.depth {
                    active.push(text);
                    continue;
                }
                if let Some(finished) = capture.take() {
                    assembler.place(Node::Filter(finished.finish()));
                }
            }

            if is_blank {
                continue;
            }

            let depth = indentation.measure(text, line)?;
            match Classifier::new(text, line, depth).classify()? {
                Classified::Node(node) => assembler.place(node),
                Classified::Filter(header) => capture = Some(self.start_capture(header, depth)?),
            }
        }

        if let Some(finished) = capture {
            assembler.place(Node::Filter(finished.finish()));
        }

        Ok(Tree::new(assembler.nodes, indentation.unit))
    }

    fn start_capture(&self, header: FilterHeader, depth: usize) -> Result<Capture, ParseError> {
        let filter = self
            .filters
            .get(&header.name)
            .ok_or_else(|| ParseError::UnknownFilter {
                name: header.name.clone(),
                line: header.location.line,
                column: header.location.column,
            })?;
        Ok(Capture {
            name: header.name,
            filter,
            depth,
            location: header.location,
            inline: header.inline,
            body: Vec::new(),
            pending_blanks: 0,
        })
    }
}

/// Count of leading space/tab characters.
fn leading_whitespace(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn whitespace_name(c: char) -> &'static str {
    if c == '\t' {
        "tab"
    } else {
        "space"
    }
}

/// Tracks the whitespace character used for indentation across the document.
#[derive(Debug, Default)]
struct Indentation {
    space_char: Option<char>,
    /// Leading whitespace of the first indented line.
    unit: Option<String>,
}

impl Indentation {
    /// Returns the line's depth, failing when it mixes spaces and tabs with
    /// what came before.
    fn measure(&mut self, text: &str, line: usize) -> Result<usize, ParseError> {
        let mut depth = 0;
        for c in text.chars().take_while(|c| *c == ' ' || *c == '\t') {
            depth += 1;
            match self.space_char {
                Some(previous) if previous != c => {
                    return Err(ParseError::InconsistentIndentation {
                        from: whitespace_name(previous),
                        to: whitespace_name(c),
                        line,
                        column: depth,
                    });
                }
                Some(_) => {}
                None => self.space_char = Some(c),
            }
        }
        if depth > 0 && self.unit.is_none() {
            self.unit = Some(text.chars().take(depth).collect());
        }
        Ok(depth)
    }
}

/// Raw body of a filter being collected.
struct Capture {
    name: String,
    filter: FilterFn,
    depth: usize,
    location: Location,
    inline: Option<String>,
    body: Vec<String>,
    pending_blanks: usize,
}

impl Capture {
    fn push(&mut self, text: &str) {
        let blanks = std::mem::take(&mut self.pending_blanks);
        self.body.extend(std::iter::repeat(String::new()).take(blanks));
        self.body.push(text.trim_end().to_string());
    }

    /// Strip the indentation shared by every body line and run the filter.
    fn finish(self) -> FilterNode {
        let shared = self
            .body
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| leading_whitespace(line))
            .min()
            .unwrap_or(0);

        let mut body: Vec<String> = self.inline.into_iter().collect();
        body.extend(
            self.body
                .iter()
                .map(|line| line.chars().skip(shared).collect::<String>()),
        );

        FilterNode {
            lines: (self.filter)(&body),
            children: Vec::new(),
            name: self.name,
            depth: self.depth,
            location: self.location,
        }
    }
}

/// Places nodes into the tree from their depth alone.
#[derive(Debug, Default)]
struct Assembler {
    nodes: Vec<Node>,
    /// Path of child indices from the top level to the most recently placed
    /// node, with each node's depth.
    open: Vec<(usize, usize)>,
}

impl Assembler {
    fn place(&mut self, node: Node) {
        let depth = node.depth();
        while self.open.last().is_some_and(|&(_, open)| open >= depth) {
            self.open.pop();
        }

        let mut siblings = &mut self.nodes;
        for &(index, _) in &self.open {
            siblings = siblings[index].children_mut();
        }

        self.open.push((siblings.len(), depth));
        siblings.push(node);
    }
}
