//! Named filters for raw `:name` blocks.
//!
//! A filter receives the captured body lines (already stripped of the
//! indentation shared by the whole body) and lays them out as output lines,
//! each tagged with a nesting level relative to the filter node itself.

use std::collections::HashMap;

/// One formatted output line of a filter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLine {
    /// Extra indentation units relative to the filter node.
    pub level: usize,
    pub text: String,
}

impl FilterLine {
    pub fn new(level: usize, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Formats a captured filter body.
pub type FilterFn = fn(&[String]) -> Vec<FilterLine>;

/// Lookup table of filters available while parsing.
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry")
            .field("filters", &names)
            .finish()
    }
}

impl FilterRegistry {
    /// A registry with no filters at all.
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Register (or replace) a filter under `name`.
    pub fn register(&mut self, name: impl Into<String>, filter: FilterFn) {
        self.filters.insert(name.into(), filter);
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("cdata", cdata);
        registry.register("css", css);
        registry.register("javascript", javascript);
        registry
    }
}

fn guarded(open: &str, close: &str, body: &[String], level: usize) -> Vec<FilterLine> {
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(FilterLine::new(level, open));
    lines.extend(body.iter().map(|line| FilterLine::new(level + 1, line.as_str())));
    lines.push(FilterLine::new(level, close));
    lines
}

fn wrapped(open: &str, close: &str, inner: Vec<FilterLine>) -> Vec<FilterLine> {
    let mut lines = Vec::with_capacity(inner.len() + 2);
    lines.push(FilterLine::new(0, open));
    lines.extend(inner);
    lines.push(FilterLine::new(0, close));
    lines
}

fn cdata(body: &[String]) -> Vec<FilterLine> {
    guarded("<![CDATA[", "]]>", body, 0)
}

fn css(body: &[String]) -> Vec<FilterLine> {
    wrapped(
        "<style type=\"text/css\">",
        "</style>",
        guarded("/*<![CDATA[*/", "/*]]>*/", body, 1),
    )
}

fn javascript(body: &[String]) -> Vec<FilterLine> {
    wrapped(
        "<script type=\"text/javascript\">",
        "</script>",
        guarded("//<![CDATA[", "//]]>", body, 1),
    )
}
