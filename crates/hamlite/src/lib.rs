//! hamlite - an indentation-based markup language that compiles to HTML
//!
//! Templates are compiled once into a tree and rendered any number of times
//! against a [`Scope`] of variables:
//! - `%tag`, `#id` and `.class` lines open elements; nesting follows indentation
//! - `{}` and `()` attribute blocks, `= path` lookups and `<` line joining
//! - `:cdata`, `:css` and `:javascript` filters for raw blocks
//! - `- name := value` assignments and `- for k, v := range path` loops
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//!
//! let html = hamlite::render(
//!     "%p.greeting= name",
//!     json!({"name": "World"}),
//! ).unwrap();
//!
//! assert_eq!(html, "<p class=\"greeting\">World</p>");
//! ```

// Public modules
pub mod attributes;
pub mod doctype;
pub mod error;
pub mod html_escape;
pub mod http;
pub mod options;
pub mod renderer;
pub mod scope;
pub mod template_loader;
pub mod value;

pub use doctype::Format;
pub use error::{HamliteError, Result};
pub use hamlite_ast::{FilterFn, FilterLine, FilterRegistry, Location, ParseError, Tree};
pub use http::{HamlHandler, Response};
pub use options::Options;
pub use renderer::Renderer;
pub use scope::Scope;
pub use template_loader::TemplateLoader;
pub use value::Value;

/// A compiled template: parse once, render many times
#[derive(Debug, Clone)]
pub struct Template {
    tree: Tree,
    options: Options,
}

impl Template {
    /// Compile a template with default options and filters
    ///
    /// # Example
    ///
    /// ```rust
    /// use hamlite::{Scope, Template};
    ///
    /// let tmpl = Template::compile("%ul\n  - for _, item := range items\n    %li= item").unwrap();
    /// let mut scope = Scope::new();
    /// scope.insert("items", vec!["a", "b"]);
    /// assert_eq!(tmpl.render(&mut scope), "<ul>\n\t<li>a</li>\n\t<li>b</li>\n</ul>");
    /// ```
    pub fn compile(source: &str) -> Result<Self> {
        Self::compile_with(source, Options::default(), &FilterRegistry::default())
    }

    /// Compile a template with explicit options and filters
    pub fn compile_with(source: &str, options: Options, filters: &FilterRegistry) -> Result<Self> {
        let tree = hamlite_ast::parse_with_filters(source, filters)?;
        Ok(Self { tree, options })
    }

    /// Render against `scope`. Assignments and loop bindings are written
    /// into `scope`; loops restore the bindings they shadowed.
    pub fn render(&self, scope: &mut Scope) -> String {
        Renderer::new(&self.options).render(&self.tree, scope)
    }

    /// Render against a scope built from a JSON object
    pub fn render_json(&self, data: serde_json::Value) -> Result<String> {
        let mut scope = Scope::from_json(data)?;
        Ok(self.render(&mut scope))
    }

    /// Get a reference to the compiled tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// Convenience function: compile with default options
pub fn compile(source: &str) -> Result<Template> {
    Template::compile(source)
}

/// Convenience function: compile and render in one call
///
/// # Example
///
/// ```rust
/// use serde_json::json;
///
/// let html = hamlite::render(
///     "%input{:type => \"checkbox\", :checked => on}",
///     json!({"on": true}),
/// ).unwrap();
///
/// assert_eq!(html, "<input type=\"checkbox\" checked=\"checked\" />");
/// ```
pub fn render(source: &str, data: serde_json::Value) -> Result<String> {
    Template::compile(source)?.render_json(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_reuse() {
        let tmpl = Template::compile("%span Hello<\n= name").unwrap();

        let result1 = tmpl.render_json(json!({"name": "Alice"})).unwrap();
        assert_eq!(result1, "<span>Hello</span>Alice");

        let result2 = tmpl.render_json(json!({"name": "Bob"})).unwrap();
        assert_eq!(result2, "<span>Hello</span>Bob");
    }

    #[test]
    fn test_literal_templates_ignore_scope() {
        let tmpl = Template::compile("%div\n  %p static").unwrap();
        let a = tmpl.render_json(json!({})).unwrap();
        let b = tmpl.render_json(json!({"p": "x", "static": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_compile_error() {
        let err = compile("%p\n  %a(href=\"x\"").unwrap_err();
        assert!(matches!(
            err,
            HamliteError::ParseError {
                location: Location { line: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_render_requires_object_scope() {
        assert!(matches!(
            render("%p", json!("nope")),
            Err(HamliteError::TypeError { .. })
        ));
    }

    #[test]
    fn test_custom_filter() {
        fn upper(body: &[String]) -> Vec<FilterLine> {
            body.iter()
                .map(|line| FilterLine::new(0, line.to_uppercase()))
                .collect()
        }
        let mut filters = FilterRegistry::default();
        filters.register("upper", upper);
        let tmpl = Template::compile_with("%div\n  :upper\n    shout", Options::default(), &filters)
            .unwrap();
        assert_eq!(tmpl.render(&mut Scope::new()), "<div>\n\tSHOUT\n</div>");
    }
}
