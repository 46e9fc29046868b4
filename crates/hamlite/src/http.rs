//! Framework-agnostic HTTP adapter.
//!
//! Maps request paths to templates through a [`TemplateLoader`]:
//!
//! ```text
//! /bla.html              -> {root}/bla.haml
//! /bla/bla/dingdong.html -> {root}/bla/bla/dingdong.haml
//! /bla/bla/              -> {root}/bla/bla/index.haml
//! ```
//!
//! Binding the returned [`Response`] to a concrete server is left to the
//! caller.

use crate::scope::Scope;
use crate::template_loader::TemplateLoader;
use crate::Template;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

const INDEX_PAGE: &str = "/index.html";

/// Outcome of handling one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Rendered page body.
    Html(String),
    /// Permanent redirect to a relative location.
    Redirect { location: String },
    NotFound,
}

struct RenderedPage {
    template: Arc<Template>,
    html: Arc<str>,
}

/// Serves rendered templates for request paths.
pub struct HamlHandler {
    loader: TemplateLoader,
    default_scope: Scope,
    pages: Mutex<HashMap<String, RenderedPage>>,
}

impl HamlHandler {
    pub fn new(loader: TemplateLoader, default_scope: Scope) -> Self {
        Self {
            loader,
            default_scope,
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &TemplateLoader {
        &self.loader
    }

    /// Handle a request for `path` with its raw query string.
    ///
    /// `.../index.html` redirects to the relative `./`, keeping the query.
    pub fn handle(&self, path: &str, query: Option<&str>) -> Response {
        if path.ends_with(INDEX_PAGE) {
            let mut location = "./".to_string();
            if let Some(query) = query.filter(|q| !q.is_empty()) {
                location.push('?');
                location.push_str(query);
            }
            return Response::Redirect { location };
        }

        match self.loader.load(path) {
            Ok(template) => Response::Html(self.render_page(path, template).to_string()),
            Err(error) => {
                debug!(path, %error, "no template for request path");
                Response::NotFound
            }
        }
    }

    /// Rendered output for `path`, reused while the loader keeps returning
    /// the same compiled template.
    fn render_page(&self, path: &str, template: Arc<Template>) -> Arc<str> {
        let mut pages = self
            .pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(page) = pages.get(path) {
            if Arc::ptr_eq(&page.template, &template) {
                return Arc::clone(&page.html);
            }
        }

        let mut scope = self.default_scope.clone();
        let html: Arc<str> = template.render(&mut scope).into();
        pages.insert(
            path.to_string(),
            RenderedPage {
                template,
                html: Arc::clone(&html),
            },
        );
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;
    use std::fs;
    use tempfile::TempDir;

    fn handler(dir: &TempDir) -> HamlHandler {
        let loader = TemplateLoader::new(dir.path(), Options::default()).unwrap();
        let mut scope = Scope::new();
        scope.insert("site", "Example");
        HamlHandler::new(loader, scope)
    }

    #[test]
    fn test_index_html_redirects() {
        let dir = TempDir::new().unwrap();
        let handler = handler(&dir);
        assert_eq!(
            handler.handle("/docs/index.html", Some("a=1")),
            Response::Redirect {
                location: "./?a=1".to_string()
            }
        );
        assert_eq!(
            handler.handle("/index.html", Some("")),
            Response::Redirect {
                location: "./".to_string()
            }
        );
    }

    #[test]
    fn test_renders_with_default_scope() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.haml"), "%h1= site").unwrap();
        let handler = handler(&dir);
        assert_eq!(
            handler.handle("/about.html", None),
            Response::Html("<h1>Example</h1>".to_string())
        );
    }

    #[test]
    fn test_default_scope_is_not_mutated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.haml"), "- site := \"Changed\"\n%p= site").unwrap();
        let handler = handler(&dir);
        assert_eq!(
            handler.handle("/", None),
            Response::Html("<p>Changed</p>".to_string())
        );
        assert_eq!(handler.default_scope.get("site"), Some(&"Example".into()));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let handler = handler(&dir);
        assert_eq!(handler.handle("/nope.html", None), Response::NotFound);
    }
}
