//! File-system template loader with modification-time caching.

use crate::error::{HamliteError, Result};
use crate::options::Options;
use crate::Template;
use hamlite_ast::FilterRegistry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::debug;

const TEMPLATE_EXTENSION: &str = ".haml";
const HTML_EXTENSION: &str = ".html";
const INDEX_NAME: &str = "index";

struct TemplatePathResolver {
    root: PathBuf,
}

impl TemplatePathResolver {
    fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .map_err(|e| HamliteError::LoadError {
                message: format!("Invalid template root: {e}"),
            })?;
        if !root.is_dir() {
            return Err(HamliteError::LoadError {
                message: format!("{}: not a directory", root.display()),
            });
        }
        Ok(Self { root })
    }

    /// Map an identifier such as `/blog/`, `/about.html` or `post` to a
    /// `.haml` file below the root.
    fn resolve_template_path(&self, identifier: &str) -> PathBuf {
        let mut name = if identifier.starts_with('/') {
            identifier.to_string()
        } else {
            format!("/{identifier}")
        };

        if name.ends_with('/') {
            name.push_str(INDEX_NAME);
        } else if self.join(&name).is_dir() {
            name.push('/');
            name.push_str(INDEX_NAME);
        }

        if let Some(stripped) = name.strip_suffix(HTML_EXTENSION) {
            name = stripped.to_string();
        }
        name.push_str(TEMPLATE_EXTENSION);
        self.join(&name)
    }

    fn join(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in name.split('/').filter(|segment| !segment.is_empty()) {
            path.push(segment);
        }
        path
    }

    fn ensure_within_root(&self, path: &Path) -> Result<PathBuf> {
        let candidate = canonicalize_candidate(path)?;
        if candidate.starts_with(&self.root) {
            return Ok(candidate);
        }

        Err(HamliteError::LoadError {
            message: format!("Path traversal detected: {}", path.display()),
        })
    }
}

fn canonicalize_candidate(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.canonicalize()?);
    }

    let (existing_parent, missing_segments) = split_existing_parent(path);
    let mut resolved = existing_parent.canonicalize()?;
    for segment in missing_segments {
        resolved.push(segment);
    }
    Ok(resolved)
}

fn split_existing_parent(path: &Path) -> (PathBuf, Vec<String>) {
    let mut cursor = path.to_path_buf();
    let mut missing_segments = Vec::new();

    while !cursor.exists() {
        let Some(name) = cursor.file_name().and_then(|s| s.to_str()) else {
            break;
        };
        missing_segments.push(name.to_string());

        let Some(parent) = cursor.parent() else {
            break;
        };

        if parent == cursor {
            break;
        }
        cursor = parent.to_path_buf();
    }

    missing_segments.reverse();
    (cursor, missing_segments)
}

struct CacheEntry {
    modified: SystemTime,
    template: Arc<Template>,
}

/// Loads and compiles templates below a root directory.
///
/// Compiled templates are cached per file and reused until the file's
/// modification time moves past the cached one. The cache sits behind a
/// mutex, so one loader can serve several threads.
pub struct TemplateLoader {
    path_resolver: TemplatePathResolver,
    options: Options,
    filters: FilterRegistry,
    cache: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl TemplateLoader {
    /// Create a loader rooted at `root`, which must be a directory
    pub fn new(root: impl AsRef<Path>, options: Options) -> Result<Self> {
        Self::with_filters(root, options, FilterRegistry::default())
    }

    /// Create a loader whose templates may use the filters in `filters`
    pub fn with_filters(
        root: impl AsRef<Path>,
        options: Options,
        filters: FilterRegistry,
    ) -> Result<Self> {
        Ok(Self {
            path_resolver: TemplatePathResolver::new(root)?,
            options,
            filters,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.path_resolver.root
    }

    /// Load the template for `identifier`, compiling it on first use or when
    /// the file changed since it was cached
    pub fn load(&self, identifier: &str) -> Result<Arc<Template>> {
        let path = self.path_resolver.resolve_template_path(identifier);
        let path = self.path_resolver.ensure_within_root(&path)?;

        if !path.is_file() {
            return Err(HamliteError::TemplateNotFound {
                name: identifier.to_string(),
            });
        }
        let modified = fs::metadata(&path)?.modified()?;

        if let Some(entry) = self.lock_cache().get(&path) {
            if modified <= entry.modified {
                debug!(path = %path.display(), "template cache hit");
                return Ok(Arc::clone(&entry.template));
            }
            debug!(path = %path.display(), "template changed on disk, reloading");
        } else {
            debug!(path = %path.display(), "template cache miss");
        }

        let source = fs::read_to_string(&path)?;
        let template = Arc::new(Template::compile_with(
            &source,
            self.options.clone(),
            &self.filters,
        )?);
        self.lock_cache().insert(
            path,
            CacheEntry {
                modified,
                template: Arc::clone(&template),
            },
        );
        Ok(template)
    }

    /// Drop every cached template
    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir) -> TemplatePathResolver {
        TemplatePathResolver::new(dir.path()).unwrap()
    }

    #[test]
    fn test_identifier_mapping() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        let resolver = resolver(&dir);
        let root = resolver.root.clone();

        assert_eq!(resolver.resolve_template_path("/"), root.join("index.haml"));
        assert_eq!(
            resolver.resolve_template_path("about.html"),
            root.join("about.haml")
        );
        assert_eq!(
            resolver.resolve_template_path("/a/b/post"),
            root.join("a").join("b").join("post.haml")
        );
        assert_eq!(
            resolver.resolve_template_path("/blog"),
            root.join("blog").join("index.haml")
        );
        assert_eq!(
            resolver.resolve_template_path("/blog/"),
            root.join("blog").join("index.haml")
        );
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            TemplateLoader::new(&file, Options::default()),
            Err(HamliteError::LoadError { .. })
        ));
        assert!(TemplateLoader::new(dir.path().join("missing"), Options::default()).is_err());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        fs::create_dir(&root).unwrap();
        fs::write(dir.path().join("secret.haml"), "%p secret").unwrap();

        let loader = TemplateLoader::new(&root, Options::default()).unwrap();
        assert!(matches!(
            loader.load("/../secret"),
            Err(HamliteError::LoadError { .. })
        ));
    }
}
