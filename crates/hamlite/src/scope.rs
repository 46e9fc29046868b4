//! Variable scope for template rendering.

use crate::error::{HamliteError, Result};
use crate::value::Value;
use hamlite_ast::{Deferred, Path};
use serde::Serialize;
use std::collections::HashMap;

/// Flat, mutable mapping from name to value.
///
/// Assignments and loops write into the scope while rendering, so a scope
/// that must stay untouched should be cloned before each render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope from a JSON object
    pub fn from_json(data: serde_json::Value) -> Result<Self> {
        match Value::from_json(data) {
            Value::Map(map) => Ok(map.into_iter().collect()),
            other => Err(HamliteError::TypeError {
                message: format!("Scope data must be an object, got {}", other.type_name()),
            }),
        }
    }

    /// Create a scope from any value serializing to a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        Self::from_json(serde_json::to_value(data)?)
    }

    /// Bind `name`, returning the value it shadowed
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Resolve a dotted path. Missing keys, unknown fields and `Null` values
    /// part way along the path all resolve to `None`.
    pub fn resolve(&self, path: &Path) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut value = self.vars.get(first)?;
        for segment in rest {
            value = value.get(segment)?;
        }
        Some(value)
    }

    /// Resolve a deferred value to content text
    pub fn text(&self, value: &Deferred) -> String {
        match value {
            Deferred::Literal(text) => text.clone(),
            Deferred::Lookup(path) => self.resolve(path).map(Value::to_text).unwrap_or_default(),
        }
    }

    /// Resolve a deferred value to attribute text, where booleans survive
    pub fn attribute_text(&self, value: &Deferred) -> String {
        match value {
            Deferred::Literal(text) => text.clone(),
            Deferred::Lookup(path) => self
                .resolve(path)
                .map(Value::to_attribute_text)
                .unwrap_or_default(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_scope() -> Scope {
        Scope::from_json(json!({
            "name": "Alice",
            "user": {"email": "alice@example.com", "tags": ["a", "b"], "nothing": null},
            "flag": true
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_simple() {
        let scope = create_test_scope();
        assert_eq!(scope.resolve(&Path::parse("name")), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_resolve_path() {
        let scope = create_test_scope();
        assert_eq!(
            scope.resolve(&Path::parse("user.email")),
            Some(&Value::from("alice@example.com"))
        );
        assert_eq!(
            scope.resolve(&Path::parse("user.tags.1")),
            Some(&Value::from("b"))
        );
    }

    #[test]
    fn test_missing_and_null_paths_resolve_to_nothing() {
        let scope = create_test_scope();
        assert_eq!(scope.resolve(&Path::parse("unknown")), None);
        assert_eq!(scope.resolve(&Path::parse("user.unknown.deeper")), None);
        assert_eq!(scope.resolve(&Path::parse("user.nothing.field")), None);
        assert_eq!(scope.resolve(&Path::parse("")), None);
        assert_eq!(scope.text(&Deferred::lookup("name.first")), "");
    }

    #[test]
    fn test_text_and_attribute_text() {
        let scope = create_test_scope();
        assert_eq!(scope.text(&Deferred::literal("plain")), "plain");
        assert_eq!(scope.text(&Deferred::lookup("name")), "Alice");
        assert_eq!(scope.text(&Deferred::lookup("flag")), "");
        assert_eq!(scope.attribute_text(&Deferred::lookup("flag")), "true");
    }

    #[test]
    fn test_records() {
        let mut scope = Scope::new();
        scope.insert(
            "page",
            Value::record([("title", Value::from("Home")), ("views", Value::Int(3))]),
        );
        assert_eq!(scope.text(&Deferred::lookup("page.title")), "Home");
        assert_eq!(scope.text(&Deferred::lookup("page.views")), "3");
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let result = Scope::from_json(json!([1, 2]));
        assert!(matches!(result, Err(HamliteError::TypeError { .. })));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut scope = create_test_scope();
        assert_eq!(scope.insert("name", "Bob"), Some(Value::from("Alice")));
        assert_eq!(scope.remove("name"), Some(Value::from("Bob")));
        assert!(!scope.contains("name"));
    }
}
