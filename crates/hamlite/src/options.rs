//! Rendering options.

use crate::doctype::Format;
use crate::error::Result;
use serde::Deserialize;

/// Options controlling how a compiled template is rendered.
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```rust
/// let options = hamlite::Options::from_json(r#"{"format": "html5"}"#).unwrap();
/// assert_eq!(options.format, hamlite::Format::Html5);
/// assert_eq!(options.indentation, "\t");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub format: Format,
    /// Output indentation unit.
    pub indentation: String,
    /// Autoclose every tag that has neither content nor children.
    pub autoclose: bool,
    /// Tags autoclosed even when `autoclose` is off.
    pub autoclose_tags: Vec<String>,
    /// Quote character around attribute values.
    pub attribute_wrapper: char,
    /// Escape text produced by lookups.
    pub escape_html: bool,
    /// Escape attribute values.
    pub escape_attributes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: Format::Xhtml,
            indentation: "\t".to_string(),
            autoclose: true,
            autoclose_tags: [
                "meta", "img", "link", "br", "hr", "input", "area", "param", "col", "base",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            attribute_wrapper: '"',
            escape_html: false,
            escape_attributes: true,
        }
    }
}

impl Options {
    /// Parse options from a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a content-less, child-less `name` tag closes itself.
    pub fn is_autoclosed(&self, name: &str) -> bool {
        self.autoclose || self.autoclose_tags.iter().any(|tag| tag == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.format, Format::Xhtml);
        assert_eq!(options.indentation, "\t");
        assert!(options.autoclose);
        assert_eq!(options.attribute_wrapper, '"');
        assert!(!options.escape_html);
        assert!(options.escape_attributes);
    }

    #[test]
    fn test_partial_json() {
        let options =
            Options::from_json(r#"{"autoclose": false, "attribute_wrapper": "'"}"#).unwrap();
        assert!(!options.autoclose);
        assert_eq!(options.attribute_wrapper, '\'');
        assert_eq!(options.indentation, "\t");
        assert!(options.is_autoclosed("br"));
        assert!(!options.is_autoclosed("div"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(Options::from_json(r#"{"format": "sgml"}"#).is_err());
    }
}
