//! Output formats and the `!!!` declaration table.

use serde::Deserialize;

/// Output format: selects doctype declarations and self-closing syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Xhtml,
    Html4,
    Html5,
}

impl Format {
    /// Suffix closing a content-less tag that is autoclosed.
    pub fn self_close(self) -> &'static str {
        match self {
            Format::Xhtml => " />",
            Format::Html4 | Format::Html5 => ">",
        }
    }
}

const XHTML_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">";
const XHTML_11: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">";
const XHTML_BASIC: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML Basic 1.1//EN\" \"http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd\">";
const XHTML_FRAMESET: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Frameset//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd\">";
const XHTML_MOBILE: &str = "<!DOCTYPE html PUBLIC \"-//WAPFORUM//DTD XHTML Mobile 1.2//EN\" \"http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd\">";
const XML_PROLOG: &str = "<?xml version='1.0' encoding='utf-8' ?>";
const HTML5: &str = "<!DOCTYPE html>";
const HTML4_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"http://www.w3.org/TR/html4/loose.dtd\">";
const HTML4_FRAMESET: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Frameset//EN\" \"http://www.w3.org/TR/html4/frameset.dtd\">";
const HTML4_STRICT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">";

/// Look up the declaration for `specifier` (case-insensitive) in `format`.
///
/// `Some("")` means the pair is known but produces no output (the XML
/// prolog outside xhtml); `None` means the pair is not in the table.
pub fn declaration(format: Format, specifier: &str) -> Option<&'static str> {
    let specifier = specifier.trim().to_ascii_lowercase();
    let decl = match (format, specifier.as_str()) {
        (Format::Xhtml, "") => XHTML_TRANSITIONAL,
        (Format::Xhtml, "xml") => XML_PROLOG,
        (Format::Xhtml, "1.1") => XHTML_11,
        (Format::Xhtml, "basic") => XHTML_BASIC,
        (Format::Xhtml, "frameset") => XHTML_FRAMESET,
        (Format::Xhtml, "5") => HTML5,
        (Format::Xhtml, "mobile") => XHTML_MOBILE,
        (Format::Html4, "") => HTML4_TRANSITIONAL,
        (Format::Html4, "frameset") => HTML4_FRAMESET,
        (Format::Html4, "strict") => HTML4_STRICT,
        (Format::Html5, "") => HTML5,
        (Format::Html4 | Format::Html5, "xml") => "",
        _ => return None,
    };
    Some(decl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xhtml_table() {
        assert_eq!(declaration(Format::Xhtml, ""), Some(XHTML_TRANSITIONAL));
        assert_eq!(declaration(Format::Xhtml, "XML"), Some(XML_PROLOG));
        assert_eq!(declaration(Format::Xhtml, "5"), Some("<!DOCTYPE html>"));
        assert_eq!(declaration(Format::Xhtml, "Strict"), None);
    }

    #[test]
    fn test_specifier_is_case_insensitive() {
        assert_eq!(declaration(Format::Html4, "STRICT"), Some(HTML4_STRICT));
        assert_eq!(declaration(Format::Xhtml, "xml"), Some(XML_PROLOG));
    }

    #[test]
    fn test_html_formats() {
        assert_eq!(declaration(Format::Html5, ""), Some("<!DOCTYPE html>"));
        assert_eq!(declaration(Format::Html5, "XML"), Some(""));
        assert_eq!(declaration(Format::Html4, "XML"), Some(""));
        assert_eq!(declaration(Format::Html5, "frameset"), None);
    }

    #[test]
    fn test_self_close() {
        assert_eq!(Format::Xhtml.self_close(), " />");
        assert_eq!(Format::Html5.self_close(), ">");
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let format: Format = serde_json::from_str("\"html5\"").unwrap();
        assert_eq!(format, Format::Html5);
    }
}
