//! Attribute resolution and rendering.

use crate::html_escape;
use crate::options::Options;
use crate::scope::Scope;
use hamlite_ast::Attribute;

/// An attribute after resolution: its merged value, ready to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttribute {
    pub name: String,
    pub value: String,
}

/// Resolve attribute pairs against `scope`.
///
/// Pairs sharing a resolved name merge into one attribute, space separated,
/// in declaration order; the output keeps the order in which each name first
/// appears. A value of `"false"` contributes nothing and a value of `"true"`
/// contributes the attribute's own name. An attribute whose values were all
/// `"false"` is dropped.
pub fn resolve(attributes: &[Attribute], scope: &Scope) -> Vec<ResolvedAttribute> {
    let mut merged: Vec<(String, Vec<String>, bool)> = Vec::new();

    for attribute in attributes {
        let name = scope.attribute_text(&attribute.key);
        if name.is_empty() {
            continue;
        }
        let value = scope.attribute_text(&attribute.value);

        let index = match merged.iter().position(|(existing, _, _)| *existing == name) {
            Some(index) => index,
            None => {
                merged.push((name, Vec::new(), false));
                merged.len() - 1
            }
        };
        let (name, values, present) = &mut merged[index];
        match value.as_str() {
            "false" => {}
            "true" => {
                values.push(name.clone());
                *present = true;
            }
            _ => {
                values.push(value);
                *present = true;
            }
        }
    }

    merged
        .into_iter()
        .filter(|(_, _, present)| *present)
        .map(|(name, values, _)| ResolvedAttribute {
            name,
            value: values
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Render resolved attributes as ` name="value"` pairs.
pub fn render(attributes: &[Attribute], scope: &Scope, options: &Options) -> String {
    let quote = options.attribute_wrapper;
    let mut output = String::new();
    for attribute in resolve(attributes, scope) {
        output.push(' ');
        output.push_str(&attribute.name);
        output.push('=');
        output.push(quote);
        if options.escape_attributes {
            output.push_str(&html_escape::escape(&attribute.value));
        } else {
            output.push_str(&attribute.value);
        }
        output.push(quote);
    }
    output
}
