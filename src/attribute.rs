//! Merging of static source attributes with dynamic expressions.

use indexmap::IndexMap;
use std::collections::HashSet;

/// The namespace of XML namespace-declaration attributes.
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// A static attribute as supplied by the markup tokenizer, formatting
/// included so it can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,
    /// The attribute value text.
    pub value: String,
    /// The quote character surrounding the value.
    pub quote: String,
    /// The whitespace preceding the name.
    pub space: String,
    /// The equals sign, with any surrounding whitespace.
    pub eq: String,
}

/// An attribute ready for serialization, static text and dynamic
/// expression side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAttribute {
    /// The static value text. None for a dynamic-only attribute.
    pub text: Option<String>,
    /// The quote character surrounding the value.
    pub quote: String,
    /// The whitespace preceding the name.
    pub space: String,
    /// The equals sign, with any surrounding whitespace.
    pub eq: String,
    /// The expression computing the value. None for a static attribute.
    pub expression: Option<String>,
}

/// Combine static attributes with dynamically computed expressions,
/// excluding attributes in dropped namespaces.
///
/// `ns_attributes` is aligned with `attributes` and gives each attribute's
/// namespace and resolved value. An attribute is dropped when its
/// namespace is in `drop_ns`, or when it is a namespace declaration
/// (namespace [`XMLNS_NS`]) whose value names a namespace in `drop_ns`.
/// A dropped attribute stays dropped even when `dyn_attributes` also
/// names it.
///
/// Static attributes come first in source order, then dynamic-only
/// attributes in the order given, with synthesized default formatting.
pub fn prepare_attributes(
    attributes: &[Attribute],
    dyn_attributes: &IndexMap<String, String>,
    ns_attributes: &[(Option<String>, String)],
    drop_ns: &HashSet<String>,
) -> IndexMap<String, PreparedAttribute> {
    let drop: HashSet<&str> = attributes
        .iter()
        .zip(ns_attributes)
        .filter_map(|(attribute, (ns, value))| match ns {
            Some(ns) if drop_ns.contains(ns) || (ns == XMLNS_NS && drop_ns.contains(value)) => {
                Some(attribute.name.as_str())
            }
            _ => None,
        })
        .collect();

    let mut prepared = IndexMap::new();

    for attribute in attributes {
        if drop.contains(attribute.name.as_str()) {
            continue;
        }

        prepared.insert(
            attribute.name.clone(),
            PreparedAttribute {
                text: Some(attribute.value.clone()),
                quote: attribute.quote.clone(),
                space: attribute.space.clone(),
                eq: attribute.eq.clone(),
                expression: None,
            },
        );
    }

    for (name, expression) in dyn_attributes {
        if drop.contains(name.as_str()) {
            continue;
        }

        match prepared.get_mut(name) {
            Some(entry) => entry.expression = Some(expression.clone()),
            None => {
                prepared.insert(
                    name.clone(),
                    PreparedAttribute {
                        text: None,
                        quote: "\"".to_owned(),
                        space: " ".to_owned(),
                        eq: "=".to_owned(),
                        expression: Some(expression.clone()),
                    },
                );
            }
        }
    }

    prepared
}
