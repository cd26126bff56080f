//! Clause splitting and the directive grammars.
//!
//! A clause is the raw string value of a directive attribute, such as the
//! text bound to `define` or `attributes` in template markup. Clauses are
//! split into semicolon-delimited parts, with a doubled semicolon acting
//! as an escape for a literal one, and each part is then matched against
//! the small grammar of its directive.

use crate::error::{Error, ErrorKind};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// An identifier as it may appear on the left side of a definition.
const NAME: &str = "[a-zA-Z_][-a-zA-Z0-9_]*";

/// Matches one part of a `define` clause: an optional scope keyword, a
/// bare name or parenthesized name list, and an expression to end.
static DEFINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s)\A\s*(?:(global|local)\s+)?({NAME}|\({NAME}(?:,\s*{NAME})*\))\s+(.*)\z"
    ))
    .unwrap()
});

/// Matches a `content`/`replace` clause: an optional substitution kind
/// keyword followed by the expression, which may be empty.
static SUBST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A\s*(?:(text|structure)\s+)?(.*)\z").unwrap());

/// Matches one part of an `attributes` clause: a name, whitespace, and an
/// expression extending to end.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\A\s*(\S+)\s+(\S.*)\z").unwrap());

/// Matches a character-entity reference, decimal, hex or named.
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#?x?(?:\d{1,5}|\w{1,8});").unwrap());

/// The scope under which a `define` binds its names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Visible to the defining element and its children only.
    #[default]
    Local,
    /// Visible for the remainder of the template.
    Global,
}

/// One definition parsed from a `define` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    /// The scope the names are bound in.
    pub scope: Scope,
    /// The names being bound. More than one when the parenthesized
    /// multi-name form was used.
    pub names: Vec<String>,
    /// The expression producing the bound value.
    pub expression: String,
}

/// The kind of output a substitution produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubstitutionKind {
    /// The result is inserted as escaped text.
    #[default]
    Text,
    /// The result is inserted as markup, unescaped.
    Structure,
}

/// A parsed `content` or `replace` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// How the expression result is inserted.
    pub kind: SubstitutionKind,
    /// The expression producing the inserted value. May be empty.
    pub expression: String,
}

/// Split a clause at undoubled semicolons.
///
/// A doubled semicolon escapes a literal one, and the terminating
/// semicolon of a character-entity reference never acts as a delimiter.
/// A trailing bare semicolon produces no empty part. Parts are returned
/// untrimmed; each grammar trims what it accepts.
///
/// # Examples
///
/// ```
/// use tal::split_parts;
///
/// assert_eq!(split_parts("a;b"), ["a", "b"]);
/// assert_eq!(split_parts("a;;b"), ["a;b"]);
/// ```
pub fn split_parts(clause: &str) -> Vec<String> {
    // Double the semicolon that terminates each entity so the entity
    // comes through the escape pass intact.
    let protected = ENTITY_RE.replace_all(clause, "${0};");
    let masked = protected.replace(";;", "\0");

    let mut parts: Vec<String> = masked.split(';').map(|p| p.replace('\0', ";")).collect();

    // A trailing semicolon leaves an empty final part behind.
    if parts.len() > 1 && parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }

    parts
}

/// Parse an `attributes` clause into an ordered name to expression mapping.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`ErrorKind::Grammar`] when a part is not
/// a name followed by an expression, and of kind
/// [`ErrorKind::DuplicateName`] when the same name appears twice.
///
/// # Examples
///
/// ```
/// use tal::parse_attributes;
///
/// let attributes = parse_attributes("class foo; id bar").unwrap();
///
/// assert_eq!(attributes.get("class").unwrap(), "foo");
/// assert_eq!(attributes.get("id").unwrap(), "bar");
/// ```
pub fn parse_attributes(clause: &str) -> Result<IndexMap<String, String>, Error> {
    let mut attributes = IndexMap::new();

    for part in split_parts(clause) {
        let captures = ATTR_RE.captures(&part).ok_or_else(|| {
            Error::build(ErrorKind::Grammar, "bad syntax in attributes")
                .with_clause(clause)
                .with_help("expected an attribute name followed by an expression")
        })?;

        let name = captures[1].to_owned();
        let expression = captures[2].to_owned();

        if attributes.contains_key(&name) {
            return Err(
                Error::build(ErrorKind::DuplicateName, "duplicate attribute name")
                    .with_clause(&*part)
                    .with_help(format!("`{name}` may only be assigned once per clause")),
            );
        }

        attributes.insert(name, expression);
    }

    Ok(attributes)
}

/// Parse a `content` or `replace` clause into a [`Substitution`].
///
/// The kind keyword is optional and defaults to text; the expression may
/// be empty and may span newlines.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`ErrorKind::Grammar`] when the clause
/// cannot be read as a substitution, which the deliberately permissive
/// grammar makes rare.
pub fn parse_substitution(clause: &str) -> Result<Substitution, Error> {
    let captures = SUBST_RE.captures(clause).ok_or_else(|| {
        Error::build(ErrorKind::Grammar, "invalid content substitution syntax").with_clause(clause)
    })?;

    let kind = match captures.get(1).map(|m| m.as_str()) {
        Some("structure") => SubstitutionKind::Structure,
        _ => SubstitutionKind::Text,
    };

    Ok(Substitution {
        kind,
        expression: captures[2].to_owned(),
    })
}

/// Parse a `define` clause into a sequence of [`Define`] instances.
///
/// Define clauses share surface syntax with other directives, so a part
/// that does not match is not an error here. Returns `None` for the whole
/// clause instead, letting the caller try another grammar.
///
/// # Examples
///
/// ```
/// use tal::{parse_defines, Scope};
///
/// let defines = parse_defines("local x path1; global (a, b) path2").unwrap();
///
/// assert_eq!(defines[0].names, ["x"]);
/// assert_eq!(defines[1].scope, Scope::Global);
/// assert_eq!(defines[1].names, ["a", "b"]);
/// ```
pub fn parse_defines(clause: &str) -> Option<Vec<Define>> {
    let mut defines = Vec::new();

    for part in split_parts(clause) {
        let captures = DEFINE_RE.captures(&part)?;

        let scope = match captures.get(1).map(|m| m.as_str()) {
            Some("global") => Scope::Global,
            _ => Scope::Local,
        };

        let name = &captures[2];
        let names = if name.starts_with('(') {
            name.trim_matches(|c| c == '(' || c == ')')
                .split(',')
                .map(|n| n.trim().to_owned())
                .collect()
        } else {
            vec![name.to_owned()]
        };

        defines.push(Define {
            scope,
            names,
            expression: captures[3].to_owned(),
        });
    }

    Some(defines)
}

#[cfg(test)]
mod tests {
    use super::{
        parse_attributes, parse_defines, parse_substitution, split_parts, Scope, SubstitutionKind,
    };
    use crate::error::ErrorKind;

    #[test]
    fn test_split_plain() {
        assert_eq!(split_parts("a;b"), ["a", "b"]);
        assert_eq!(split_parts("a"), ["a"]);
    }

    #[test]
    fn test_split_doubled_semicolon() {
        assert_eq!(split_parts("a;;b"), ["a;b"]);
        assert_eq!(split_parts("a;;b;c"), ["a;b", "c"]);
    }

    #[test]
    fn test_split_trailing_semicolon() {
        assert_eq!(split_parts("a;"), ["a"]);
        assert_eq!(split_parts("a; "), ["a"]);
        // A lone semicolon still yields two (empty) parts minus the
        // dropped trailing one.
        assert_eq!(split_parts(";"), [""]);
    }

    #[test]
    fn test_split_preserves_whitespace() {
        assert_eq!(split_parts(" a ; b "), [" a ", " b "]);
    }

    #[test]
    fn test_split_protects_entities() {
        assert_eq!(split_parts("x &amp; y; z"), ["x &amp; y", " z"]);
        assert_eq!(split_parts("&#160;"), ["&#160;"]);
        assert_eq!(split_parts("&#x00A0; left; right"), ["&#x00A0; left", " right"]);
    }

    #[test]
    fn test_parse_attributes() {
        let attributes = parse_attributes("class foo;id bar").unwrap();

        assert_eq!(
            attributes.iter().collect::<Vec<_>>(),
            [
                (&"class".to_owned(), &"foo".to_owned()),
                (&"id".to_owned(), &"bar".to_owned())
            ]
        );
    }

    #[test]
    fn test_parse_attributes_multiline_expression() {
        let attributes = parse_attributes("title string:one\ntwo").unwrap();
        assert_eq!(attributes.get("title").unwrap(), "string:one\ntwo");
    }

    #[test]
    fn test_parse_attributes_bad_syntax() {
        let error = parse_attributes("class").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Grammar);
    }

    #[test]
    fn test_parse_attributes_duplicate() {
        let error = parse_attributes("class foo;class bar").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn test_parse_substitution() {
        let substitution = parse_substitution("structure my/expr").unwrap();
        assert_eq!(substitution.kind, SubstitutionKind::Structure);
        assert_eq!(substitution.expression, "my/expr");
    }

    #[test]
    fn test_parse_substitution_default_kind() {
        let substitution = parse_substitution("plain/expr").unwrap();
        assert_eq!(substitution.kind, SubstitutionKind::Text);
        assert_eq!(substitution.expression, "plain/expr");
    }

    #[test]
    fn test_parse_substitution_empty() {
        let substitution = parse_substitution("").unwrap();
        assert_eq!(substitution.kind, SubstitutionKind::Text);
        assert_eq!(substitution.expression, "");
    }

    #[test]
    fn test_parse_substitution_keyword_prefix() {
        // "textual" begins with the keyword but is part of the expression.
        let substitution = parse_substitution("textual/expr").unwrap();
        assert_eq!(substitution.kind, SubstitutionKind::Text);
        assert_eq!(substitution.expression, "textual/expr");
    }

    #[test]
    fn test_parse_defines() {
        let defines = parse_defines("local x path1; global (a,b) path2").unwrap();

        assert_eq!(defines.len(), 2);
        assert_eq!(defines[0].scope, Scope::Local);
        assert_eq!(defines[0].names, ["x"]);
        assert_eq!(defines[0].expression, "path1");
        assert_eq!(defines[1].scope, Scope::Global);
        assert_eq!(defines[1].names, ["a", "b"]);
        assert_eq!(defines[1].expression, "path2");
    }

    #[test]
    fn test_parse_defines_default_scope() {
        let defines = parse_defines("x some/path").unwrap();
        assert_eq!(defines[0].scope, Scope::Local);
    }

    #[test]
    fn test_parse_defines_trims_names_once() {
        let defines = parse_defines("(a, b) expr").unwrap();
        assert_eq!(defines[0].names, ["a", "b"]);
    }

    #[test]
    fn test_parse_defines_mismatch() {
        // A bare word cannot be a definition; the whole clause is
        // rejected so another grammar may be tried.
        assert_eq!(parse_defines("justoneword"), None);
        assert_eq!(parse_defines("x ok; justoneword"), None);
    }

    #[test]
    fn test_parse_defines_multiline_expression() {
        let defines = parse_defines("x string:one\ntwo").unwrap();
        assert_eq!(defines[0].expression, "string:one\ntwo");
    }
}
