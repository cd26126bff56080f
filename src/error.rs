use std::fmt::{Display, Formatter, Result};

/// Categorizes an [`Error`] so callers can tell a malformed clause apart
/// from a repeat-runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A clause does not match the grammar of its directive.
    Grammar,
    /// A name is repeated within one clause.
    DuplicateName,
    /// A repeat source cannot be iterated.
    NotIterable,
    /// A loop variable was never registered.
    UnknownName,
    /// A position label was requested before the first iteration step.
    NoPosition,
    /// A repeat variable was advanced from inside a template.
    Immutable,
}

/// Describes an error raised while parsing a clause or serving a repeat
/// lookup, and allows adding the offending clause and a help text.
///
/// # Examples
///
/// ```
/// use tal::{Error, ErrorKind};
///
/// let error = Error::build(ErrorKind::Grammar, "bad syntax in attributes")
///     .with_clause("class")
///     .with_help("expected an attribute name followed by an expression");
///
/// assert_eq!(error.kind(), ErrorKind::Grammar);
/// ```
///
/// When printed with `println!("{}", error)` the [`Error`] above produces
/// this output:
///
/// ```text
/// error: bad syntax in attributes
///   clause: `class`
///   help: expected an attribute name followed by an expression
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    /// The category of the [`Error`].
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// The clause, or clause part, that caused the [`Error`].
    clause: Option<String>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given kind and reason text.
    ///
    /// The remaining fields may be populated with the `with_*` methods.
    pub fn build<T>(kind: ErrorKind, reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind,
            reason: reason.into(),
            clause: None,
            help: None,
        }
    }

    /// Set the clause text, which is the raw markup that the [`Error`]
    /// is related to.
    pub fn with_clause<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.clause = Some(text.into());

        self
    }

    /// Set the help text, which is displayed under the reason.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`] of this [`Error`].
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the clause text associated with this [`Error`], if any.
    #[inline]
    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "error: {}", self.reason)?;
        if let Some(clause) = &self.clause {
            write!(f, "\n  clause: `{clause}`")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_display() {
        let error = Error::build(ErrorKind::Grammar, "bad syntax in attributes")
            .with_clause("class")
            .with_help("expected a name and an expression");

        assert_eq!(
            error.to_string(),
            "error: bad syntax in attributes\n  \
            clause: `class`\n  \
            help: expected a name and an expression"
        );
    }

    #[test]
    fn test_kind() {
        let error = Error::build(ErrorKind::UnknownName, "loop variable `x` is not registered");
        assert_eq!(error.kind(), ErrorKind::UnknownName);
    }
}
