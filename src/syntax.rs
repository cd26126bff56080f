use std::fmt::{Display, Formatter, Result};

/// A recognized directive attribute name.
///
/// The compiler only dispatches clause text to the parsers in this crate
/// for attributes whose local name appears here; anything else is plain
/// markup as far as this crate is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Define,
    Condition,
    Content,
    Replace,
    Repeat,
    Attributes,
    OnError,
    OmitTag,
    Script,
    Switch,
    Case,
}

impl Directive {
    /// Return the [`Directive`] for the given local attribute name, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use tal::Directive;
    ///
    /// assert_eq!(Directive::from_name("repeat"), Some(Directive::Repeat));
    /// assert_eq!(Directive::from_name("style"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let directive = match name {
            "define" => Self::Define,
            "condition" => Self::Condition,
            "content" => Self::Content,
            "replace" => Self::Replace,
            "repeat" => Self::Repeat,
            "attributes" => Self::Attributes,
            "on-error" => Self::OnError,
            "omit-tag" => Self::OmitTag,
            "script" => Self::Script,
            "switch" => Self::Switch,
            "case" => Self::Case,
            _ => return None,
        };

        Some(directive)
    }

    /// Return the local attribute name of this [`Directive`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Define => "define",
            Self::Condition => "condition",
            Self::Content => "content",
            Self::Replace => "replace",
            Self::Repeat => "repeat",
            Self::Attributes => "attributes",
            Self::OnError => "on-error",
            Self::OmitTag => "omit-tag",
            Self::Script => "script",
            Self::Switch => "switch",
            Self::Case => "case",
        }
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.name())
    }
}
