use crate::rules::Rule;
use regex::Regex;
use std::borrow::Cow;

/// Token substitution: replaces a fixed literal or a narrowly-parameterized
/// pattern with a corrected form, optionally carrying captured sub-values
/// through via `${n}` template references.
pub enum Substitution {
    Literal {
        name: String,
        search: String,
        replace: String,
    },
    Pattern {
        name: String,
        pattern: Regex,
        template: String,
    },
}

impl Substitution {
    /// Exact substring replacement. Precise by construction: nothing that is
    /// not byte-identical to `search` is touched.
    pub fn literal(
        name: impl Into<String>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Substitution::Literal {
            name: name.into(),
            search: search.into(),
            replace: replace.into(),
        }
    }

    /// Regex replacement with a capture-referencing template (`${1}`, ...).
    pub fn pattern(
        name: impl Into<String>,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Substitution::Pattern {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            template: template.into(),
        })
    }
}

impl Rule for Substitution {
    fn name(&self) -> &str {
        match self {
            Substitution::Literal { name, .. } | Substitution::Pattern { name, .. } => name,
        }
    }

    fn apply(&self, text: &str) -> Option<String> {
        match self {
            Substitution::Literal {
                search, replace, ..
            } => text
                .contains(search.as_str())
                .then(|| text.replace(search, replace)),
            Substitution::Pattern {
                pattern, template, ..
            } => match pattern.replace_all(text, template.as_str()) {
                Cow::Borrowed(_) => None,
                Cow::Owned(out) => Some(out),
            },
        }
    }

    fn summary(&self) -> String {
        match self {
            Substitution::Literal {
                search, replace, ..
            } => format!("replace literal {search:?} with {replace:?}"),
            Substitution::Pattern {
                pattern, template, ..
            } => format!("replace {} with {template:?}", pattern.as_str()),
        }
    }
}
