use crate::rules::Rule;
use regex::Regex;
use std::borrow::Cow;

/// Deletes a multi-line block delimited by an opening marker and a closing
/// token sequence.
///
/// The block body is matched lazily (first closing token wins), which is the
/// deliberate trade-off of this tool: the inputs are semi-structured markup
/// with no machine-parseable boundary, so the rule accepts some imprecision
/// in exchange for not requiring a structural parser. Nesting is handled by
/// making the closing token sequence specific enough (e.g. `</div>\s*</div>`
/// for a card inside a layout wrapper). The rule sits behind the [`Rule`]
/// trait so it could be swapped for a real parser without touching callers.
///
/// The compiled pattern consumes the block's leading newline and indentation
/// so deletion leaves no blank-line artifact behind.
pub struct BlockRemover {
    name: String,
    pattern: Regex,
}

impl BlockRemover {
    /// Build a remover from a regex fragment matching the whole block, from
    /// opening marker through closing token.
    ///
    /// The fragment is compiled in DOTALL mode and anchored to consume the
    /// leading newline/indentation of the block's first line.
    pub fn new(name: impl Into<String>, block: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?s)\n?[ \t]*{block}"))?;
        Ok(Self {
            name: name.into(),
            pattern,
        })
    }

    /// Build a remover from opening and closing regex fragments, matching
    /// any inner content lazily.
    pub fn delimited(
        name: impl Into<String>,
        open: &str,
        close: &str,
    ) -> Result<Self, regex::Error> {
        Self::new(name, &format!("{open}.*?{close}"))
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Rule for BlockRemover {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, text: &str) -> Option<String> {
        match self.pattern.replace_all(text, "") {
            Cow::Borrowed(_) => None,
            Cow::Owned(out) => Some(out),
        }
    }

    fn summary(&self) -> String {
        format!("delete block matching {}", self.pattern.as_str())
    }
}

/// Removes an orphaned marker comment whose block is already gone.
///
/// Block removal can leave a bare marker behind when the marker and its block
/// were separated by content the block pattern does not tolerate. Sweeping
/// the marker afterwards keeps repeated runs converged.
pub struct MarkerSweep {
    name: String,
    pattern: Regex,
}

impl MarkerSweep {
    /// `marker` is a literal string, not a regex.
    pub fn new(name: impl Into<String>, marker: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"\n?[ \t]*{}", regex::escape(marker)))?;
        Ok(Self {
            name: name.into(),
            pattern,
        })
    }
}

impl Rule for MarkerSweep {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, text: &str) -> Option<String> {
        match self.pattern.replace_all(text, "") {
            Cow::Borrowed(_) => None,
            Cow::Owned(out) => Some(out),
        }
    }

    fn summary(&self) -> String {
        format!("sweep orphaned marker {}", self.pattern.as_str())
    }
}
