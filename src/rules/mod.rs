//! Rewrite rules - ordered, stateless text transformations
//!
//! Every rule is polymorphic over one capability: apply to text, returning
//! the rewritten text when anything matched. Rules never fail; an unmatched
//! rule is a no-op, not an error. A [`RuleSet`] applies its rules in a fixed
//! priority order, so a block deleted by an earlier rule leaves nothing for a
//! later rule to match.

pub mod block;
pub mod preset;
pub mod subst;

pub use block::{BlockRemover, MarkerSweep};
pub use subst::Substitution;

/// A single rewrite rule: a pure transformation over file text.
///
/// `apply` returns `Some(new_text)` only when the rule changed something;
/// `None` means the input is untouched, letting callers skip allocation and
/// file writes on the common no-match path.
pub trait Rule: Send + Sync {
    /// Short identifier used in reports.
    fn name(&self) -> &str;

    /// Apply the rule to `text`, returning the rewritten text if it matched.
    fn apply(&self, text: &str) -> Option<String>;

    /// One-line human description for rule listings.
    fn summary(&self) -> String {
        self.name().to_string()
    }
}

/// An ordered list of rules applied in sequence to one file's text.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn push_boxed(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Append all of `other`'s rules after this set's own.
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Apply every rule in order to the evolving text.
    ///
    /// Returns `Some(new_text)` if any rule matched, `None` otherwise.
    pub fn apply(&self, text: &str) -> Option<String> {
        self.apply_traced(text).0
    }

    /// Like [`RuleSet::apply`], also reporting which rules fired, in order.
    pub fn apply_traced(&self, text: &str) -> (Option<String>, Vec<String>) {
        let mut current: Option<String> = None;
        let mut fired = Vec::new();

        for rule in &self.rules {
            let input = current.as_deref().unwrap_or(text);
            if let Some(next) = rule.apply(input) {
                fired.push(rule.name().to_string());
                current = Some(next);
            }
        }

        (current, fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Rule for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn apply(&self, text: &str) -> Option<String> {
            let upper = text.to_uppercase();
            (upper != text).then_some(upper)
        }
    }

    struct StripBang;

    impl Rule for StripBang {
        fn name(&self) -> &str {
            "strip-bang"
        }

        fn apply(&self, text: &str) -> Option<String> {
            text.contains('!').then(|| text.replace('!', ""))
        }
    }

    #[test]
    fn rules_apply_in_order() {
        let mut rules = RuleSet::new();
        rules.push(Upper);
        rules.push(StripBang);

        let (out, fired) = rules.apply_traced("hello!");
        assert_eq!(out.as_deref(), Some("HELLO"));
        assert_eq!(fired, vec!["upper", "strip-bang"]);
    }

    #[test]
    fn no_match_returns_none() {
        let mut rules = RuleSet::new();
        rules.push(StripBang);

        assert_eq!(rules.apply("CLEAN"), None);
    }

    #[test]
    fn empty_rule_set_is_noop() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert_eq!(rules.apply("anything"), None);
    }
}
