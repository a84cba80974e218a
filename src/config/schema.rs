use crate::rules::{BlockRemover, MarkerSweep, RuleSet, Substitution};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// A TOML rule file: `[meta]` plus an ordered list of `[[rules]]` entries.
///
/// Rules are applied in file order, so priority between overlapping block
/// patterns is expressed by their position in the file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RuleFile {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuleDefinition {
    pub id: String,
    pub action: RuleKind,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleKind {
    /// Delete a multi-line block matching a regex fragment (or an
    /// open/close fragment pair with lazily-matched inner content).
    DeleteBlock {
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        open: Option<String>,
        #[serde(default)]
        close: Option<String>,
    },
    /// Regex replacement with a `${n}` capture-referencing template.
    Replace { pattern: String, template: String },
    /// Exact substring replacement.
    ReplaceLiteral { search: String, replace: String },
    /// Remove an orphaned literal marker comment.
    SweepMarker { marker: String },
}

impl RuleFile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "id",
                });
            }

            match &rule.action {
                RuleKind::DeleteBlock {
                    pattern,
                    open,
                    close,
                } => {
                    let has_pattern = pattern.as_deref().is_some_and(|p| !p.trim().is_empty());
                    let has_pair = open.as_deref().is_some_and(|o| !o.trim().is_empty())
                        && close.as_deref().is_some_and(|c| !c.trim().is_empty());
                    if !has_pattern && !has_pair {
                        issues.push(ValidationIssue::InvalidCombo {
                            rule_id: Some(rule.id.clone()),
                            message: "delete-block requires either pattern or open+close"
                                .to_string(),
                        });
                    }
                    if has_pattern && (open.is_some() || close.is_some()) {
                        issues.push(ValidationIssue::InvalidCombo {
                            rule_id: Some(rule.id.clone()),
                            message: "delete-block takes pattern or open+close, not both"
                                .to_string(),
                        });
                    }
                }
                RuleKind::Replace { pattern, .. } => {
                    if pattern.trim().is_empty() {
                        issues.push(ValidationIssue::MissingField {
                            rule_id: Some(rule.id.clone()),
                            field: "pattern",
                        });
                    }
                }
                RuleKind::ReplaceLiteral { search, .. } => {
                    if search.is_empty() {
                        issues.push(ValidationIssue::MissingField {
                            rule_id: Some(rule.id.clone()),
                            field: "search",
                        });
                    }
                }
                RuleKind::SweepMarker { marker } => {
                    if marker.trim().is_empty() {
                        issues.push(ValidationIssue::MissingField {
                            rule_id: Some(rule.id.clone()),
                            field: "marker",
                        });
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Compile the definitions into an executable [`RuleSet`], in file order.
    ///
    /// Assumes `validate` has passed; an invalid regex in any rule surfaces
    /// as a [`PatternError`] naming the offending rule.
    pub fn compile(&self) -> Result<RuleSet, PatternError> {
        let mut rules = RuleSet::new();

        for rule in &self.rules {
            let bad_pattern = |source| PatternError {
                rule: rule.id.clone(),
                source,
            };

            match &rule.action {
                RuleKind::DeleteBlock {
                    pattern,
                    open,
                    close,
                } => match (pattern, open, close) {
                    (Some(pattern), _, _) => {
                        rules.push(BlockRemover::new(rule.id.as_str(), pattern).map_err(bad_pattern)?);
                    }
                    (None, Some(open), Some(close)) => {
                        rules.push(
                            BlockRemover::delimited(rule.id.as_str(), open, close).map_err(bad_pattern)?,
                        );
                    }
                    // validate() rejects this shape
                    (None, _, _) => continue,
                },
                RuleKind::Replace { pattern, template } => {
                    rules.push(
                        Substitution::pattern(rule.id.as_str(), pattern, template.clone())
                            .map_err(bad_pattern)?,
                    );
                }
                RuleKind::ReplaceLiteral { search, replace } => {
                    rules.push(Substitution::literal(
                        rule.id.as_str(),
                        search.clone(),
                        replace.clone(),
                    ));
                }
                RuleKind::SweepMarker { marker } => {
                    rules.push(MarkerSweep::new(rule.id.as_str(), marker).map_err(bad_pattern)?);
                }
            }
        }

        Ok(rules)
    }
}

#[derive(Error, Debug)]
#[error("rule '{rule}' has an invalid pattern: {source}")]
pub struct PatternError {
    pub rule: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_id: Option<String>,
        field: &'static str,
    },
    InvalidCombo {
        rule_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "rule file contains no rules"),
            ValidationIssue::MissingField { rule_id, field } => match rule_id {
                Some(id) => write!(f, "rule '{id}' missing required field '{field}'"),
                None => write!(f, "rule missing required field '{field}'"),
            },
            ValidationIssue::InvalidCombo { rule_id, message } => match rule_id {
                Some(id) => write!(f, "rule '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid rule configuration: {message}"),
            },
        }
    }
}
