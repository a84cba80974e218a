//! tsx-sweep: batch regex rewriter for React/TSX page components
//!
//! A small maintenance tool that expands a glob pattern into a set of page
//! component files, applies an ordered list of rewrite rules to each file's
//! text, and writes the result back in place only when something changed.
//!
//! # Architecture
//!
//! Three responsibilities compose linearly: the [`locate`] module expands a
//! glob pattern into candidate paths, the [`rules`] module holds an ordered
//! [`rules::RuleSet`] of pattern/replacement pairs, and the [`rewrite`]
//! engine reads each file, runs the rule set over the text, and persists the
//! result. Rewriting a file is a pure function of (original text, rule set);
//! no rule consults file identity or external state.
//!
//! # Safety
//!
//! - Files are only written when the rewritten text differs byte-for-byte
//! - Writes are atomic (tempfile + fsync + rename)
//! - Per-file failures are reported as results, never aborting the batch
//! - The shipped rule set is idempotent: a second pass is always a no-op
//!
//! # Example
//!
//! ```no_run
//! use tsx_sweep::{rules::preset, Rewriter};
//!
//! let rewriter = Rewriter::new(preset::page_cleanup());
//! let report = rewriter.run(preset::DEFAULT_PATTERN).unwrap();
//! println!("{} of {} files modified", report.modified(), report.total());
//! ```

pub mod config;
pub mod locate;
pub mod rewrite;
pub mod rules;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, RuleFile};
pub use locate::{expand, LocateError};
pub use rewrite::{BatchReport, RewriteError, RewriteResult, Rewriter};
pub use rules::{BlockRemover, MarkerSweep, Rule, RuleSet, Substitution};
