//! Rewriter engine - reads, transforms, and persists files one at a time
//!
//! Each file is a single linear pass: Read -> Transform -> (Write | Skip) ->
//! Report. Failures are converted into per-file results at this boundary and
//! never abort the batch; re-running the whole batch is the recovery
//! mechanism. Files are overwritten in place with no backup copy, which is an
//! accepted risk of the design (callers operate on version-controlled trees).

use crate::locate::{self, LocateError};
use crate::rules::RuleSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Decode { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file outcome of one rewrite pass.
#[derive(Debug)]
#[must_use = "RewriteResult should be checked for failure"]
pub enum RewriteResult {
    /// No rule matched; the file was not written.
    Unchanged { file: PathBuf },
    /// At least one rule matched and the new text was persisted (or would
    /// be, for a dry-run check). `fired` lists the matching rules in order.
    Modified { file: PathBuf, fired: Vec<String> },
    /// The file could not be read, decoded, or written back.
    Failed { file: PathBuf, error: RewriteError },
}

impl RewriteResult {
    pub fn file(&self) -> &Path {
        match self {
            RewriteResult::Unchanged { file }
            | RewriteResult::Modified { file, .. }
            | RewriteResult::Failed { file, .. } => file,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RewriteResult::Failed { .. })
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, RewriteResult::Modified { .. })
    }
}

impl fmt::Display for RewriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteResult::Unchanged { file } => {
                write!(f, "unchanged: {}", file.display())
            }
            RewriteResult::Modified { file, fired } => {
                write!(f, "modified: {} ({})", file.display(), fired.join(", "))
            }
            RewriteResult::Failed { file, error } => {
                write!(f, "failed: {}: {}", file.display(), error)
            }
        }
    }
}

/// Aggregate results for one batch run, in locator order.
#[derive(Debug, Default)]
#[must_use = "BatchReport should be checked for failures"]
pub struct BatchReport {
    pub results: Vec<RewriteResult>,
}

impl BatchReport {
    pub fn new(results: Vec<RewriteResult>) -> Self {
        Self { results }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn modified(&self) -> usize {
        self.results.iter().filter(|r| r.is_modified()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.total() - self.modified() - self.failed()
    }
}

/// Applies a [`RuleSet`] to files, one at a time.
pub struct Rewriter {
    rules: RuleSet,
}

impl Rewriter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Pure transformation: apply the rule set to `text`.
    ///
    /// Returns `Some(new_text)` if any rule matched, `None` otherwise.
    pub fn rewrite(&self, text: &str) -> Option<String> {
        self.rules.apply(text)
    }

    /// Read, transform, and persist one file.
    ///
    /// The file is only written when the rewritten text differs from the
    /// original; an untouched file keeps its modification time.
    pub fn process(&self, path: &Path) -> RewriteResult {
        self.pass(path, true)
    }

    /// Classify one file without writing anything (dry-run primitive).
    pub fn check(&self, path: &Path) -> RewriteResult {
        self.pass(path, false)
    }

    fn pass(&self, path: &Path, persist: bool) -> RewriteResult {
        let file = path.to_path_buf();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => {
                return RewriteResult::Failed {
                    error: RewriteError::Read {
                        path: file.clone(),
                        source,
                    },
                    file,
                };
            }
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                return RewriteResult::Failed {
                    error: RewriteError::Decode { path: file.clone() },
                    file,
                };
            }
        };

        let (rewritten, fired) = self.rules.apply_traced(&text);
        let new_text = match rewritten {
            None => return RewriteResult::Unchanged { file },
            // A rule can fire yet produce byte-identical text (replacement
            // equal to the match); treat that as unchanged to skip the write.
            Some(new_text) if new_text == text => return RewriteResult::Unchanged { file },
            Some(new_text) => new_text,
        };

        if persist {
            if let Err(source) = atomic_write(path, new_text.as_bytes()) {
                return RewriteResult::Failed {
                    error: RewriteError::Write {
                        path: file.clone(),
                        source,
                    },
                    file,
                };
            }
        }

        RewriteResult::Modified { file, fired }
    }

    /// Process an explicit list of paths, collecting one result per path.
    pub fn process_all(&self, paths: &[PathBuf]) -> BatchReport {
        BatchReport::new(paths.iter().map(|path| self.process(path)).collect())
    }

    /// Expand `pattern` and process every matched file in locator order.
    ///
    /// Only a malformed pattern is an error; every per-file problem surfaces
    /// as a `Failed` result inside the report.
    pub fn run(&self, pattern: &str) -> Result<BatchReport, LocateError> {
        let paths = locate::expand(pattern)?;
        Ok(self.process_all(&paths))
    }

    /// Expand `pattern` and classify every matched file without writing.
    pub fn scan(&self, pattern: &str) -> Result<BatchReport, LocateError> {
        let paths = locate::expand(pattern)?;
        Ok(BatchReport::new(
            paths.iter().map(|path| self.check(path)).collect(),
        ))
    }
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
///
/// Either the full write succeeds or the original file is untouched.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleSet, Substitution};

    fn demo_rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.push(Substitution::literal("fix-old", "OLD", "NEW"));
        rules
    }

    #[test]
    fn process_modifies_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.tsx");
        fs::write(&file, "keep OLD keep").unwrap();

        let rewriter = Rewriter::new(demo_rules());
        let result = rewriter.process(&file);

        assert!(result.is_modified());
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep NEW keep");
    }

    #[test]
    fn unchanged_file_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.tsx");
        fs::write(&file, "nothing to do").unwrap();
        let mtime_before = fs::metadata(&file).unwrap().modified().unwrap();

        let rewriter = Rewriter::new(demo_rules());
        let result = rewriter.process(&file);

        assert!(matches!(result, RewriteResult::Unchanged { .. }));
        let mtime_after = fs::metadata(&file).unwrap().modified().unwrap();
        assert_eq!(mtime_before, mtime_after);
    }

    #[test]
    fn missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let rewriter = Rewriter::new(demo_rules());

        let result = rewriter.process(&dir.path().join("absent.tsx"));

        assert!(matches!(
            result,
            RewriteResult::Failed {
                error: RewriteError::Read { .. },
                ..
            }
        ));
    }

    #[test]
    fn non_utf8_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("binary.tsx");
        fs::write(&file, [0xff, 0xfe, 0x00, 0x4f, 0x4c, 0x44]).unwrap();

        let rewriter = Rewriter::new(demo_rules());
        let result = rewriter.process(&file);

        assert!(matches!(
            result,
            RewriteResult::Failed {
                error: RewriteError::Decode { .. },
                ..
            }
        ));
    }

    #[test]
    fn check_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.tsx");
        fs::write(&file, "keep OLD keep").unwrap();

        let rewriter = Rewriter::new(demo_rules());
        let result = rewriter.check(&file);

        assert!(result.is_modified());
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep OLD keep");
    }

    #[test]
    fn batch_survives_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.tsx");
        let b = dir.path().join("b.tsx");
        fs::write(&a, "has OLD marker").unwrap();
        fs::write(&b, "clean").unwrap();
        let missing = dir.path().join("gone.tsx");

        let rewriter = Rewriter::new(demo_rules());
        let report = rewriter.process_all(&[a, missing, b]);

        assert_eq!(report.total(), 3);
        assert_eq!(report.modified(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert!(matches!(
            report.results[1],
            RewriteResult::Failed {
                error: RewriteError::Read { .. },
                ..
            }
        ));
    }

    #[test]
    fn run_processes_glob_matches_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["alpha", "beta"] {
            let page = dir.path().join(name);
            fs::create_dir(&page).unwrap();
            fs::write(page.join("page.tsx"), "OLD content").unwrap();
        }

        let rewriter = Rewriter::new(demo_rules());
        let pattern = format!("{}/*/page.tsx", dir.path().display());
        let report = rewriter.run(&pattern).unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.modified(), 2);
        assert!(report.results[0].file() < report.results[1].file());
    }

    #[test]
    fn run_with_zero_matches_is_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let rewriter = Rewriter::new(demo_rules());

        let pattern = format!("{}/*/page.tsx", dir.path().display());
        let report = rewriter.run(&pattern).unwrap();

        assert_eq!(report.total(), 0);
        assert_eq!(report.failed(), 0);
    }
}
