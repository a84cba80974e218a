use glob::glob;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Expand a glob-style pattern into the sorted list of matching files.
///
/// Zero matches is not an error; the result is simply empty. Directory
/// entries that cannot be read (permissions, races) are skipped rather than
/// failing the whole expansion. Only a malformed pattern is an error.
///
/// Matches that are not regular files (directories picked up by a trailing
/// wildcard) are filtered out, since the rewriter can only operate on file
/// text.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>, LocateError> {
    let entries = glob(pattern).map_err(|source| LocateError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();

    // glob yields lexical order per directory; sort the flattened list so
    // reporting order is stable across platforms.
    paths.sort();

    Ok(paths)
}
