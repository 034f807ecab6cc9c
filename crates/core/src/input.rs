//! Candidate name list parsing.
//!
//! The input file holds one project name per line. Surrounding whitespace
//! is trimmed and blank lines are skipped; nothing else is normalised and
//! duplicates are kept. A leading UTF-8 byte-order mark is dropped.

use std::path::Path;

use crate::error::CoreError;

/// Split raw file contents into candidate project names.
pub fn parse_candidate_names(contents: &str) -> Vec<String> {
    contents
        .strip_prefix('\u{FEFF}')
        .unwrap_or(contents)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse a candidate name file.
pub fn read_candidate_names(path: &Path) -> Result<Vec<String>, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CoreError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_candidate_names(&contents))
}
