//! Split index files (`ImageSets/Main/<split>.txt`).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Voc2YoloError;

/// Splits converted when none are configured. `test` is optional in
/// practice; a missing index file only skips that split.
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "val", "test"];

/// Ordered image ids of one split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitIndex {
    pub name: String,
    pub ids: Vec<String>,
}

/// Read a split index file.
///
/// Returns `Ok(None)` when the file does not exist. One id per line; blank
/// lines and `#` comments are skipped, and only the first token is kept so
/// per-class files (`<id>  1`) read the same as plain ones.
pub fn read_split_index(path: &Path, name: &str) -> Result<Option<SplitIndex>, Voc2YoloError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Voc2YoloError::Io(err)),
    };

    Ok(Some(parse_split_index(&content, name)))
}

pub(crate) fn parse_split_index(content: &str, name: &str) -> SplitIndex {
    let ids = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(ToOwned::to_owned)
        .collect();

    SplitIndex {
        name: name.to_string(),
        ids,
    }
}
