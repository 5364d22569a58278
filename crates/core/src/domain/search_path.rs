// Search-path (PATH) augmentation for child processes

use std::path::PathBuf;

/// Name of the OS search-path variable
#[cfg(windows)]
pub const PATH_VAR: &str = "Path";
#[cfg(not(windows))]
pub const PATH_VAR: &str = "PATH";

#[cfg(windows)]
const LIST_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const LIST_SEPARATOR: &str = ":";

/// Prepend `dirs` to an existing search path. The existing value is kept
/// intact after the new entries; empty entries are skipped.
pub fn augment_search_path(existing: Option<&str>, dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.to_string_lossy().into_owned())
        .filter(|dir| !dir.is_empty())
        .chain(existing.filter(|s| !s.is_empty()).map(str::to_string))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
