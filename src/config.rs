//! Normalization of raw configuration tokens.
//!
//! Flags may be repeated and may carry comma-separated lists, so
//! `-e .go,.rs -e py` yields `{.go, .py, .rs}`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::AmalgoError;

/// Directory names denied when the caller does not pick any.
pub const DEFAULT_DENY_DIRS: &[&str] = &[".git", "node_modules", "vendor"];

/// Normalize raw extension tokens into a set of lowercase dotted extensions.
///
/// Each token is trimmed, given a leading dot if it lacks one and lowercased.
/// Duplicates collapse.
///
/// # Errors
///
/// [`AmalgoError::InvalidExtension`] for a token that is only a dot or
/// contains a path separator, [`AmalgoError::NoExtensions`] when nothing
/// usable remains.
pub fn parse_extensions<I, S>(raw: I) -> Result<BTreeSet<String>, AmalgoError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for item in raw {
        for token in split_list(item.as_ref()) {
            set.insert(normalize_extension(token)?);
        }
    }
    if set.is_empty() {
        return Err(AmalgoError::NoExtensions);
    }
    Ok(set)
}

fn normalize_extension(token: &str) -> Result<String, AmalgoError> {
    let ext = if token.starts_with('.') {
        token.to_lowercase()
    } else {
        format!(".{}", token.to_lowercase())
    };
    if ext.len() < 2 || ext.contains(['/', '\\']) {
        return Err(AmalgoError::InvalidExtension(token.to_string()));
    }
    Ok(ext)
}

/// Normalize raw directory names into a denylist. Blank names are dropped.
pub fn parse_deny_dirs<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .flat_map(|item| {
            split_list(item.as_ref())
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Split a comma-separated value, trimming parts and dropping empty ones.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `<base>/.gitignore` if it exists.
pub fn auto_detect_gitignore(base: &Path) -> Option<PathBuf> {
    let path = base.join(".gitignore");
    path.is_file().then_some(path)
}
