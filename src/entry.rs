use std::path::{Component, Path, PathBuf};

/// A single directory-walk visitation record.
///
/// Every filtering decision is made on `rel`, the entry's path relative to
/// the scan root, normalized to forward slashes. `path` is kept as the
/// OS-native path for I/O. The scan root itself has an empty `rel`.
///
/// Size, modification time and the rest of the metadata are irrelevant to
/// filtering and are never collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full OS path to the entry.
    pub path: PathBuf,

    /// Root-relative path with `/` separators. Empty for the root.
    pub rel: String,

    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl Entry {
    /// Build an entry for `path`, found while walking `root`.
    pub fn new(path: impl Into<PathBuf>, root: &Path, is_dir: bool) -> Self {
        let path = path.into();
        let rel = relative_slash_path(&path, root);
        Self { path, rel, is_dir }
    }

    /// Build an entry straight from a root-relative path.
    ///
    /// Backslashes are accepted as separators so Windows-style input
    /// normalizes to the same segments.
    pub fn from_rel(rel: &str, is_dir: bool) -> Self {
        let rel = rel
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self {
            path: PathBuf::from(&rel),
            rel,
            is_dir,
        }
    }

    /// The root-relative path split into segments. Empty for the root.
    pub fn segments(&self) -> Vec<&str> {
        if self.rel.is_empty() {
            return Vec::new();
        }
        self.rel.split('/').collect()
    }

    /// The first root-relative segment, if any.
    pub fn first_segment(&self) -> Option<&str> {
        self.rel.split('/').next().filter(|s| !s.is_empty())
    }

    /// The final path segment. Empty for the root.
    pub fn name(&self) -> &str {
        self.rel.rsplit('/').next().unwrap_or_default()
    }
}

/// `path` relative to `root`, joined with `/`.
///
/// Falls back to the whole path when `path` is not under `root`.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_segments() {
        let entry = Entry::new("/project", Path::new("/project"), true);
        assert_eq!(entry.rel, "");
        assert!(entry.segments().is_empty());
        assert_eq!(entry.first_segment(), None);
        assert_eq!(entry.name(), "");
    }

    #[test]
    fn nested_entry_is_slash_relative() {
        let root = Path::new("/project");
        let entry = Entry::new(root.join("cmd").join("app").join("main.go"), root, false);
        assert_eq!(entry.rel, "cmd/app/main.go");
        assert_eq!(entry.segments(), vec!["cmd", "app", "main.go"]);
        assert_eq!(entry.first_segment(), Some("cmd"));
        assert_eq!(entry.name(), "main.go");
    }

    #[test]
    fn from_rel_normalizes_backslashes() {
        let entry = Entry::from_rel("node_modules\\react\\index.js", false);
        assert_eq!(entry.rel, "node_modules/react/index.js");
        assert_eq!(entry.first_segment(), Some("node_modules"));
    }

    #[test]
    fn path_outside_root_is_kept_whole() {
        let rel = relative_slash_path(Path::new("/elsewhere/a.go"), Path::new("/project"));
        assert_eq!(rel, "elsewhere/a.go");
    }
}
