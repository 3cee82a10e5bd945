use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::chain::FilterChain;
use crate::entry::{relative_slash_path, Entry};
use crate::error::AmalgoError;
use crate::results::{ScanResult, ScanStats};

// ---------------------------------------------------------------------------
// Visit
// ---------------------------------------------------------------------------

/// What the walker does with one visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Accepted. Files are collected, directories are descended into.
    Continue,

    /// Rejected file. Move on to the next sibling.
    Skip,

    /// Rejected directory. Do not descend and do not emit anything below it.
    Prune,
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Sequential depth-first walk of one directory tree.
///
/// Every entry, the root included, is checked against the [`FilterChain`].
/// Rejected directories are never descended into.
/// Errors on individual entries are logged, collected and skipped; they never
/// stop the walk.
///
/// A walker is built per scan and consumed by [`Walker::run`]. The chain is
/// only borrowed, so one chain can serve many scans.
pub struct Walker<'a> {
    root:  &'a Path,
    chain: &'a FilterChain,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, chain: &'a FilterChain) -> Self {
        Self { root, chain }
    }

    /// Decide what to do with one entry.
    pub fn visit(&self, entry: &Entry) -> Visit {
        match (self.chain.include(entry), entry.is_dir) {
            (true, _)      => Visit::Continue,
            (false, true)  => Visit::Prune,
            (false, false) => Visit::Skip,
        }
    }

    /// Walk the tree and return the accepted files, sorted.
    pub fn run(self) -> ScanResult {
        let start = Instant::now();

        let mut paths  = Vec::<PathBuf>::new();
        let mut errors = Vec::<AmalgoError>::new();
        let mut files  = 0usize;
        let mut dirs   = 0usize;
        let mut pruned = 0usize;

        let mut it = WalkDir::new(self.root).follow_links(false).into_iter();

        while let Some(next) = it.next() {
            let dent = match next {
                Ok(d) => d,
                Err(e) => {
                    let err = map_walk_error(e);
                    warn!(error = %err, "skipping unreadable entry");
                    errors.push(err);
                    continue;
                }
            };

            let is_dir = dent.file_type().is_dir();
            if is_dir {
                dirs += 1;
            } else {
                files += 1;
            }

            let entry = Entry::new(dent.into_path(), self.root, is_dir);

            match self.visit(&entry) {
                Visit::Continue => {
                    if !entry.is_dir {
                        paths.push(entry.path);
                    }
                }
                Visit::Skip => {}
                Visit::Prune => {
                    trace!(rel = %entry.rel, "pruned directory");
                    pruned += 1;
                    it.skip_current_dir();
                }
            }
        }

        sort_by_relative(&mut paths, self.root);

        ScanResult {
            paths,
            stats: ScanStats {
                files,
                dirs,
                pruned,
                duration: start.elapsed(),
            },
            errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort paths by their slash-normalized path relative to `root`.
///
/// Plain byte-wise string order, so the result does not depend on the
/// platform or on the order the filesystem returns directory entries in.
pub fn sort_by_relative(paths: &mut [PathBuf], root: &Path) {
    paths.sort_by_cached_key(|p| relative_slash_path(p, root));
}

// ---------------------------------------------------------------------------
// Map walkdir::Error to AmalgoError
// ---------------------------------------------------------------------------

fn map_walk_error(e: walkdir::Error) -> AmalgoError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();

    if e.loop_ancestor().is_some() {
        return AmalgoError::SymlinkLoop(path);
    }

    match e.into_io_error() {
        Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
            AmalgoError::PermissionDenied(path)
        }
        Some(source) => AmalgoError::Io { path, source },
        None => AmalgoError::Io {
            path,
            source: io::Error::new(io::ErrorKind::Other, "walk error"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn sorts_siblings_lexicographically() {
        let root = Path::new("/project");
        let mut paths = ["z.go", "a.go", "m.go", "b.go"]
            .iter()
            .map(|n| root.join(n))
            .collect::<Vec<_>>();

        sort_by_relative(&mut paths, root);

        let names = paths
            .iter()
            .map(|p| relative_slash_path(p, root))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a.go", "b.go", "m.go", "z.go"]);
    }

    #[test]
    fn sorts_on_full_relative_path() {
        let root = Path::new("/project");
        let mut paths = vec![
            root.join("src").join("z.go"),
            root.join("main.go"),
            root.join("cmd").join("root.go"),
            root.join("src").join("a.go"),
        ];

        sort_by_relative(&mut paths, root);

        let names = paths
            .iter()
            .map(|p| relative_slash_path(p, root))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["cmd/root.go", "main.go", "src/a.go", "src/z.go"]);
    }

    #[test]
    fn visit_maps_decisions() {
        let chain = FilterChain::new().with(|e: &Entry| e.rel.ends_with(".go"));
        let walker = Walker::new(Path::new("/project"), &chain);

        assert_eq!(walker.visit(&Entry::from_rel("main.go", false)), Visit::Continue);
        assert_eq!(walker.visit(&Entry::from_rel("main.rs", false)), Visit::Skip);
        assert_eq!(walker.visit(&Entry::from_rel("src", true)), Visit::Prune);
    }

    #[test]
    fn pruned_directories_are_counted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("skip").join("deeper")).unwrap();
        fs::write(root.join("skip").join("deeper").join("a.go"), "").unwrap();
        fs::write(root.join("keep.go"), "").unwrap();

        let chain = FilterChain::new().with(|e: &Entry| e.first_segment() != Some("skip"));
        let result = Walker::new(root, &chain).run();

        assert_eq!(result.paths, vec![root.join("keep.go")]);
        assert_eq!(result.stats.pruned, 1);
        // root + skip; `deeper` is never read
        assert_eq!(result.stats.dirs, 2);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_root_is_collected_not_fatal() {
        let chain = FilterChain::new();
        let result = Walker::new(Path::new("/definitely/not/here"), &chain).run();
        assert!(result.paths.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_recoverable());
    }
}
