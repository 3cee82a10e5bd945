use std::path::PathBuf;
use std::time::Duration;

use crate::error::AmalgoError;

/// The output of a completed scan.
///
/// `paths` holds accepted files only, never directories, sorted by their
/// slash-normalized path relative to the scan root. An empty `paths` is a
/// valid outcome, not an error.
#[derive(Debug)]
pub struct ScanResult {
    /// Accepted file paths, OS-native, sorted by root-relative path.
    pub paths: Vec<PathBuf>,

    /// Walk statistics.
    pub stats: ScanStats,

    /// Non-fatal errors hit during the walk (permission denied, symlink
    /// loops, unreadable entries). Each one cost a single skipped entry.
    pub errors: Vec<AmalgoError>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Statistics for a completed walk.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Non-directory entries visited (accepted or not).
    pub files: usize,

    /// Directories visited, the root included.
    pub dirs: usize,

    /// Directories rejected by the chain and not descended into.
    pub pruned: usize,

    /// Wall-clock time spent walking and sorting.
    pub duration: Duration,
}
