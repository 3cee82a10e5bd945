use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmalgoError {
    // Config
    #[error("no valid extensions provided")]
    NoExtensions,

    #[error("invalid extension {0:?}: each extension must look like .rs or .py")]
    InvalidExtension(String),

    #[error("invalid ignore pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("loading gitignore file {}", path.display())]
    Gitignore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan root is not a readable directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("unknown format {name:?} (available formats: {available})")]
    UnknownFormat { name: String, available: String },

    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AmalgoError {
    /// The file or directory the error is about. `None` for configuration
    /// errors that are not tied to a single path.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p)
            | Self::InvalidRoot(p)
            | Self::SymlinkLoop(p)
            | Self::Gitignore { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the scan can continue after this error.
    ///
    /// Recoverable errors (permission denied, symlink loops, IO on a single
    /// entry) are logged and collected while the walk keeps going.
    ///
    /// Everything else is a configuration or output failure and is raised
    /// before any scanning happens, or ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::SymlinkLoop(_) | Self::Io { .. }
        )
    }
}
