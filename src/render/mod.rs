//! Turning a scan result into one document.
//!
//! [`load_files`] reads every scanned file, and a [`Renderer`] picked from a
//! [`Registry`] formats them. The registry is an explicit value built once
//! by the caller and passed where it is needed.

mod markdown;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::entry::relative_slash_path;
use crate::error::AmalgoError;
use crate::predicates::dotted_extension;

pub use markdown::MarkdownRenderer;

// ---------------------------------------------------------------------------
// FileDoc
// ---------------------------------------------------------------------------

/// One loaded file, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDoc {
    /// OS path the file was read from.
    pub path: PathBuf,

    /// Path relative to the scan root, with `/` separators.
    pub rel_path: String,

    /// Raw bytes, or an error placeholder if the read failed.
    pub content: Vec<u8>,

    /// Lowercase extension including the dot, empty if none.
    pub ext: String,
}

/// Read every path, in order.
///
/// A file that cannot be read gets the content
/// `ERROR: could not read file: <reason>` so the batch always completes.
pub fn load_files(paths: &[PathBuf], base: &Path) -> Vec<FileDoc> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read(path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "could not read file");
                format!("ERROR: could not read file: {e}").into_bytes()
            });
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            FileDoc {
                path: path.clone(),
                rel_path: relative_slash_path(path, base),
                content,
                ext: dotted_extension(&name).unwrap_or_default(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Options shared by all renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Heading depth for per-file titles. Clamped to `1..=6`.
    pub heading_level: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { heading_level: 1 }
    }
}

/// Formats loaded files into a single output document.
pub trait Renderer: Send + Sync {
    /// Name used to select this renderer (`--format`).
    fn name(&self) -> &'static str;

    /// Extension of the default output file, with its dot.
    fn file_extension(&self) -> &'static str;

    fn render(&self, files: &[FileDoc], opts: &RenderOptions) -> Result<Vec<u8>, AmalgoError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Renderers by name.
#[derive(Default)]
pub struct Registry {
    renderers: BTreeMap<&'static str, Box<dyn Renderer>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in renderer.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownRenderer);
        registry
    }

    /// Add a renderer, replacing any with the same name.
    pub fn register(&mut self, renderer: impl Renderer + 'static) {
        self.renderers.insert(renderer.name(), Box::new(renderer));
    }

    /// Look a renderer up by name.
    ///
    /// # Errors
    ///
    /// [`AmalgoError::UnknownFormat`] naming the available formats.
    pub fn get(&self, name: &str) -> Result<&dyn Renderer, AmalgoError> {
        self.renderers
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| AmalgoError::UnknownFormat {
                name:      name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.renderers.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.names(), vec!["markdown"]);

        let md = registry.get("markdown").unwrap();
        assert_eq!(md.file_extension(), ".md");

        match registry.get("pdf") {
            Err(AmalgoError::UnknownFormat { name, available }) => {
                assert_eq!(name, "pdf");
                assert_eq!(available, "markdown");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("pdf should not be registered"),
        }
    }

    #[test]
    fn load_substitutes_unreadable_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::write(root.join("main.go"), "package main\n").unwrap();

        let paths = vec![root.join("main.go"), root.join("gone.go")];
        let docs = load_files(&paths, root);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].rel_path, "main.go");
        assert_eq!(docs[0].content, b"package main\n");
        assert_eq!(docs[0].ext, ".go");

        assert_eq!(docs[1].rel_path, "gone.go");
        let text = String::from_utf8(docs[1].content.clone()).unwrap();
        assert!(text.starts_with("ERROR: could not read file:"), "got {text}");
    }
}
