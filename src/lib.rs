//! # amalgo
//!
//! Scan a directory tree, keep the files that pass a chain of filters, and
//! concatenate them into one document.
//!
//! The scan is a sequential depth-first walk. Every entry is checked against
//! a [`FilterChain`] built once from configuration: hidden entries, a
//! top-level directory denylist, gitignore rules, and a file extension set.
//! Rejected directories are never descended into. The accepted files
//! come back sorted by their root-relative path, so output is stable across
//! platforms and runs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use amalgo::render::{load_files, Registry, RenderOptions};
//!
//! let result = amalgo::scan("./my-project")
//!     .extensions([".rs", ".toml"])
//!     .ignore_pattern("*.generated.rs")
//!     .run()?;
//!
//! let registry = Registry::with_defaults();
//! let docs = load_files(&result.paths, "./my-project".as_ref());
//! let _bytes = registry
//!     .get("markdown")?
//!     .render(&docs, &RenderOptions::default())?;
//! # Ok::<(), amalgo::AmalgoError>(())
//! ```
//!
//! # Custom Predicates
//!
//! [`FilterChain`] accepts anything implementing [`Predicate`], closures
//! included:
//!
//! ```rust
//! use amalgo::{Entry, FilterChain, HiddenPredicate};
//!
//! let chain = FilterChain::new()
//!     .with(HiddenPredicate)
//!     .with(|e: &Entry| !e.rel.ends_with("_test.go"));
//!
//! assert!(chain.include(&Entry::from_rel("main.go", false)));
//! assert!(!chain.include(&Entry::from_rel("main_test.go", false)));
//! assert!(!chain.include(&Entry::from_rel(".env", false)));
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod pattern;
pub mod render;

mod builder;
mod chain;
mod entry;
mod error;
mod predicates;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ScanBuilder;
pub use chain::{ChainConfig, FilterChain};
pub use engine::{Visit, Walker};
pub use entry::Entry;
pub use error::AmalgoError;
pub use pattern::{Pattern, PatternList, Verdict};
pub use predicates::{
    DirDenylistPredicate, ExtensionPredicate, GitignorePredicate, HiddenPredicate,
};
pub use results::{ScanResult, ScanStats};
pub use traits::Predicate;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ScanBuilder`] rooted at `root`.
///
/// # Example
///
/// ```rust
/// let tmp = tempfile::tempdir().unwrap();
/// std::fs::write(tmp.path().join("main.go"), "package main").unwrap();
/// std::fs::write(tmp.path().join("README.md"), "# readme").unwrap();
///
/// let result = amalgo::scan(tmp.path())
///     .extensions([".go"])
///     .run()
///     .unwrap();
///
/// assert_eq!(result.paths, vec![tmp.path().join("main.go")]);
/// ```
pub fn scan(root: impl Into<std::path::PathBuf>) -> ScanBuilder {
    ScanBuilder::new(root)
}
