use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::entry::Entry;
use crate::error::AmalgoError;
use crate::predicates::{
    DirDenylistPredicate, ExtensionPredicate, GitignorePredicate, HiddenPredicate,
};
use crate::traits::Predicate;

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// Inputs that decide which predicates a [`FilterChain`] carries.
///
/// `base_dir` is the scan root every relative path is computed against.
/// `gitignore` is an already-resolved file path; auto-detection of the root
/// `.gitignore` happens in the [`ScanBuilder`](crate::ScanBuilder).
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    pub extensions:     BTreeSet<String>,
    pub deny_dirs:      BTreeSet<String>,
    pub include_hidden: bool,
    pub gitignore:      Option<PathBuf>,
    pub patterns:       Vec<String>,
    pub base_dir:       PathBuf,
}

// ---------------------------------------------------------------------------
// FilterChain
// ---------------------------------------------------------------------------

/// An ordered AND of predicates.
///
/// An entry is included only if every predicate includes it. Evaluation
/// stops at the first rejection. An empty chain includes everything.
#[derive(Default)]
pub struct FilterChain {
    predicates: Vec<Box<dyn Predicate>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain for a scan.
    ///
    /// Predicates are added in a fixed order, each only when its
    /// configuration is non-trivial:
    ///
    /// 1. hidden, unless hidden entries are included
    /// 2. directory denylist, if any names are denied
    /// 3. gitignore, if a file or extra patterns are given
    /// 4. extension, if any extensions are configured
    ///
    /// # Errors
    ///
    /// Fails when the gitignore file cannot be read or a pattern is invalid.
    pub fn build(cfg: &ChainConfig) -> Result<Self, AmalgoError> {
        let mut chain = Self::new();

        if !cfg.include_hidden {
            chain.push(HiddenPredicate);
        }

        if !cfg.deny_dirs.is_empty() {
            chain.push(DirDenylistPredicate::new(cfg.deny_dirs.iter().cloned()));
        }

        if cfg.gitignore.is_some() || !cfg.patterns.is_empty() {
            chain.push(GitignorePredicate::new(
                cfg.gitignore.as_deref(),
                &cfg.patterns,
            )?);
        }

        if !cfg.extensions.is_empty() {
            chain.push(ExtensionPredicate::new(&cfg.extensions));
        }

        debug!(predicates = ?chain.names(), "built filter chain");
        Ok(chain)
    }

    /// Append a predicate to the end of the chain.
    pub fn push(&mut self, predicate: impl Predicate + 'static) {
        self.predicates.push(Box::new(predicate));
    }

    /// Builder-style [`push`](FilterChain::push).
    pub fn with(mut self, predicate: impl Predicate + 'static) -> Self {
        self.push(predicate);
        self
    }

    /// Whether every predicate includes `entry`.
    pub fn include(&self, entry: &Entry) -> bool {
        for predicate in &self.predicates {
            if !predicate.include(entry) {
                trace!(rel = %entry.rel, by = predicate.name(), "rejected");
                return false;
            }
        }
        true
    }

    /// Predicate labels, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("predicates", &self.names())
            .finish()
    }
}
