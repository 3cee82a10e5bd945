use std::path::PathBuf;

use tracing::{debug, info};

use crate::chain::{ChainConfig, FilterChain};
use crate::config::{auto_detect_gitignore, parse_deny_dirs, parse_extensions, DEFAULT_DENY_DIRS};
use crate::engine::Walker;
use crate::error::AmalgoError;
use crate::results::ScanResult;

// ---------------------------------------------------------------------------
// ScanBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a scan.
///
/// Created via [`amalgo::scan()`](crate::scan). Configure with chained
/// builder methods, then call [`run()`](ScanBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let result = amalgo::scan("./my-project")
///     .extensions([".rs", ".toml"])
///     .deny_dirs(["target", ".git"])
///     .ignore_pattern("*.generated.rs")
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct ScanBuilder {
    root:               PathBuf,
    extensions:         Vec<String>,
    deny_dirs:          Vec<String>,
    include_hidden:     bool,
    gitignore:          Option<PathBuf>,
    use_root_gitignore: bool,
    patterns:           Vec<String>,
}

impl ScanBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:               root.into(),
            extensions:         Vec::new(),
            deny_dirs:          DEFAULT_DENY_DIRS.iter().map(|s| s.to_string()).collect(),
            include_hidden:     false,
            gitignore:          None,
            use_root_gitignore: true,
            patterns:           Vec::new(),
        }
    }

    // ── Extensions ────────────────────────────────────────────────────────

    /// File extensions to keep. Required.
    ///
    /// Tokens are normalized: `rs`, `.RS` and ` .rs ` all mean `.rs`, and a
    /// token may hold a comma-separated list. Replaces any earlier call.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    // ── Directory denylist ────────────────────────────────────────────────

    /// Top-level directory names to skip entirely.
    ///
    /// Defaults to `.git`, `node_modules` and `vendor`. Only the first
    /// segment of a root-relative path is compared, so `src/vendor` is not
    /// affected by a `vendor` entry. Pass an empty list to deny nothing.
    pub fn deny_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_dirs = names.into_iter().map(Into::into).collect();
        self
    }

    // ── Hidden entries ────────────────────────────────────────────────────

    /// Keep files and directories whose names start with `.`.
    ///
    /// Disabled by default: hidden directories are pruned with their contents.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    // ── Gitignore ─────────────────────────────────────────────────────────

    /// Read gitignore rules from this file.
    ///
    /// A missing file contributes no rules. Takes precedence over
    /// [`use_root_gitignore`](ScanBuilder::use_root_gitignore).
    pub fn gitignore(mut self, path: impl Into<PathBuf>) -> Self {
        self.gitignore = Some(path.into());
        self
    }

    /// Use `<root>/.gitignore` when present and no explicit file is set.
    ///
    /// Enabled by default.
    pub fn use_root_gitignore(mut self, yes: bool) -> Self {
        self.use_root_gitignore = yes;
        self
    }

    /// Add one gitignore-style pattern, evaluated after the file rules.
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Add several gitignore-style patterns, in order.
    pub fn ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Resolve this configuration into a [`ChainConfig`].
    ///
    /// # Errors
    ///
    /// Returns `Err` when no valid extension is configured or a token is
    /// malformed.
    pub fn chain_config(&self) -> Result<ChainConfig, AmalgoError> {
        let extensions = parse_extensions(&self.extensions)?;

        let gitignore = match &self.gitignore {
            Some(path) => Some(path.clone()),
            None if self.use_root_gitignore => {
                let found = auto_detect_gitignore(&self.root);
                if let Some(path) = &found {
                    info!(path = %path.display(), "Using .gitignore");
                }
                found
            }
            None => None,
        };

        Ok(ChainConfig {
            extensions,
            deny_dirs: parse_deny_dirs(&self.deny_dirs),
            include_hidden: self.include_hidden,
            gitignore,
            patterns: self.patterns.clone(),
            base_dir: self.root.clone(),
        })
    }

    /// Execute the scan and return the sorted file list.
    ///
    /// Blocks until the walk completes.
    ///
    /// # Errors
    ///
    /// Returns `Err` for fatal configuration errors (no extensions, malformed
    /// extension, invalid pattern, unreadable gitignore file, missing root)
    /// before anything is walked. Non-fatal errors during traversal are
    /// collected into [`ScanResult::errors`].
    pub fn run(self) -> Result<ScanResult, AmalgoError> {
        let cfg = self.chain_config()?;

        if !cfg.base_dir.is_dir() {
            return Err(AmalgoError::InvalidRoot(cfg.base_dir));
        }

        let chain = FilterChain::build(&cfg)?;
        let result = Walker::new(&cfg.base_dir, &chain).run();

        debug!(
            root = %cfg.base_dir.display(),
            files = result.paths.len(),
            visited = result.stats.files + result.stats.dirs,
            pruned = result.stats.pruned,
            errors = result.errors.len(),
            "scan complete"
        );
        Ok(result)
    }
}
