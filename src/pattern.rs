//! Gitignore-style pattern matching.
//!
//! A [`Pattern`] is one gitignore rule. Matching works on the root-relative
//! path split into segments:
//!
//! - A pattern without a `/` is a name pattern. It matches when any segment
//!   of the path matches, so `*.log` hits `debug.log` at any depth and a
//!   pattern naming a directory also covers everything below it.
//! - A pattern with a `/` is anchored at the root and is matched segment by
//!   segment from the start. `*`, `?` and `[...]` work inside one segment,
//!   `**` spans zero or more segments. A match on a leading run of segments
//!   covers the rest of the path, so `temp/*` also excludes `temp/a/b.go`.
//! - A trailing `/` restricts the rule to directories.
//! - A leading `!` turns the rule into a re-include.
//!
//! [`PatternList`] evaluates rules in order and the last matching rule wins.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::error::AmalgoError;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Outcome of evaluating gitignore rules against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No rule matched. Gitignore has no opinion.
    None,

    /// The last matching rule excludes the path.
    Exclude,

    /// The last matching rule is a negation that re-includes the path.
    Include,
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more whole segments.
    AnyDepth,

    /// A glob confined to a single segment.
    Glob(GlobMatcher),
}

/// One compiled gitignore rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw:      String,
    negated:  bool,
    dir_only: bool,
    anchored: bool,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse one gitignore line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. A leading `\`
    /// escapes a literal `#` or `!`. Fails when a segment is not a valid glob.
    pub fn parse(line: &str) -> Result<Option<Self>, AmalgoError> {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return Ok(None);
        }

        let mut body = raw;
        let mut negated = false;
        if let Some(rest) = body.strip_prefix('!') {
            negated = true;
            body = rest;
        } else if body.starts_with("\\#") || body.starts_with("\\!") {
            body = &body[1..];
        }

        let mut dir_only = false;
        if let Some(rest) = body.strip_suffix('/') {
            dir_only = true;
            body = rest;
        }

        let anchored = body.contains('/');
        let segments = body
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| compile_segment(raw, s))
            .collect::<Result<Vec<_>, _>>()?;

        if segments.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            raw: raw.to_string(),
            negated,
            dir_only,
            anchored,
            segments,
        }))
    }

    /// The rule text as written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Whether this rule matches the given path segments.
    ///
    /// Negation is not applied here; see [`Pattern::verdict`].
    pub fn matches(&self, path: &[&str], is_dir: bool) -> bool {
        if path.is_empty() {
            return false;
        }
        if self.anchored {
            self.match_anchored(path, is_dir)
        } else {
            self.match_name(path, is_dir)
        }
    }

    /// `Exclude` or `Include` when the rule matches, `None` otherwise.
    pub fn verdict(&self, path: &[&str], is_dir: bool) -> Verdict {
        match (self.matches(path, is_dir), self.negated) {
            (false, _)    => Verdict::None,
            (true, false) => Verdict::Exclude,
            (true, true)  => Verdict::Include,
        }
    }

    fn match_name(&self, path: &[&str], is_dir: bool) -> bool {
        let Some(Segment::Glob(glob)) = self.segments.first() else {
            // A bare `**` matches everything.
            return !(self.dir_only && !is_dir && path.len() == 1);
        };

        let last = path.len() - 1;
        for (i, name) in path.iter().enumerate() {
            if !glob.is_match(name) {
                continue;
            }
            // Every segment before the last is a directory.
            return !(self.dir_only && !is_dir && i == last);
        }
        false
    }

    fn match_anchored(&self, path: &[&str], is_dir: bool) -> bool {
        let last = self.segments.len() - 1;
        let mut rest = path;
        let mut matched = false;
        let mut traverse = false;

        for (i, segment) in self.segments.iter().enumerate() {
            let glob = match segment {
                Segment::AnyDepth => {
                    if i == last {
                        // Trailing `**` covers whatever is left.
                        matched = true;
                        break;
                    }
                    traverse = true;
                    continue;
                }
                Segment::Glob(glob) => glob,
            };

            if rest.is_empty() {
                return false;
            }

            if traverse {
                traverse = false;
                matched = false;
                while let Some((head, tail)) = rest.split_first() {
                    rest = tail;
                    if glob.is_match(head) {
                        matched = true;
                        break;
                    }
                }
            } else {
                if !glob.is_match(rest[0]) {
                    return false;
                }
                matched = true;
                rest = &rest[1..];
            }
        }

        // A directory-only rule that consumed the whole path must land on a directory.
        if matched && self.dir_only && !is_dir && rest.is_empty() {
            return false;
        }
        matched
    }
}

fn compile_segment(raw: &str, segment: &str) -> Result<Segment, AmalgoError> {
    if segment == "**" {
        return Ok(Segment::AnyDepth);
    }

    // `**` glued to other characters is just a `*`.
    let mut glob = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch == '*' && glob.ends_with('*') {
            continue;
        }
        glob.push(ch);
    }

    let matcher = GlobBuilder::new(&glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| AmalgoError::InvalidPattern {
            pattern: raw.to_string(),
            reason:  e.kind().to_string(),
        })?
        .compile_matcher();

    Ok(Segment::Glob(matcher))
}

// ---------------------------------------------------------------------------
// PatternList
// ---------------------------------------------------------------------------

/// An ordered list of gitignore rules with last-match-wins semantics.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every line, skipping blanks and comments.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, AmalgoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        list.extend_lines(lines)?;
        Ok(list)
    }

    /// Append rules parsed from `lines` after the existing ones.
    pub fn extend_lines<I, S>(&mut self, lines: I) -> Result<(), AmalgoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if let Some(pattern) = Pattern::parse(line.as_ref())? {
                self.patterns.push(pattern);
            }
        }
        Ok(())
    }

    /// Append the rules of a gitignore file.
    ///
    /// A missing file contributes nothing. Any other read failure is fatal.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), AmalgoError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "gitignore file not found, skipping");
                return Ok(());
            }
            Err(source) => {
                return Err(AmalgoError::Gitignore {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let before = self.patterns.len();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| AmalgoError::Gitignore {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(pattern) = Pattern::parse(&line)? {
                self.patterns.push(pattern);
            }
        }

        debug!(
            path = %path.display(),
            patterns = self.patterns.len() - before,
            "loaded gitignore file"
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Evaluate all rules against `path`; the last matching rule decides.
    pub fn verdict(&self, path: &[&str], is_dir: bool) -> Verdict {
        self.patterns
            .iter()
            .rev()
            .map(|p| p.verdict(path, is_dir))
            .find(|v| *v != Verdict::None)
            .unwrap_or(Verdict::None)
    }
}
