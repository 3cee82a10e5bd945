use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::entry::Entry;
use crate::error::AmalgoError;
use crate::pattern::{PatternList, Verdict};
use crate::traits::Predicate;

// ---------------------------------------------------------------------------
// ExtensionPredicate
// ---------------------------------------------------------------------------

/// Keeps files whose lowercase extension is in the configured set.
///
/// Extensions are stored with their leading dot (`.rs`). The extension of a
/// file is everything from the last `.` of its name, so `.gitignore` has the
/// extension `.gitignore` and `Makefile` has none. Directories always pass so
/// the walk can reach the files inside them. An empty set rejects every file.
#[derive(Debug, Clone)]
pub struct ExtensionPredicate {
    extensions: BTreeSet<String>,
}

impl ExtensionPredicate {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Predicate for ExtensionPredicate {
    fn include(&self, entry: &Entry) -> bool {
        if entry.is_dir {
            return true;
        }
        match dotted_extension(entry.name()) {
            Some(ext) => self.extensions.contains(&ext),
            None      => false,
        }
    }

    fn name(&self) -> &'static str {
        "extension"
    }
}

/// Lowercase extension of a file name, including the dot.
pub fn dotted_extension(name: &str) -> Option<String> {
    name.rfind('.').map(|i| name[i..].to_lowercase())
}

// ---------------------------------------------------------------------------
// HiddenPredicate
// ---------------------------------------------------------------------------

/// Rejects entries whose name starts with `.`, other than `.` and `..`.
///
/// Applies to files and directories at any depth. A hidden directory is
/// pruned along with everything under it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenPredicate;

impl Predicate for HiddenPredicate {
    fn include(&self, entry: &Entry) -> bool {
        !is_hidden_name(entry.name())
    }

    fn name(&self) -> &'static str {
        "hidden"
    }
}

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

// ---------------------------------------------------------------------------
// DirDenylistPredicate
// ---------------------------------------------------------------------------

/// Rejects paths whose first root-relative segment is a denylisted name.
///
/// Only the first segment is inspected, with an exact case-sensitive
/// comparison. `node_modules/react/index.js` is rejected for `node_modules`,
/// while `my_vendor_files/main.go` passes for `vendor`. A denylisted name
/// deeper in the tree (`src/vendor`) is not rejected here.
#[derive(Debug, Clone)]
pub struct DirDenylistPredicate {
    names: BTreeSet<String>,
}

impl DirDenylistPredicate {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for DirDenylistPredicate {
    fn include(&self, entry: &Entry) -> bool {
        match entry.first_segment() {
            Some(first) => !self.names.contains(first),
            None        => true,
        }
    }

    fn name(&self) -> &'static str {
        "dir-denylist"
    }
}

// ---------------------------------------------------------------------------
// GitignorePredicate
// ---------------------------------------------------------------------------

/// Applies gitignore rules from an optional file plus extra patterns.
///
/// File rules come first, extra patterns are appended after them, and the
/// last matching rule decides. With no rules at all every entry passes.
#[derive(Debug, Clone, Default)]
pub struct GitignorePredicate {
    patterns: PatternList,
}

impl GitignorePredicate {
    /// Load rules from `file` (if given and present) and then `extra`.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read, or when any rule is not
    /// a valid glob.
    pub fn new<S: AsRef<str>>(file: Option<&Path>, extra: &[S]) -> Result<Self, AmalgoError> {
        let mut patterns = PatternList::new();
        if let Some(path) = file {
            patterns.extend_from_file(path)?;
        }
        patterns.extend_lines(extra)?;

        debug!(patterns = patterns.len(), "built gitignore predicate");
        Ok(Self { patterns })
    }

    pub fn from_patterns(patterns: PatternList) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternList {
        &self.patterns
    }
}

impl Predicate for GitignorePredicate {
    fn include(&self, entry: &Entry) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns.verdict(&entry.segments(), entry.is_dir) != Verdict::Exclude
    }

    fn name(&self) -> &'static str {
        "gitignore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn file(rel: &str) -> Entry {
        Entry::from_rel(rel, false)
    }

    fn dir(rel: &str) -> Entry {
        Entry::from_rel(rel, true)
    }

    #[test_case(file("main.go")          => true  ; "matching extension go")]
    #[test_case(file("src/lib.rs")       => true  ; "matching extension rs")]
    #[test_case(file("script.py")        => true  ; "matching extension py")]
    #[test_case(file("readme.md")        => false ; "non matching extension")]
    #[test_case(dir("src")               => true  ; "directory always included")]
    #[test_case(dir("node.go")           => true  ; "directory with extension-like name")]
    #[test_case(file("Makefile")         => false ; "no extension")]
    #[test_case(file("MAIN.GO")          => true  ; "uppercase extension")]
    #[test_case(file("test.Go")          => true  ; "mixed case extension")]
    #[test_case(file("test.min.js")      => false ; "multiple dots uses last")]
    #[test_case(file(".gitignore")       => false ; "dotfile extension is whole name")]
    fn extension(entry: Entry) -> bool {
        ExtensionPredicate::new([".go", ".rs", ".py"]).include(&entry)
    }

    #[test]
    fn extension_set_is_lowercased() {
        let pred = ExtensionPredicate::new([".RS"]);
        assert!(pred.include(&file("lib.rs")));
    }

    #[test]
    fn empty_extension_set() {
        let pred = ExtensionPredicate::new(Vec::<String>::new());
        assert!(pred.include(&dir("src")), "empty extensions should still allow directories");
        assert!(!pred.include(&file("main.go")), "empty extensions should exclude all files");
    }

    #[test_case(file("main.go")          => true  ; "regular file")]
    #[test_case(file(".gitignore")       => false ; "hidden file")]
    #[test_case(dir(".git")              => false ; "hidden directory")]
    #[test_case(dir("src")               => true  ; "regular directory")]
    #[test_case(file(".hidden.txt")      => false ; "dot prefixed name")]
    #[test_case(file("src/deep/.config") => false ; "nested hidden file")]
    #[test_case(file("main.test.go")     => true  ; "dot in middle")]
    #[test_case(dir("")                  => true  ; "scan root")]
    fn hidden(entry: Entry) -> bool {
        HiddenPredicate.include(&entry)
    }

    #[test]
    fn dot_and_dotdot_are_not_hidden() {
        assert!(!is_hidden_name("."));
        assert!(!is_hidden_name(".."));
        assert!(is_hidden_name("..."));
    }

    #[test_case(file("main.go")                      => true  ; "file in root")]
    #[test_case(file("cmd/app/start.go")             => true  ; "nested allowed")]
    #[test_case(dir("internal")                      => true  ; "allowed directory")]
    #[test_case(file("my_vendor_files/main.go")      => true  ; "substring is not a match")]
    #[test_case(dir("node_modules")                  => false ; "ignored directory itself")]
    #[test_case(file("node_modules/react/index.js")  => false ; "file inside ignored")]
    #[test_case(dir("vendor/pkg/foo")                => false ; "nested dir inside ignored")]
    #[test_case(file(".git/config")                  => false ; "file in dot directory")]
    #[test_case(file("node_modules\\react\\index.js") => false ; "windows separators")]
    #[test_case(dir("src/vendor")                    => true  ; "deeper name not checked")]
    #[test_case(dir("Vendor")                        => true  ; "case sensitive")]
    fn denylist(entry: Entry) -> bool {
        DirDenylistPredicate::new(["node_modules", "vendor", ".git"]).include(&entry)
    }

    #[test_case(&["*.log"],                  file("debug.log")    => false ; "simple wildcard")]
    #[test_case(&["build/"],                 dir("build")         => false ; "directory pattern")]
    #[test_case(&["build/"],                 file("build")        => true  ; "directory pattern on file")]
    #[test_case(&["*.log"],                  file("main.go")      => true  ; "non matching file")]
    #[test_case(&["**/test/**"],             file("test/file.go") => false ; "glob pattern")]
    #[test_case(&["*.log", "*.tmp", "build/"], file("temp.tmp")   => false ; "multiple patterns")]
    #[test_case(&[""],                       file("file.go")      => true  ; "empty pattern")]
    #[test_case(&["# comment", "*.log"],     file("debug.log")    => false ; "comment pattern")]
    #[test_case(&["*.log", "!important.log"], file("important.log") => true ; "negation re-includes")]
    fn gitignore_extra(patterns: &[&str], entry: Entry) -> bool {
        GitignorePredicate::new(None, patterns).unwrap().include(&entry)
    }

    #[test]
    fn gitignore_without_rules_includes_everything() {
        let pred = GitignorePredicate::new::<&str>(None, &[]).unwrap();
        assert!(pred.patterns().is_empty());
        assert!(pred.include(&file("test.go")));
        assert!(pred.include(&dir("build")));
    }

    #[test]
    fn gitignore_from_file_then_extra() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");
        std::fs::write(&path, "# Test gitignore\n*.log\nbuild/\ntemp/*\n!important.log\n").unwrap();

        let pred = GitignorePredicate::new(Some(&path), &["!keep/", "keep/"]).unwrap();
        assert_eq!(pred.patterns().len(), 6);

        assert!(!pred.include(&file("debug.log")));
        assert!(!pred.include(&dir("build")));
        assert!(!pred.include(&file("temp/scratch.go")));
        assert!(pred.include(&file("important.log")));
        assert!(pred.include(&file("main.go")));
        // Extra patterns come after file rules, so `keep/` wins.
        assert!(!pred.include(&dir("keep")));
    }

    #[test]
    fn gitignore_from_pattern_list() {
        let list = PatternList::from_lines(["target/", "*.bak"]).unwrap();
        let pred = GitignorePredicate::from_patterns(list);

        assert_eq!(pred.patterns().len(), 2);
        assert!(!pred.include(&dir("target")));
        assert!(!pred.include(&file("src/old.bak")));
        assert!(pred.include(&file("src/main.rs")));
    }

    #[test]
    fn gitignore_missing_file_is_not_an_error() {
        let pred = GitignorePredicate::new::<&str>(Some(Path::new("/nonexistent/.gitignore")), &[]).unwrap();
        assert!(pred.include(&file("test.go")));
    }
}
