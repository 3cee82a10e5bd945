use crate::entry::Entry;

/// Decides whether a single entry is included in a scan.
///
/// A predicate sees the entry's root-relative path and its directory flag
/// and answers include (`true`) or exclude (`false`). Predicates are built
/// once and only read afterwards, so a chain can be reused across scans.
///
/// Returning `false` for a directory prunes the whole subtree: the walker
/// never descends into it, so none of its children are ever tested.
///
/// # Thread Safety
///
/// `Send + Sync` are required so a built [`FilterChain`](crate::FilterChain)
/// can be shared freely, even though the walk itself is sequential.
///
/// # Example
///
/// ```rust
/// use amalgo::{Entry, Predicate};
///
/// struct MaxDepth(usize);
///
/// impl Predicate for MaxDepth {
///     fn include(&self, entry: &Entry) -> bool {
///         entry.segments().len() <= self.0
///     }
/// }
///
/// assert!(MaxDepth(2).include(&Entry::from_rel("src/lib.rs", false)));
/// assert!(!MaxDepth(2).include(&Entry::from_rel("src/a/b.rs", false)));
/// ```
pub trait Predicate: Send + Sync {
    /// Returns `true` if this entry should be kept.
    fn include(&self, entry: &Entry) -> bool;

    /// Short label used in trace logs when this predicate rejects an entry.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Any `Fn(&Entry) -> bool` closure is a predicate.
impl<F> Predicate for F
where
    F: Fn(&Entry) -> bool + Send + Sync,
{
    fn include(&self, entry: &Entry) -> bool {
        self(entry)
    }
}
