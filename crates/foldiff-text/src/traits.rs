use std::fmt;

use foldiff_types::LineRange;
use tokio::sync::watch;

/// Opaque handle to a range tracked by a [`TextModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeHandle(pub u64);

impl fmt::Display for RangeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mutable text document addressed by 1-based line numbers.
///
/// All implementations must satisfy these invariants:
/// - `version()` strictly increases on every content change, and every new
///   version is published on the channel returned by `subscribe_version()`.
/// - A tracked range follows the content it covered when it was created.
///   Once that content is gone entirely, `resolve` returns `None`.
/// - Handles are never reused within one document.
pub trait TextModel: Send + Sync {
    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Current content version.
    fn version(&self) -> u64;

    /// Receiver that observes every version change.
    fn subscribe_version(&self) -> watch::Receiver<u64>;

    /// Snapshot of the current lines, without line terminators.
    fn lines(&self) -> Vec<String>;

    /// Start tracking `range` across future edits.
    fn track_range(&self, range: LineRange) -> RangeHandle;

    /// Current position of a tracked range.
    ///
    /// Returns `None` if the handle is unknown or its content was deleted.
    fn resolve(&self, handle: RangeHandle) -> Option<LineRange>;

    /// Stop tracking a range. Returns `true` if the handle was live.
    fn release(&self, handle: RangeHandle) -> bool;

    /// Release `old` and track `ranges` in its place.
    ///
    /// Returned handles are in the same order as `ranges`.
    fn rebind(&self, old: &[RangeHandle], ranges: &[LineRange]) -> Vec<RangeHandle> {
        for handle in old {
            self.release(*handle);
        }
        ranges.iter().map(|r| self.track_range(*r)).collect()
    }
}
