use async_trait::async_trait;
use foldiff_text::TextModel;
use foldiff_types::{DiffOptions, DocumentDiff};
use tokio::sync::watch;

use crate::error::DiffResult;

/// Computes line-level diffs between two documents.
///
/// Implementations may be slow. Callers cancel cooperatively by dropping the
/// returned future, so implementations must not rely on running to
/// completion.
#[async_trait]
pub trait DiffProvider: Send + Sync {
    /// Diff `original` against `modified`.
    ///
    /// `options.max_computation_time` is a budget, not a hard limit; a
    /// provider that runs out of time should return its best result with
    /// `quit_early` set.
    async fn compute_diff(
        &self,
        original: &dyn TextModel,
        modified: &dyn TextModel,
        options: &DiffOptions,
    ) -> DiffResult<DocumentDiff>;

    /// Signal that ticks when the provider's own configuration changes in a
    /// way that invalidates earlier results.
    ///
    /// Default implementation returns `None` (never changes).
    fn options_changed(&self) -> Option<watch::Receiver<u64>> {
        None
    }
}
