//! Line-level diff between two documents.
//!
//! Uses the `similar` crate (Myers diff algorithm) and folds adjacent
//! delete/insert operations into a single change mapping.

use std::time::Instant;

use async_trait::async_trait;
use foldiff_text::TextModel;
use foldiff_types::{DiffOptions, DocumentDiff, LineRange, LineRangeMapping};
use similar::{capture_diff_slices_deadline, Algorithm, DiffOp};
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::provider::DiffProvider;

/// [`DiffProvider`] that runs a Myers line diff on the blocking thread pool.
#[derive(Clone, Debug, Default)]
pub struct LineDiffProvider;

impl LineDiffProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiffProvider for LineDiffProvider {
    async fn compute_diff(
        &self,
        original: &dyn TextModel,
        modified: &dyn TextModel,
        options: &DiffOptions,
    ) -> DiffResult<DocumentDiff> {
        let original = original.lines();
        let modified = modified.lines();
        let options = options.clone();

        tokio::task::spawn_blocking(move || diff_lines(&original, &modified, &options))
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    DiffError::Cancelled
                } else {
                    DiffError::Join(e)
                }
            })
    }
}

/// Compute the changed line ranges between two line lists.
///
/// With `ignore_trim_whitespace` set, lines are compared after trimming
/// leading and trailing whitespace. A non-zero `max_computation_time` is
/// passed to the Myers implementation as a deadline; when it is reached the
/// result is still valid but coarser, and `quit_early` is set.
pub fn diff_lines(original: &[String], modified: &[String], options: &DiffOptions) -> DocumentDiff {
    let key = |line: &String| -> String {
        if options.ignore_trim_whitespace {
            line.trim().to_owned()
        } else {
            line.clone()
        }
    };
    let old_keys: Vec<String> = original.iter().map(key).collect();
    let new_keys: Vec<String> = modified.iter().map(key).collect();

    // Identical content.
    if old_keys == new_keys {
        return DocumentDiff::identical();
    }

    let deadline = if options.is_unbounded() {
        None
    } else {
        Some(Instant::now() + options.max_computation_time)
    };

    let ops = capture_diff_slices_deadline(Algorithm::Myers, &old_keys, &new_keys, deadline);
    let quit_early = deadline.is_some_and(|d| Instant::now() >= d);

    let changes = group_changes(&ops);
    debug!(
        original_lines = original.len(),
        modified_lines = modified.len(),
        changes = changes.len(),
        quit_early,
        "line diff computed"
    );

    DocumentDiff {
        identical: changes.is_empty(),
        changes,
        quit_early,
    }
}

/// Merge runs of non-equal ops into 1-based change mappings.
fn group_changes(ops: &[DiffOp]) -> Vec<LineRangeMapping> {
    let mut changes = Vec::new();
    let mut pending: Option<(std::ops::Range<usize>, std::ops::Range<usize>)> = None;

    for op in ops {
        if let DiffOp::Equal { .. } = op {
            if let Some((old, new)) = pending.take() {
                changes.push(to_mapping(old, new));
            }
            continue;
        }

        let (old, new) = (op.old_range(), op.new_range());
        pending = Some(match pending.take() {
            Some((o, n)) => (o.start..old.end, n.start..new.end),
            None => (old, new),
        });
    }

    if let Some((old, new)) = pending {
        changes.push(to_mapping(old, new));
    }

    changes
}

fn to_mapping(old: std::ops::Range<usize>, new: std::ops::Range<usize>) -> LineRangeMapping {
    LineRangeMapping::new(
        LineRange::new(old.start + 1, old.end + 1),
        LineRange::new(new.start + 1, new.end + 1),
    )
}
