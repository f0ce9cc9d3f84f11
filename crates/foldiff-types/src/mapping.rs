use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::line_range::LineRange;

/// Pairs a line range in the original document with a line range in the
/// modified document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRangeMapping {
    /// Lines on the original side.
    pub original: LineRange,
    /// Lines on the modified side.
    pub modified: LineRange,
}

impl LineRangeMapping {
    /// Create a mapping from its two sides.
    pub const fn new(original: LineRange, modified: LineRange) -> Self {
        Self { original, modified }
    }

    /// Returns `true` if the mapping is a pure insertion (nothing on the
    /// original side).
    pub fn is_insertion(&self) -> bool {
        self.original.is_empty() && !self.modified.is_empty()
    }

    /// Returns `true` if the mapping is a pure deletion (nothing on the
    /// modified side).
    pub fn is_deletion(&self) -> bool {
        self.modified.is_empty() && !self.original.is_empty()
    }

    /// Compute the complement of an ordered change list.
    ///
    /// The result covers every line of both documents that is not part of a
    /// change: the gap before the first change, the gaps between changes, and
    /// the gap after the last change. Gaps whose modified side is empty are
    /// omitted.
    pub fn inverse(
        changes: &[LineRangeMapping],
        original_line_count: usize,
        modified_line_count: usize,
    ) -> Vec<LineRangeMapping> {
        let mut result = Vec::with_capacity(changes.len() + 1);
        let mut last_original_end = 1;
        let mut last_modified_end = 1;

        for change in changes {
            let gap = LineRangeMapping::new(
                LineRange::new(last_original_end, change.original.start.max(last_original_end)),
                LineRange::new(last_modified_end, change.modified.start.max(last_modified_end)),
            );
            if !gap.modified.is_empty() {
                result.push(gap);
            }
            last_original_end = change.original.end_exclusive;
            last_modified_end = change.modified.end_exclusive;
        }

        let tail = LineRangeMapping::new(
            LineRange::new(last_original_end, (original_line_count + 1).max(last_original_end)),
            LineRange::new(last_modified_end, (modified_line_count + 1).max(last_modified_end)),
        );
        if !tail.modified.is_empty() {
            result.push(tail);
        }

        result
    }
}

/// The result of diffing two documents.
///
/// Changes are ordered by position and never overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDiff {
    /// Changed line ranges, in document order.
    pub changes: Vec<LineRangeMapping>,
    /// `true` if both documents are equal under the diff options.
    pub identical: bool,
    /// `true` if the provider ran out of its time budget and returned a
    /// coarser result.
    pub quit_early: bool,
}

impl DocumentDiff {
    /// A diff reporting two identical documents.
    pub fn identical() -> Self {
        Self {
            changes: Vec::new(),
            identical: true,
            quit_early: false,
        }
    }

    /// A diff with the given changes.
    pub fn from_changes(changes: Vec<LineRangeMapping>) -> Self {
        let identical = changes.is_empty();
        Self {
            changes,
            identical,
            quit_early: false,
        }
    }

    /// Check that changes are ordered, non-overlapping, and lie inside both
    /// documents.
    pub fn validate(
        &self,
        original_line_count: usize,
        modified_line_count: usize,
    ) -> Result<(), TypeError> {
        let mut prev: Option<&LineRangeMapping> = None;
        for (index, change) in self.changes.iter().enumerate() {
            for range in [change.original, change.modified] {
                LineRange::try_new(range.start, range.end_exclusive)?;
            }
            if change.original.end_exclusive > original_line_count + 1 {
                return Err(TypeError::OutOfBounds {
                    index,
                    range: change.original,
                    line_count: original_line_count,
                });
            }
            if change.modified.end_exclusive > modified_line_count + 1 {
                return Err(TypeError::OutOfBounds {
                    index,
                    range: change.modified,
                    line_count: modified_line_count,
                });
            }
            if let Some(prev) = prev {
                if change.original.start < prev.original.end_exclusive {
                    return Err(TypeError::UnorderedChange {
                        index,
                        range: change.original,
                    });
                }
                if change.modified.start < prev.modified.end_exclusive {
                    return Err(TypeError::UnorderedChange {
                        index,
                        range: change.modified,
                    });
                }
            }
            prev = Some(change);
        }
        Ok(())
    }
}
