use foldiff_types::LineRangeMapping;
use tracing::trace;

use crate::region::UnchangedRegion;

/// Lines kept visible next to a change.
pub const MIN_CONTEXT: usize = 3;

/// Smallest fold worth creating.
pub const MIN_HIDDEN_LINE_COUNT: usize = 3;

/// Derive foldable regions from an ordered change list.
///
/// Each unchanged span between, before, or after the changes is trimmed by
/// [`MIN_CONTEXT`] on every side that borders a change:
///
/// - a span starting at line 1 keeps its whole top and loses context only at
///   its end;
/// - a span reaching the end of the original document loses context only at
///   its start;
/// - any other span loses context at both ends.
///
/// Spans too short to hide at least [`MIN_HIDDEN_LINE_COUNT`] lines after
/// trimming produce no region. New regions are fully folded.
pub fn from_diffs(
    changes: &[LineRangeMapping],
    original_line_count: usize,
    modified_line_count: usize,
) -> Vec<UnchangedRegion> {
    let spans = LineRangeMapping::inverse(changes, original_line_count, modified_line_count);
    let mut regions = Vec::with_capacity(spans.len());

    for span in spans {
        let mut original_start = span.original.start;
        let mut modified_start = span.modified.start;
        let mut len = span.original.len();

        if original_start == 1 && len > MIN_CONTEXT + MIN_HIDDEN_LINE_COUNT {
            len -= MIN_CONTEXT;
        } else if original_start + len == original_line_count + 1
            && len > MIN_CONTEXT + MIN_HIDDEN_LINE_COUNT
        {
            original_start += MIN_CONTEXT;
            modified_start += MIN_CONTEXT;
            len -= MIN_CONTEXT;
        } else if len > MIN_CONTEXT * 2 + MIN_HIDDEN_LINE_COUNT {
            original_start += MIN_CONTEXT;
            modified_start += MIN_CONTEXT;
            len -= MIN_CONTEXT * 2;
        } else {
            trace!(span = %span.original, "unchanged span too short to fold");
            continue;
        }

        regions.push(UnchangedRegion::folded(original_start, modified_start, len));
    }

    regions
}
