use foldiff_types::LineRange;
use serde::Serialize;

/// Lines revealed by one `show_more_*` step.
pub const DEFAULT_REVEAL_STEP: usize = 10;

/// A span of lines that is identical in both documents and may be folded.
///
/// The span has the same length on both sides. `visible_top` lines at its
/// start and `visible_bottom` lines at its end are shown; the lines between
/// them are hidden. Every mutator clamps so that
/// `visible_top + visible_bottom <= line_count` always holds.
///
/// Mutators take `&mut self`; the session only hands out mutable regions
/// inside a transaction, so a batch of changes is observed as one update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnchangedRegion {
    original_start: usize,
    modified_start: usize,
    line_count: usize,
    visible_top: usize,
    visible_bottom: usize,
}

impl UnchangedRegion {
    /// Create a region. Visibility counts are clamped to `line_count`.
    pub fn new(
        original_start: usize,
        modified_start: usize,
        line_count: usize,
        visible_top: usize,
        visible_bottom: usize,
    ) -> Self {
        let mut region = Self {
            original_start,
            modified_start,
            line_count,
            visible_top: 0,
            visible_bottom: 0,
        };
        region.set_state(visible_top, visible_bottom);
        region
    }

    /// A fully folded region.
    pub fn folded(original_start: usize, modified_start: usize, line_count: usize) -> Self {
        Self::new(original_start, modified_start, line_count, 0, 0)
    }

    pub fn original_start(&self) -> usize {
        self.original_start
    }

    pub fn modified_start(&self) -> usize {
        self.modified_start
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn visible_top(&self) -> usize {
        self.visible_top
    }

    pub fn visible_bottom(&self) -> usize {
        self.visible_bottom
    }

    /// Full span on the original side.
    pub fn original_range(&self) -> LineRange {
        LineRange::of_length(self.original_start, self.line_count)
    }

    /// Full span on the modified side.
    pub fn modified_range(&self) -> LineRange {
        LineRange::of_length(self.modified_start, self.line_count)
    }

    /// Number of lines currently folded away.
    pub fn hidden_line_count(&self) -> usize {
        self.line_count - self.visible_top - self.visible_bottom
    }

    /// Folded lines on the original side.
    pub fn hidden_original_range(&self) -> LineRange {
        LineRange::of_length(
            self.original_start + self.visible_top,
            self.hidden_line_count(),
        )
    }

    /// Folded lines on the modified side.
    pub fn hidden_modified_range(&self) -> LineRange {
        LineRange::of_length(
            self.modified_start + self.visible_top,
            self.hidden_line_count(),
        )
    }

    /// `true` once nothing is folded.
    pub fn is_fully_visible(&self) -> bool {
        self.hidden_line_count() == 0
    }

    /// Largest `visible_top` allowed by the current `visible_bottom`.
    pub fn max_visible_top(&self) -> usize {
        self.line_count - self.visible_bottom
    }

    /// Largest `visible_bottom` allowed by the current `visible_top`.
    pub fn max_visible_bottom(&self) -> usize {
        self.line_count - self.visible_top
    }

    /// Reveal up to `count` more lines at the top of the fold.
    pub fn show_more_above(&mut self, count: usize) {
        self.visible_top = self
            .visible_top
            .saturating_add(count)
            .min(self.max_visible_top());
    }

    /// Reveal up to `count` more lines at the bottom of the fold.
    pub fn show_more_below(&mut self, count: usize) {
        self.visible_bottom = self
            .visible_bottom
            .saturating_add(count)
            .min(self.max_visible_bottom());
    }

    /// Reveal every line below what is already shown at the top.
    pub fn show_all(&mut self) {
        self.visible_bottom = self.line_count - self.visible_top;
    }

    /// Fold the whole span again.
    pub fn collapse_all(&mut self) {
        self.visible_top = 0;
        self.visible_bottom = 0;
    }

    /// Set both visibility counts.
    ///
    /// `top` is clamped to `line_count`, then `bottom` to what is left.
    pub fn set_state(&mut self, top: usize, bottom: usize) {
        self.visible_top = top.min(self.line_count);
        self.visible_bottom = bottom.min(self.line_count - self.visible_top);
    }
}
