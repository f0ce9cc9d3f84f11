use foldiff_types::LineRange;
use tracing::trace;

use crate::region::UnchangedRegion;

/// A region from the previous batch, with its ranges translated into current
/// document coordinates.
///
/// A side is `None` when its tracked range could no longer be resolved, for
/// example because the lines it covered were deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviousRegion {
    pub visible_top: usize,
    pub visible_bottom: usize,
    pub original: Option<LineRange>,
    pub modified: Option<LineRange>,
}

impl PreviousRegion {
    /// Pair a previous region's visibility with its re-resolved ranges.
    pub fn resolved(
        region: &UnchangedRegion,
        original: Option<LineRange>,
        modified: Option<LineRange>,
    ) -> Self {
        Self {
            visible_top: region.visible_top(),
            visible_bottom: region.visible_bottom(),
            original,
            modified,
        }
    }

    /// `true` if both resolved ranges strictly intersect `region`'s ranges.
    fn overlaps(&self, region: &UnchangedRegion) -> bool {
        match (self.original, self.modified) {
            (Some(original), Some(modified)) => {
                region.original_range().intersects_strict(&original)
                    && region.modified_range().intersects_strict(&modified)
            }
            _ => false,
        }
    }
}

/// Copy fold state from `previous` onto `new` by range overlap.
///
/// For each new region, `previous` is scanned in order and the first entry
/// that overlaps on both sides wins; later overlapping entries are ignored.
/// Copied counts are clamped to the new region's size. Unmatched regions
/// keep their current state. Returns the number of regions that matched.
pub fn transfer_state(new: &mut [UnchangedRegion], previous: &[PreviousRegion]) -> usize {
    let mut matched = 0;
    for region in new.iter_mut() {
        if let Some(prev) = previous.iter().find(|prev| prev.overlaps(region)) {
            region.set_state(prev.visible_top, prev.visible_bottom);
            matched += 1;
            trace!(
                original = %region.original_range(),
                top = region.visible_top(),
                bottom = region.visible_bottom(),
                "fold state carried forward"
            );
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prev(top: usize, bottom: usize, o: (usize, usize), m: (usize, usize)) -> PreviousRegion {
        PreviousRegion {
            visible_top: top,
            visible_bottom: bottom,
            original: Some(LineRange::new(o.0, o.1)),
            modified: Some(LineRange::new(m.0, m.1)),
        }
    }

    #[test]
    fn shifted_region_inherits_state() {
        // Old region at original 10..=40 with five lines shown on top; an edit
        // above moved everything down by two lines.
        let old = UnchangedRegion::new(10, 10, 31, 5, 0);
        let resolved = PreviousRegion::resolved(
            &old,
            Some(old.original_range().delta(2)),
            Some(old.modified_range().delta(2)),
        );

        let mut new = vec![UnchangedRegion::folded(12, 12, 31)];
        let matched = transfer_state(&mut new, &[resolved]);

        assert_eq!(matched, 1);
        assert_eq!(new[0].visible_top(), 5);
        assert_eq!(new[0].visible_bottom(), 0);
    }

    #[test]
    fn first_match_wins() {
        let previous = vec![prev(2, 0, (1, 20), (1, 20)), prev(7, 7, (15, 40), (15, 40))];
        let mut new = vec![UnchangedRegion::folded(10, 10, 20)];
        transfer_state(&mut new, &previous);
        assert_eq!((new[0].visible_top(), new[0].visible_bottom()), (2, 0));
    }

    #[test]
    fn both_sides_must_overlap() {
        let previous = vec![prev(4, 4, (10, 20), (50, 60))];
        let mut new = vec![UnchangedRegion::folded(10, 10, 10)];
        assert_eq!(transfer_state(&mut new, &previous), 0);
        assert_eq!(new[0].hidden_line_count(), 10);
    }

    #[test]
    fn touching_ranges_do_not_match() {
        let previous = vec![prev(4, 4, (1, 10), (1, 10))];
        let mut new = vec![UnchangedRegion::folded(10, 10, 10)];
        assert_eq!(transfer_state(&mut new, &previous), 0);
    }

    #[test]
    fn unresolved_previous_region_is_skipped() {
        let mut lost = prev(9, 9, (10, 30), (10, 30));
        lost.original = None;
        let kept = prev(1, 2, (12, 28), (12, 28));

        let mut new = vec![UnchangedRegion::folded(10, 10, 20)];
        assert_eq!(transfer_state(&mut new, &[lost, kept]), 1);
        assert_eq!((new[0].visible_top(), new[0].visible_bottom()), (1, 2));
    }

    #[test]
    fn copied_state_is_clamped() {
        let previous = vec![prev(30, 30, (1, 100), (1, 100))];
        let mut new = vec![UnchangedRegion::folded(20, 20, 8)];
        transfer_state(&mut new, &previous);
        assert_eq!((new[0].visible_top(), new[0].visible_bottom()), (8, 0));
    }

    #[test]
    fn one_previous_region_can_feed_several_new_ones() {
        let previous = vec![prev(3, 1, (1, 100), (1, 100))];
        let mut new = vec![
            UnchangedRegion::folded(5, 5, 10),
            UnchangedRegion::folded(50, 50, 10),
        ];
        assert_eq!(transfer_state(&mut new, &previous), 2);
        assert!(new.iter().all(|r| r.visible_top() == 3 && r.visible_bottom() == 1));
    }
}
