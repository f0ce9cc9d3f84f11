use std::sync::MutexGuard;

use foldiff_regions::{PreviousRegion, UnchangedRegion};
use foldiff_text::{RangeHandle, TextModel};
use foldiff_types::{DocumentDiff, LineRange};

/// The current unchanged regions plus one tracked range per region in each
/// document.
///
/// The tracked ranges exist so the next recomputation can find where the
/// previous regions moved after concurrent edits. Handles are index-aligned
/// with `regions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionSet {
    regions: Vec<UnchangedRegion>,
    original_handles: Vec<RangeHandle>,
    modified_handles: Vec<RangeHandle>,
}

impl RegionSet {
    pub fn regions(&self) -> &[UnchangedRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Previous-batch view of this set: visibility state paired with each
    /// region's current position in both documents.
    pub fn resolve_previous(
        &self,
        original: &dyn TextModel,
        modified: &dyn TextModel,
    ) -> Vec<PreviousRegion> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, region)| {
                PreviousRegion::resolved(
                    region,
                    self.original_handles.get(i).and_then(|h| original.resolve(*h)),
                    self.modified_handles.get(i).and_then(|h| modified.resolve(*h)),
                )
            })
            .collect()
    }

    /// Build the successor set: release this set's handles and track the new
    /// regions' ranges.
    pub(crate) fn rebind(
        &mut self,
        regions: Vec<UnchangedRegion>,
        original: &dyn TextModel,
        modified: &dyn TextModel,
    ) -> RegionSet {
        let original_ranges: Vec<LineRange> = regions.iter().map(|r| r.original_range()).collect();
        let modified_ranges: Vec<LineRange> = regions.iter().map(|r| r.modified_range()).collect();
        let original_handles = original.rebind(&std::mem::take(&mut self.original_handles), &original_ranges);
        let modified_handles = modified.rebind(&std::mem::take(&mut self.modified_handles), &modified_ranges);
        RegionSet {
            regions,
            original_handles,
            modified_handles,
        }
    }

    /// Release every tracked range.
    pub(crate) fn release(&mut self, original: &dyn TextModel, modified: &dyn TextModel) {
        for handle in self.original_handles.drain(..) {
            original.release(handle);
        }
        for handle in self.modified_handles.drain(..) {
            modified.release(handle);
        }
    }
}

/// Published state of a diff session.
///
/// The three parts only ever change together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// `false` while a recomputation is pending or in flight.
    pub is_up_to_date: bool,
    /// Last published diff.
    pub diff: Option<DocumentDiff>,
    /// Regions derived from `diff`, with the user's fold state applied.
    pub region_set: RegionSet,
}

impl SessionState {
    pub fn regions(&self) -> &[UnchangedRegion] {
        self.region_set.regions()
    }
}

/// Exclusive, atomic access to a session's state.
///
/// Obtained from [`DiffSession::transaction`](crate::DiffSession::transaction).
/// Observers see either none or all of the changes made through one
/// transaction, and are notified once when it ends.
pub struct Transaction<'a> {
    state: MutexGuard<'a, SessionState>,
    changed: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(state: MutexGuard<'a, SessionState>) -> Self {
        Self {
            state,
            changed: false,
        }
    }

    pub(crate) fn changed(&self) -> bool {
        self.changed
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn regions(&self) -> &[UnchangedRegion] {
        self.state.region_set.regions()
    }

    /// Mutable access to the regions; marks the transaction as changed.
    pub fn regions_mut(&mut self) -> &mut [UnchangedRegion] {
        self.changed = true;
        &mut self.state.region_set.regions
    }

    /// Fully unfold the region whose hidden original range contains `line`.
    ///
    /// Returns `false` (and changes nothing) if no region hides that line.
    pub fn reveal_line_in_original(&mut self, line: usize) -> bool {
        self.reveal(|r| r.hidden_original_range().contains(line))
    }

    /// Fully unfold the region whose hidden modified range contains `line`.
    ///
    /// Returns `false` (and changes nothing) if no region hides that line.
    pub fn reveal_line_in_modified(&mut self, line: usize) -> bool {
        self.reveal(|r| r.hidden_modified_range().contains(line))
    }

    /// Unfold every region.
    pub fn show_all_regions(&mut self) {
        self.regions_mut().iter_mut().for_each(UnchangedRegion::show_all);
    }

    /// Fold every region completely.
    pub fn collapse_all_regions(&mut self) {
        self.regions_mut()
            .iter_mut()
            .for_each(UnchangedRegion::collapse_all);
    }

    fn reveal(&mut self, hides_line: impl Fn(&UnchangedRegion) -> bool) -> bool {
        let Some(index) = self.regions().iter().position(hides_line) else {
            return false;
        };
        self.regions_mut()[index].show_all();
        true
    }
}
