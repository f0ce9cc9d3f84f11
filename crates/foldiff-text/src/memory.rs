use std::collections::HashMap;
use std::sync::RwLock;

use foldiff_types::LineRange;
use tokio::sync::watch;
use tracing::trace;

use crate::error::{TextError, TextResult};
use crate::traits::{RangeHandle, TextModel};

/// Mutable state behind the document lock.
struct DocumentState {
    lines: Vec<String>,
    version: u64,
    /// Live tracked ranges. `None` marks a range whose content was deleted.
    tracked: HashMap<RangeHandle, Option<LineRange>>,
    next_handle: u64,
}

/// In-memory, line-vector document.
///
/// Intended for tests and embedding. Content and tracked ranges live behind a
/// `RwLock`; each edit bumps the version and publishes it on a watch channel.
pub struct InMemoryDocument {
    state: RwLock<DocumentState>,
    version_tx: watch::Sender<u64>,
}

impl InMemoryDocument {
    /// Create a document from text, splitting on line terminators.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines().map(str::to_owned).collect())
    }

    /// Create a document from an explicit list of lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let (version_tx, _) = watch::channel(1);
        Self {
            state: RwLock::new(DocumentState {
                lines,
                version: 1,
                tracked: HashMap::new(),
                next_handle: 1,
            }),
            version_tx,
        }
    }

    /// Replace the lines in `range` with `new_lines`.
    ///
    /// An empty `range` inserts before `range.start`; an empty `new_lines`
    /// deletes. `range.end_exclusive` may be one past the last line.
    pub fn replace_lines(&self, range: LineRange, new_lines: Vec<String>) -> TextResult<()> {
        let version = {
            let mut state = self.state.write().expect("lock poisoned");
            let line_count = state.lines.len();
            if range.start == 0 || range.end_exclusive > line_count + 1 {
                return Err(TextError::InvalidRange { range, line_count });
            }

            let inserted = new_lines.len();
            state
                .lines
                .splice(range.start - 1..range.end_exclusive - 1, new_lines);

            for tracked in state.tracked.values_mut() {
                if let Some(current) = *tracked {
                    *tracked = adjust_tracked(current, range, inserted);
                }
            }

            state.version += 1;
            trace!(%range, inserted, version = state.version, "lines replaced");
            state.version
        };
        self.version_tx.send_replace(version);
        Ok(())
    }

    /// Insert `lines` before line `before`.
    pub fn insert_lines(&self, before: usize, lines: Vec<String>) -> TextResult<()> {
        self.replace_lines(LineRange::new(before, before), lines)
    }

    /// Delete the lines in `range`.
    pub fn delete_lines(&self, range: LineRange) -> TextResult<()> {
        self.replace_lines(range, Vec::new())
    }

    /// Replace the whole content. Every tracked range becomes unresolvable.
    pub fn set_text(&self, text: &str) {
        let version = {
            let mut state = self.state.write().expect("lock poisoned");
            state.lines = text.lines().map(str::to_owned).collect();
            for tracked in state.tracked.values_mut() {
                *tracked = None;
            }
            state.version += 1;
            state.version
        };
        self.version_tx.send_replace(version);
    }

    /// Number of live tracked ranges, including unresolvable ones.
    pub fn tracked_count(&self) -> usize {
        self.state.read().expect("lock poisoned").tracked.len()
    }
}

impl TextModel for InMemoryDocument {
    fn line_count(&self) -> usize {
        self.state.read().expect("lock poisoned").lines.len()
    }

    fn version(&self) -> u64 {
        self.state.read().expect("lock poisoned").version
    }

    fn subscribe_version(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    fn lines(&self) -> Vec<String> {
        self.state.read().expect("lock poisoned").lines.clone()
    }

    fn track_range(&self, range: LineRange) -> RangeHandle {
        let mut state = self.state.write().expect("lock poisoned");
        let handle = RangeHandle(state.next_handle);
        state.next_handle += 1;
        state.tracked.insert(handle, Some(range));
        handle
    }

    fn resolve(&self, handle: RangeHandle) -> Option<LineRange> {
        let state = self.state.read().expect("lock poisoned");
        state.tracked.get(&handle).copied().flatten()
    }

    fn release(&self, handle: RangeHandle) -> bool {
        let mut state = self.state.write().expect("lock poisoned");
        state.tracked.remove(&handle).is_some()
    }
}

impl std::fmt::Debug for InMemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("InMemoryDocument")
            .field("line_count", &state.lines.len())
            .field("version", &state.version)
            .field("tracked", &state.tracked.len())
            .finish()
    }
}

/// Move a tracked range across an edit that replaced `edit` with `inserted`
/// lines.
fn adjust_tracked(tracked: LineRange, edit: LineRange, inserted: usize) -> Option<LineRange> {
    let delta = inserted as isize - edit.len() as isize;

    if tracked.end_exclusive <= edit.start {
        return Some(tracked);
    }

    if edit.is_empty() {
        // Pure insertion before `edit.start`.
        if tracked.start >= edit.start {
            return Some(tracked.delta(delta));
        }
        return Some(LineRange::new(tracked.start, tracked.end_exclusive + inserted));
    }

    if tracked.start >= edit.end_exclusive {
        return Some(tracked.delta(delta));
    }

    let new_end = tracked.end_exclusive.saturating_add_signed(delta);
    match (
        edit.start <= tracked.start,
        edit.end_exclusive >= tracked.end_exclusive,
    ) {
        // The edit swallowed every tracked line.
        (true, true) => None,
        // Head removed; the tail survives after the inserted lines.
        (true, false) => Some(LineRange::new(edit.start + inserted, new_end)),
        // Tail removed; the head survives untouched.
        (false, true) => Some(LineRange::new(tracked.start, edit.start)),
        // Edit strictly inside.
        (false, false) => Some(LineRange::new(tracked.start, new_end)),
    }
}
