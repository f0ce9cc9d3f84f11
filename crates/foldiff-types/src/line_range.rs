use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A half-open range of 1-based line numbers: `[start, end_exclusive)`.
///
/// An empty range (`start == end_exclusive`) still carries a position; it is
/// how a pure insertion or deletion is represented on the side that has no
/// lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    /// First line in the range.
    pub start: usize,
    /// First line after the range.
    pub end_exclusive: usize,
}

impl LineRange {
    /// Create a range from explicit bounds.
    ///
    /// Callers must pass `start <= end_exclusive`; use [`LineRange::try_new`]
    /// for untrusted input.
    pub const fn new(start: usize, end_exclusive: usize) -> Self {
        debug_assert!(start <= end_exclusive);
        Self {
            start,
            end_exclusive,
        }
    }

    /// Create a range, validating that both bounds are 1-based and ordered.
    pub fn try_new(start: usize, end_exclusive: usize) -> Result<Self, TypeError> {
        if start == 0 {
            return Err(TypeError::ZeroLine(start));
        }
        if start > end_exclusive {
            return Err(TypeError::InvalidRange {
                start,
                end_exclusive,
            });
        }
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    /// A range of `len` lines beginning at `start`.
    pub const fn of_length(start: usize, len: usize) -> Self {
        Self {
            start,
            end_exclusive: start + len,
        }
    }

    /// Number of lines covered.
    pub const fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    /// Returns `true` if the range covers no lines.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// Returns `true` if `line` lies inside the range.
    pub const fn contains(&self, line: usize) -> bool {
        self.start <= line && line < self.end_exclusive
    }

    /// Returns `true` if the two ranges share at least one line.
    ///
    /// Touching ranges (`a.end_exclusive == b.start`) do not intersect.
    pub fn intersects_strict(&self, other: &LineRange) -> bool {
        self.start.max(other.start) < self.end_exclusive.min(other.end_exclusive)
    }

    /// Shift the range by a signed line delta, saturating at line 1.
    pub fn delta(&self, lines: isize) -> Self {
        let shift = |n: usize| n.saturating_add_signed(lines).max(1);
        Self {
            start: shift(self.start),
            end_exclusive: shift(self.end_exclusive),
        }
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineRange({self})")
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end_exclusive)
    }
}
