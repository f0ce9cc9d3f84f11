use thiserror::Error;

use crate::line_range::LineRange;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid line range: start {start} is after end {end_exclusive}")]
    InvalidRange { start: usize, end_exclusive: usize },

    #[error("line numbers are 1-based, got {0}")]
    ZeroLine(usize),

    #[error("change {index} is out of order or overlaps its predecessor: {range}")]
    UnorderedChange { index: usize, range: LineRange },

    #[error("change {index} exceeds document of {line_count} lines: {range}")]
    OutOfBounds {
        index: usize,
        range: LineRange,
        line_count: usize,
    },
}
