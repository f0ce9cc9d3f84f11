//! Foundation types for foldiff.
//!
//! This crate provides the line-addressed value types shared by every other
//! foldiff crate. All line numbers are 1-based.
//!
//! # Key Types
//!
//! - [`LineRange`] -- Half-open `[start, end_exclusive)` range of lines
//! - [`LineRangeMapping`] -- A pair of ranges, one per document
//! - [`DocumentDiff`] -- The ordered change mappings produced by a diff provider
//! - [`DiffOptions`] -- Options handed to the diff provider

pub mod error;
pub mod line_range;
pub mod mapping;
pub mod options;

pub use error::TypeError;
pub use line_range::LineRange;
pub use mapping::{DocumentDiff, LineRangeMapping};
pub use options::DiffOptions;
