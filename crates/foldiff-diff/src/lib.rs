//! Diff providers for foldiff.
//!
//! A provider turns two documents into an ordered list of changed line-range
//! pairs. The session treats providers as opaque and possibly slow; the only
//! contract is the [`DiffProvider`] trait.
//!
//! # Key Types
//!
//! - [`DiffProvider`] -- Async seam the session calls after debouncing
//! - [`LineDiffProvider`] -- Myers line diff backed by the `similar` crate

pub mod error;
pub mod line_diff;
pub mod provider;

pub use error::{DiffError, DiffResult};
pub use line_diff::{diff_lines, LineDiffProvider};
pub use provider::DiffProvider;
