//! Unchanged-region engine for foldiff.
//!
//! Turns a diff into foldable spans of unchanged lines, and carries the
//! user's fold expansion from one batch of spans to the next. Regions have
//! no identity across recomputations; state moves by range overlap.
//!
//! # Key Types
//!
//! - [`UnchangedRegion`] -- One foldable span with its visibility counts
//! - [`from_diffs`] -- Derive regions from change mappings
//! - [`transfer_state`] / [`PreviousRegion`] -- Carry fold state forward

pub mod derive;
pub mod region;
pub mod transfer;

pub use derive::{from_diffs, MIN_CONTEXT, MIN_HIDDEN_LINE_COUNT};
pub use region::{UnchangedRegion, DEFAULT_REVEAL_STEP};
pub use transfer::{transfer_state, PreviousRegion};
