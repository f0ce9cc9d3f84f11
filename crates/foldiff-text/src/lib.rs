//! Document abstraction for foldiff.
//!
//! A document is a list of lines with a version number that increases on
//! every edit. Ranges of lines can be tracked across edits: the document
//! keeps each tracked range aligned with the content it originally covered,
//! so coordinates taken before an edit can be translated into coordinates
//! after it.
//!
//! # Key Types
//!
//! - [`TextModel`] -- The document trait consumed by the diff session
//! - [`InMemoryDocument`] -- Line-vector implementation for tests and tools
//! - [`RangeHandle`] -- Opaque handle to a tracked range

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{TextError, TextResult};
pub use memory::InMemoryDocument;
pub use traits::{RangeHandle, TextModel};
