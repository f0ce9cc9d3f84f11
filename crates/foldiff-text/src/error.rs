use foldiff_types::LineRange;

/// Errors from document operations.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// An edit addressed lines outside the document.
    #[error("range {range} is outside a document of {line_count} lines")]
    InvalidRange { range: LineRange, line_count: usize },
}

/// Result alias for document operations.
pub type TextResult<T> = Result<T, TextError>;
