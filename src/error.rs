use thiserror::Error;

/// Errors reported by the rendering core.
///
/// Every failure is returned to the immediate caller; nothing in the core
/// aborts the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Matrix or vector shapes do not match the operation.
    #[error("dimension mismatch: {0}")]
    Dimension(String),

    /// Element or pixel access outside the valid range.
    #[error("index out of range: {0}")]
    Index(String),

    /// Zero-length vectors, zero-area triangles, singular matrices and
    /// degenerate camera bases.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Requested operation or render combination is not supported.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
