use thiserror::Error;

/// Rejection reasons for raw descriptor vectors.
///
/// Any of these means the input never entered the matching path; they are
/// caller bugs or upstream extraction failures, never retried internally.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding: non-finite component at index {index}")]
    NonFinite { index: usize },

    #[error("embedding: norm {norm} too small to normalize")]
    NearZeroNorm { norm: f32 },
}
