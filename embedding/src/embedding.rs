use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// Norm below which normalization is numerically unstable and the input is
/// rejected as degenerate.
pub const MIN_NORM: f64 = 1e-6;

/// An L2-normalized descriptor vector.
///
/// Produced only by [`EmbeddingCodec::normalize`], so holding one is proof
/// the vector passed validation and has unit length. Never mutated in place;
/// an identity's embedding is replaced wholesale on re-capture.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Returns the components.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns the dimensionality.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Cosine similarity to another embedding, in [-1, 1].
    ///
    /// Both sides are unit vectors, so this is a plain dot product.
    /// Accumulates in f64 and clamps against rounding drift.
    pub fn similarity(&self, other: &Embedding) -> f32 {
        debug_assert_eq!(self.0.len(), other.0.len(), "embedding dims must agree");
        let mut dot: f64 = 0.0;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            dot += (*a as f64) * (*b as f64);
        }
        dot.clamp(-1.0, 1.0) as f32
    }
}

impl fmt::Debug for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("dim", &self.0.len())
            .finish()
    }
}

/// Validates raw descriptor vectors and fixes them onto the unit sphere.
///
/// The dimensionality is set once and enforced on every vector entering the
/// system, so stored and query embeddings always agree.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingCodec {
    dim: usize,
}

impl EmbeddingCodec {
    /// Creates a codec for vectors of the given dimensionality.
    /// Panics if `dim` is 0.
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "embedding: dim must be positive");
        Self { dim }
    }

    /// Returns the expected dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Validates `raw` and returns its unit-length form.
    ///
    /// Fails if the length is not the codec dimensionality, any component is
    /// non-finite, or the norm is below [`MIN_NORM`]. Already normalized
    /// input comes back unchanged (idempotent), which lets stored records be
    /// re-validated on every catalog load.
    pub fn normalize(&self, raw: &[f32]) -> Result<Embedding, EmbeddingError> {
        if raw.len() != self.dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dim,
                got: raw.len(),
            });
        }

        let mut sum: f64 = 0.0;
        for (i, &x) in raw.iter().enumerate() {
            if !x.is_finite() {
                return Err(EmbeddingError::NonFinite { index: i });
            }
            sum += (x as f64) * (x as f64);
        }

        let norm = sum.sqrt();
        if norm < MIN_NORM {
            return Err(EmbeddingError::NearZeroNorm { norm: norm as f32 });
        }

        let scale = (1.0 / norm) as f32;
        Ok(Embedding(raw.iter().map(|&x| x * scale).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_length() {
        let codec = EmbeddingCodec::new(2);
        let e = codec.normalize(&[3.0, 4.0]).unwrap();
        assert!((e.as_slice()[0] - 0.6).abs() < 1e-6);
        assert!((e.as_slice()[1] - 0.8).abs() < 1e-6);

        let norm: f64 = e
            .as_slice()
            .iter()
            .map(|&x| (x as f64) * (x as f64))
            .sum::<f64>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-6, "should be unit length, got {norm}");
    }

    #[test]
    fn normalize_idempotent() {
        let codec = EmbeddingCodec::new(3);
        let once = codec.normalize(&[1.0, 2.0, 2.0]).unwrap();
        let twice = codec.normalize(once.as_slice()).unwrap();
        for (a, b) in once.as_slice().iter().zip(twice.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn normalize_scale_invariant() {
        let codec = EmbeddingCodec::new(3);
        let v = codec.normalize(&[0.5, -1.5, 2.0]).unwrap();
        let v2 = codec.normalize(&[1.0, -3.0, 4.0]).unwrap();
        assert_eq!(v.as_slice(), v2.as_slice(), "v and 2v should normalize identically");
    }

    #[test]
    fn normalize_wrong_dimension() {
        let codec = EmbeddingCodec::new(4);
        let err = codec.normalize(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 4, got: 2 }
        ));
    }

    #[test]
    fn normalize_non_finite() {
        let codec = EmbeddingCodec::new(3);
        let err = codec.normalize(&[1.0, f32::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, EmbeddingError::NonFinite { index: 1 }));

        let err = codec.normalize(&[f32::INFINITY, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EmbeddingError::NonFinite { index: 0 }));
    }

    #[test]
    fn normalize_near_zero_norm() {
        let codec = EmbeddingCodec::new(3);
        let err = codec.normalize(&[0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EmbeddingError::NearZeroNorm { .. }));
    }

    #[test]
    fn similarity_self_is_one() {
        let codec = EmbeddingCodec::new(4);
        let e = codec.normalize(&[0.3, -0.2, 0.9, 0.1]).unwrap();
        let sim = e.similarity(&e);
        assert!((sim - 1.0).abs() < 1e-6, "self similarity should be 1, got {sim}");
        assert!(sim <= 1.0, "must stay clamped, got {sim}");
    }

    #[test]
    fn similarity_symmetric() {
        let codec = EmbeddingCodec::new(3);
        let a = codec.normalize(&[1.0, 2.0, 3.0]).unwrap();
        let b = codec.normalize(&[-2.0, 0.5, 1.0]).unwrap();
        assert_eq!(a.similarity(&b), b.similarity(&a));
    }

    #[test]
    fn similarity_orthogonal() {
        let codec = EmbeddingCodec::new(3);
        let a = codec.normalize(&[1.0, 0.0, 0.0]).unwrap();
        let b = codec.normalize(&[0.0, 1.0, 0.0]).unwrap();
        assert!(a.similarity(&b).abs() < 1e-6);
    }

    #[test]
    fn similarity_opposite() {
        let codec = EmbeddingCodec::new(3);
        let a = codec.normalize(&[1.0, 0.0, 0.0]).unwrap();
        let b = codec.normalize(&[-1.0, 0.0, 0.0]).unwrap();
        assert!((a.similarity(&b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn serde_roundtrip_preserves_components() {
        let codec = EmbeddingCodec::new(3);
        let e = codec.normalize(&[1.0, 2.0, 2.0]).unwrap();
        let json = serde_json::to_string(&e).unwrap();
        let back: Embedding = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
