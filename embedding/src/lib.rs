//! Unit-vector codec for face descriptor embeddings.
//!
//! Raw descriptor vectors coming out of an inference model are validated and
//! fixed onto the unit hypersphere here; everything downstream (matching,
//! storage) only ever sees the [`Embedding`] type, so unit length is a type
//! invariant rather than a runtime hope.
//!
//! # Usage
//!
//! ```
//! use rollcall_embedding::EmbeddingCodec;
//!
//! let codec = EmbeddingCodec::new(2);
//! let a = codec.normalize(&[3.0, 4.0]).unwrap();
//! let b = codec.normalize(&[6.0, 8.0]).unwrap();
//!
//! // Normalization is scale-invariant, similarity is cosine.
//! assert_eq!(a.as_slice(), b.as_slice());
//! assert!((a.similarity(&b) - 1.0).abs() < 1e-6);
//! ```
//!
//! # Design
//!
//! Enrolled and query vectors come from the same descriptor model, so both
//! sides are unit vectors and similarity reduces to a dot product — cheaper
//! than Euclidean distance and monotonically related to it on the sphere.

mod embedding;
mod error;

pub use embedding::{Embedding, EmbeddingCodec, MIN_NORM};
pub use error::EmbeddingError;
