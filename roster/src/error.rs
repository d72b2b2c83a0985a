use thiserror::Error;

/// Errors surfaced by roster operations.
///
/// Business outcomes (duplicate enrollment, deduplicated check-in,
/// unrecognized face) are not errors; they are variants of
/// [`RegisterOutcome`](crate::RegisterOutcome) and
/// [`CheckInOutcome`](crate::CheckInOutcome).
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster: embedding error: {0}")]
    Embedding(#[from] rollcall_embedding::EmbeddingError),

    #[error("roster: store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("roster: config error: {0}")]
    Config(String),

    #[error("roster: unknown identity: {0}")]
    UnknownIdentity(String),
}
