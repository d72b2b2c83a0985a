//! Face-attendance matching core: an enrolled-identity catalog with
//! immutable snapshots, cosine best-match scanning, duplicate-guarded
//! enrollment, and dedup-windowed attendance recording.
//!
//! # Architecture
//!
//! 1. An external extractor turns a captured photo into a raw descriptor
//!    vector (never handled here).
//! 2. The vector is validated and unit-normalized by
//!    [`rollcall_embedding::EmbeddingCodec`].
//! 3. [`find_best_match`] scans an immutable [`CatalogSnapshot`] for the
//!    highest cosine similarity and applies an inclusive threshold.
//! 4. [`RegistrationGuard`] rejects enrollment when a face already matches;
//!    [`AttendanceRecorder`] records a check-in unless one exists inside the
//!    dedup window.
//! 5. All writes go through the [`Catalog`], which writes to an
//!    [`AttendanceStore`] and republishes a fresh snapshot atomically.
//!
//! Readers are never blocked: they hold `Arc` snapshots. Writers are
//! serialized under one lock, so duplicate checks and dedup checks cannot
//! race their own writes.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use rollcall_roster::{
//!     CheckInOutcome, Identity, MemoryStore, RegisterOutcome, Roster, RosterConfig,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), rollcall_roster::RosterError> {
//! let cfg = RosterConfig {
//!     dim: 4,
//!     ..Default::default()
//! };
//! let roster = Roster::open(Arc::new(MemoryStore::new()), cfg).await?;
//!
//! let enrolled = roster
//!     .register(Identity::new("s-001", "Ada"), &[1.0, 0.0, 0.0, 0.0])
//!     .await?;
//! assert!(matches!(enrolled, RegisterOutcome::Registered(_)));
//!
//! let checked = roster.check_in(&[0.99, 0.05, 0.0, 0.0]).await?;
//! assert!(matches!(checked, CheckInOutcome::Recorded(_)));
//! # Ok(())
//! # }
//! ```

pub mod attendance;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod redb;
pub mod register;
pub mod roster;
pub mod store;
pub mod types;

pub use attendance::{AttendanceRecorder, CheckInOutcome};
pub use catalog::{Catalog, CatalogSnapshot};
pub use config::RosterConfig;
pub use error::RosterError;
pub use matcher::{MatchResult, find_best_match};
pub use redb::RedbStore;
pub use register::{RegisterOutcome, RegistrationGuard};
pub use roster::Roster;
pub use store::{AttendanceStore, MemoryStore, StoreError};
pub use types::{AttendanceEvent, EnrollmentRecord, Identity, Profile};
