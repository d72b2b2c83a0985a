use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rollcall_embedding::Embedding;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Classification attributes attached to an identity.
///
/// Opaque to the matching core: carried through enrollment, surfaced on
/// attendance events, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_grade: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Reference to the captured photo (path or URL). Never read here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.class_name.is_none()
            && self.sub_class.is_none()
            && self.grade.is_none()
            && self.sub_grade.is_none()
            && self.program.is_none()
            && self.role.is_none()
            && self.photo.is_none()
    }
}

/// A person known to the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable external identifier (e.g. a student id). Unique per catalog.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default, skip_serializing_if = "Profile::is_empty")]
    pub profile: Profile,
}

impl Identity {
    /// Convenience constructor for an identity with an empty profile.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile: Profile::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One enrolled identity with its canonical embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub identity: Identity,

    pub embedding: Embedding,

    /// When the identity was first enrolled. Preserved across embedding
    /// replacement so match tie-breaking stays stable.
    pub enrolled_at: DateTime<Utc>,
}

/// One recorded attendance check-in.
///
/// Name and classification are copied from the enrollment record at recording
/// time, so later profile edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub identity_id: String,

    pub name: String,

    pub recorded_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}
