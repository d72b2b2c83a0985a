use chrono::Duration;

use crate::error::RosterError;

/// Tuning knobs for the matching core.
///
/// The thresholds are starting points, not calibrated constants. They depend
/// on the descriptor model; operators are expected to tune them against real
/// captures using the diagnostics path ([`Roster::identify`](crate::Roster)).
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Embedding dimensionality. Every vector entering the system must have
    /// exactly this many components. Default: 512.
    pub dim: usize,

    /// Minimum similarity for an enrollment attempt to be rejected as a
    /// duplicate of an existing record. Strict: only near-identical faces
    /// should block enrollment. Default: 0.80.
    pub register_threshold: f32,

    /// Minimum similarity for a check-in query to resolve to an enrolled
    /// identity. More permissive than registration, since lighting and angle
    /// vary at the door. Default: 0.60.
    pub identify_threshold: f32,

    /// Minimum interval between two recorded events for the same identity.
    /// Converts a stream of per-frame recognitions into one event per visit.
    /// Default: 5 minutes.
    pub dedup_window: Duration,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            dim: 512,
            register_threshold: 0.80,
            identify_threshold: 0.60,
            dedup_window: Duration::minutes(5),
        }
    }
}

impl RosterConfig {
    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.dim == 0 {
            return Err(RosterError::Config("dim must be positive".into()));
        }
        for (name, t) in [
            ("register_threshold", self.register_threshold),
            ("identify_threshold", self.identify_threshold),
        ] {
            if !(-1.0..=1.0).contains(&t) {
                return Err(RosterError::Config(format!(
                    "{name} must be within [-1, 1], got {t}"
                )));
            }
        }
        if self.dedup_window < Duration::zero() {
            return Err(RosterError::Config("dedup_window must not be negative".into()));
        }
        Ok(())
    }
}
