//! Throttle state and result types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Failed lookup attempts allowed before a mute is requested.
pub const MAX_ATTEMPTS: u32 = 5;

/// Per-user throttle record.
///
/// `muted_until` is present only while a lockout is active; it is cleared
/// lazily the first time it is observed to be in the past.
#[derive(Debug, Clone, Default)]
pub(crate) struct ThrottleState {
    pub attempts: u32,
    pub muted_until: Option<DateTime<Utc>>,
    pub mute_count: u32,
}

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// The caller should issue a mute (limit reached, or one is already active).
    pub should_mute: bool,
    /// Attempts remaining before the limit.
    pub attempts_left: u32,
}

/// Details of a freshly issued mute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteInfo {
    pub duration_hours: u64,
    pub muted_until: DateTime<Utc>,
    /// Lockouts ever issued to this user, this one included.
    pub mute_count: u32,
}

/// Snapshot entry describing one actively muted user.
#[derive(Debug, Clone, Serialize)]
pub struct MutedUser {
    pub user_id: i64,
    pub muted_until: DateTime<Utc>,
    /// Hours remaining, rounded to one decimal place.
    pub hours_left: f64,
    pub mute_count: u32,
}
