//! Per-user failure tracking with escalating lockouts.

use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory abuse throttle.
///
/// Tracks failed lookup attempts per user and issues escalating mutes
/// (1h, 10h, 100h, ...). Expired mutes are cleared lazily the next time the
/// user's state is inspected; there is no background sweep, and stale
/// records stay resident for the life of the process.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone, Default)]
pub struct AbuseThrottle {
    users: Arc<RwLock<HashMap<i64, ThrottleState>>>,
}

impl AbuseThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed lookup attempt.
    ///
    /// Returns whether the caller should issue a mute and how many attempts
    /// remain. An active mute reports `(should_mute, 0)` without changing
    /// state; reaching the limit does not auto-mute, the caller follows up
    /// with [`mute`](Self::mute).
    pub async fn record_failure(&self, user_id: i64) -> FailureOutcome {
        self.record_failure_at(user_id, Utc::now()).await
    }

    async fn record_failure_at(&self, user_id: i64, now: DateTime<Utc>) -> FailureOutcome {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();

        if let Some(until) = state.muted_until {
            if now < until {
                return FailureOutcome {
                    should_mute: true,
                    attempts_left: 0,
                };
            }
            // Lockout ran out; expire it before counting the new failure.
            state.muted_until = None;
            state.attempts = 0;
        }

        state.attempts += 1;
        if state.attempts >= MAX_ATTEMPTS {
            debug!(user_id, "attempt limit reached");
            FailureOutcome {
                should_mute: true,
                attempts_left: 0,
            }
        } else {
            FailureOutcome {
                should_mute: false,
                attempts_left: MAX_ATTEMPTS - state.attempts,
            }
        }
    }

    /// Issue a mute for the user.
    ///
    /// The duration escalates tenfold with every mute the user has ever
    /// received: 1 hour, then 10, then 100, and so on. The attempt counter
    /// resets to zero.
    pub async fn mute(&self, user_id: i64) -> MuteInfo {
        self.mute_at(user_id, Utc::now()).await
    }

    async fn mute_at(&self, user_id: i64, now: DateTime<Utc>) -> MuteInfo {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();

        state.mute_count += 1;
        let duration_hours = 10u64.pow(state.mute_count - 1);
        let muted_until = now + Duration::hours(duration_hours as i64);
        state.attempts = 0;
        state.muted_until = Some(muted_until);

        info!(
            user_id,
            duration_hours,
            mute_count = state.mute_count,
            "user muted"
        );

        MuteInfo {
            duration_hours,
            muted_until,
            mute_count: state.mute_count,
        }
    }

    /// Whether the user is currently locked out.
    ///
    /// An expired deadline is cleared here, resetting the attempt counter as
    /// a side effect. This is the only cleanup path.
    pub async fn is_muted(&self, user_id: i64) -> bool {
        self.is_muted_at(user_id, Utc::now()).await
    }

    async fn is_muted_at(&self, user_id: i64, now: DateTime<Utc>) -> bool {
        let mut users = self.users.write().await;
        let Some(state) = users.get_mut(&user_id) else {
            return false;
        };
        match state.muted_until {
            None => false,
            Some(until) if now >= until => {
                state.muted_until = None;
                state.attempts = 0;
                debug!(user_id, "mute expired");
                false
            }
            Some(_) => true,
        }
    }

    /// Lift an active mute. Returns false if the user was not muted.
    pub async fn unmute(&self, user_id: i64) -> bool {
        self.unmute_at(user_id, Utc::now()).await
    }

    async fn unmute_at(&self, user_id: i64, now: DateTime<Utc>) -> bool {
        let mut users = self.users.write().await;
        let Some(state) = users.get_mut(&user_id) else {
            return false;
        };
        match state.muted_until {
            Some(until) if now < until => {
                state.muted_until = None;
                state.attempts = 0;
                info!(user_id, "mute lifted");
                true
            }
            Some(_) => {
                // Already past the deadline; expire it now.
                state.muted_until = None;
                state.attempts = 0;
                false
            }
            None => false,
        }
    }

    /// Reset the attempt counter after a successful lookup.
    ///
    /// Does not touch an active mute.
    pub async fn reset_on_success(&self, user_id: i64) {
        let mut users = self.users.write().await;
        if let Some(state) = users.get_mut(&user_id) {
            state.attempts = 0;
        }
    }

    /// Snapshot of all users with an active mute, expiring stale entries on
    /// the way through.
    pub async fn list_muted(&self) -> Vec<MutedUser> {
        self.list_muted_at(Utc::now()).await
    }

    async fn list_muted_at(&self, now: DateTime<Utc>) -> Vec<MutedUser> {
        let mut users = self.users.write().await;
        let mut muted = Vec::new();

        for (&user_id, state) in users.iter_mut() {
            let Some(until) = state.muted_until else {
                continue;
            };
            if now >= until {
                state.muted_until = None;
                state.attempts = 0;
                continue;
            }
            let hours_left = ((until - now).num_seconds() as f64 / 3600.0 * 10.0).round() / 10.0;
            muted.push(MutedUser {
                user_id,
                muted_until: until,
                hours_left,
                mute_count: state.mute_count,
            });
        }

        muted.sort_by_key(|u| u.user_id);
        muted
    }
}
