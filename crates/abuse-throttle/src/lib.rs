//! Escalating per-user lockouts for failed code lookups.
//!
//! Repeated failed lookups from the same user trigger a temporary mute whose
//! duration grows tenfold on every recurrence. State lives entirely in
//! memory and expires lazily; nothing is persisted.

mod throttle;
mod types;

pub use throttle::AbuseThrottle;
pub use types::{FailureOutcome, MuteInfo, MutedUser, MAX_ATTEMPTS};
