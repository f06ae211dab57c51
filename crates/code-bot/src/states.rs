//! Per-user pending dialog state.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A multi-step admin action awaiting its next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// `/add <code>` was accepted; the next message holds the contact info.
    AwaitingContactInfo { code: String },
}

/// In-memory map of users to their pending action.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, PendingAction>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: i64, action: PendingAction) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id, action);
    }

    /// Remove and return the user's pending action.
    pub fn take(&self, user_id: i64) -> Option<PendingAction> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
    }

    pub fn peek(&self, user_id: i64) -> Option<PendingAction> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
    }
}
