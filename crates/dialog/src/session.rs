//! Per-chat dialog state, kept in memory for the life of the process.

use std::{collections::HashMap, sync::Mutex};

use crate::state::DialogState;

/// Storage for the current [`DialogState`] of each chat.
///
/// The engine reads the state, awaits catalog and outbound calls, then writes
/// the new state back. Callers must not handle two messages of the same chat
/// concurrently; the update loop processes updates one at a time.
pub trait SessionStore: Send + Sync {
    fn get(&self, chat_id: i64) -> Option<DialogState>;
    fn set(&self, chat_id: i64, state: DialogState);
    /// Remove the chat's state, returning it if there was one.
    fn remove(&self, chat_id: i64) -> Option<DialogState>;
    /// Number of chats with an active flow.
    fn active(&self) -> usize;
}

/// `HashMap`-backed session store.
///
/// Uses `std::sync::Mutex` because every operation is a plain map access that
/// is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<i64, DialogState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, DialogState>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, chat_id: i64) -> Option<DialogState> {
        self.lock().get(&chat_id).cloned()
    }

    fn set(&self, chat_id: i64, state: DialogState) {
        self.lock().insert(chat_id, state);
    }

    fn remove(&self, chat_id: i64) -> Option<DialogState> {
        self.lock().remove(&chat_id)
    }

    fn active(&self) -> usize {
        self.lock().len()
    }
}
