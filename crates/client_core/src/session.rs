use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{de::DeserializeOwned, Serialize};
use shared::domain::{AgentSession, ManagerSession};
use tracing::warn;

pub const AGENT_SESSION_KEY: &str = "farmer_ekyc_agent_session";
pub const MANAGER_SESSION_KEY: &str = "farmer_ekyc_manager_session";

/// String key-value storage that lives exactly as long as one client tab.
pub trait TabStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryTabStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryTabStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TabStorage for MemoryTabStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items().insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.items().remove(key);
    }
}

/// Both session slots as read at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub agent: Option<AgentSession>,
    pub manager: Option<ManagerSession>,
}

/// Two independent slots, one per principal kind. Reads never fail: anything
/// that does not parse is treated as no session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn TabStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTabStorage::new()))
    }

    pub fn save_agent_session(&self, session: &AgentSession) {
        self.save(AGENT_SESSION_KEY, session);
    }

    pub fn agent_session(&self) -> Option<AgentSession> {
        self.load(AGENT_SESSION_KEY)
    }

    pub fn clear_agent_session(&self) {
        self.storage.remove_item(AGENT_SESSION_KEY);
    }

    pub fn save_manager_session(&self, session: &ManagerSession) {
        self.save(MANAGER_SESSION_KEY, session);
    }

    pub fn manager_session(&self) -> Option<ManagerSession> {
        self.load(MANAGER_SESSION_KEY)
    }

    pub fn clear_manager_session(&self) {
        self.storage.remove_item(MANAGER_SESSION_KEY);
    }

    pub fn clear_all(&self) {
        self.clear_agent_session();
        self.clear_manager_session();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            agent: self.agent_session(),
            manager: self.manager_session(),
        }
    }

    fn save<T: Serialize>(&self, key: &str, session: &T) {
        match serde_json::to_string(session) {
            Ok(raw) => self.storage.set_item(key, raw),
            Err(err) => warn!(key, error = %err, "failed to serialize session"),
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get_item(key)?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable session slot");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
