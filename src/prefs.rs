//! Per-user target language preferences.
//!
//! In-memory only: preferences live as long as the process. The store does
//! not validate codes; callers check them against the catalog first.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Concurrency-safe map from sender ID to language code.
pub struct PreferenceStore {
    default: String,
    inner: Mutex<HashMap<String, String>>,
}

impl PreferenceStore {
    /// Create an empty store. `default` is returned for unknown users.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Stored preference for `user_id`, or the default code.
    pub fn get(&self, user_id: &str) -> String {
        self.lock()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    /// Record `code` for `user_id`, replacing any previous value.
    pub fn set(&self, user_id: &str, code: &str) {
        self.lock().insert(user_id.to_string(), code.to_string());
    }

    /// Number of users with an explicit preference.
    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave the map half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
