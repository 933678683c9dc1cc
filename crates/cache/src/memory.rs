use crate::Cache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// A process-local cache with the same TTL and pattern-delete semantics as
/// the Redis backend.
///
/// Used by the test suites, and as the runtime fallback when Redis is
/// unreachable at startup.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Glob matching restricted to the shapes the coordinator uses:
    /// a trailing `*` matches any suffix, anything else matches exactly.
    fn matches(pattern: &str, key: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: &str) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + self.default_ttl,
        };
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(key);
    }

    async fn delete_pattern(&self, pattern: &str) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .retain(|key, _| !Self::matches(pattern, key));
    }
}
