use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api_key::{generate_secret, ApiKey, LastUsed, DEFAULT_KEY_PREFIX};

/// Ordered in-memory collection of API keys. Order is insertion order.
#[derive(Debug, Clone)]
pub struct ApiKeyRegistry {
    keys: Vec<ApiKey>,
    key_prefix: String,
}

impl Default for ApiKeyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl ApiKeyRegistry {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            keys: Vec::new(),
            key_prefix: key_prefix.into(),
        }
    }

    /// Build a registry around existing records. Records whose id is already
    /// present are dropped so that ids stay unique.
    pub fn with_keys(key_prefix: impl Into<String>, keys: Vec<ApiKey>) -> Self {
        let mut registry = Self::new(key_prefix);
        for key in keys {
            if registry.get(&key.id).is_none() {
                registry.keys.push(key);
            }
        }
        registry
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Append a fresh key. Names are not validated; an empty name is kept as is.
    pub fn create(&mut self, name: &str) -> ApiKey {
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };
        let key = ApiKey {
            id,
            name: name.to_string(),
            secret: generate_secret(&self.key_prefix),
            usage: 0,
            created_at: Utc::now(),
            last_used: LastUsed::Never,
        };
        info!(id = %key.id, name = %key.name, "created api key");
        self.keys.push(key.clone());
        key
    }

    /// Remove the key with `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: &str) {
        let before = self.keys.len();
        self.keys.retain(|k| k.id != id);
        if self.keys.len() < before {
            info!(id, "deleted api key");
        } else {
            debug!(id, "delete ignored, no such key");
        }
    }

    /// Replace the name of the key with `id`. Absent ids are ignored.
    pub fn rename(&mut self, id: &str, new_name: &str) {
        match self.keys.iter_mut().find(|k| k.id == id) {
            Some(key) => {
                info!(id, from = %key.name, to = new_name, "renamed api key");
                key.name = new_name.to_string();
            }
            None => debug!(id, "rename ignored, no such key"),
        }
    }

    pub fn list(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn get(&self, id: &str) -> Option<&ApiKey> {
        self.keys.iter().find(|k| k.id == id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn total_usage(&self) -> u64 {
        self.keys.iter().map(|k| k.usage).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seeded() -> ApiKeyRegistry {
        ApiKeyRegistry::with_keys(
            DEFAULT_KEY_PREFIX,
            vec![
                ApiKey {
                    id: "1".into(),
                    name: "default".into(),
                    secret: "tvly-abc".into(),
                    usage: 24,
                    created_at: Utc::now(),
                    last_used: LastUsed::Today,
                },
                ApiKey {
                    id: "2".into(),
                    name: "tmp1".into(),
                    secret: "tvly-def".into(),
                    usage: 0,
                    created_at: Utc::now(),
                    last_used: LastUsed::Never,
                },
            ],
        )
    }

    #[test]
    fn create_on_empty_registry() {
        let mut registry = ApiKeyRegistry::default();
        let key = registry.create("x");
        assert_eq!(registry.len(), 1);
        assert_eq!(key.usage, 0);
        assert_eq!(key.last_used, LastUsed::Never);
        assert_eq!(key.last_used.to_string(), "Never");
        assert_eq!(registry.list()[0], key);
    }

    #[test]
    fn create_accepts_empty_name() {
        let mut registry = ApiKeyRegistry::default();
        let key = registry.create("");
        assert_eq!(key.name, "");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_uses_registry_prefix() {
        let mut registry = ApiKeyRegistry::new("sk-");
        let key = registry.create("x");
        assert!(key.secret.starts_with("sk-"));
    }

    #[test]
    fn created_ids_are_unique() {
        let mut registry = seeded();
        for i in 0..200 {
            registry.create(&format!("k{i}"));
        }
        let ids: HashSet<&str> = registry.list().iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn create_appends_in_insertion_order() {
        let mut registry = seeded();
        let a = registry.create("a");
        let b = registry.create("b");
        let ids: Vec<&str> = registry.list().iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", a.id.as_str(), b.id.as_str()]);
    }

    #[test]
    fn delete_removes_key() {
        let mut registry = seeded();
        registry.delete("1");
        assert!(registry.list().iter().all(|k| k.id != "1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_absent_is_noop() {
        let mut registry = seeded();
        let before = registry.list().to_vec();
        registry.delete("nope");
        assert_eq!(registry.list(), before.as_slice());
    }

    #[test]
    fn rename_changes_only_name() {
        let mut registry = seeded();
        let before = registry.get("1").cloned().unwrap();
        registry.rename("1", "renamed");
        let after = registry.list()[0].clone();
        assert_eq!(after.name, "renamed");
        assert_eq!(after.secret, "tvly-abc");
        assert_eq!(after.id, before.id);
        assert_eq!(after.usage, before.usage);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.last_used, before.last_used);
    }

    #[test]
    fn rename_absent_is_noop() {
        let mut registry = seeded();
        let before = registry.list().to_vec();
        registry.rename("nope", "x");
        assert_eq!(registry.list(), before.as_slice());
    }

    #[test]
    fn with_keys_drops_duplicate_ids() {
        let mut keys = seeded().list().to_vec();
        keys.push(keys[0].clone());
        let registry = ApiKeyRegistry::with_keys(DEFAULT_KEY_PREFIX, keys);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn total_usage_sums_counters() {
        assert_eq!(seeded().total_usage(), 24);
        assert_eq!(ApiKeyRegistry::default().total_usage(), 0);
    }
}
