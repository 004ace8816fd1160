//! Explicit registry of running instances, keyed by instance id.
//!
//! Hosts that run several accounts keep their scheduler handles (or
//! instances) here instead of in a global.

use dashmap::DashMap;

/// Concurrent map from instance id to a per-instance value.
#[derive(Debug)]
pub struct InstanceRegistry<T> {
    entries: DashMap<String, T>,
}

impl<T> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T> InstanceRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value. Returns the value previously registered under `id`.
    pub fn insert(&self, id: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(id.into(), value)
    }

    /// Remove and return the value registered under `id`.
    pub fn remove(&self, id: &str) -> Option<T> {
        self.entries.remove(id).map(|(_, value)| value)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, in id order.
    pub fn drain(&self) -> Vec<(String, T)> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }
}

impl<T: Clone> InstanceRegistry<T> {
    /// Clone of the value registered under `id`.
    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.get(id).map(|e| e.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn insert_get_remove() {
        let registry = InstanceRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.insert("school", 1).is_none());
        assert_eq!(registry.get("school"), Some(1));
        assert!(registry.contains("school"));

        assert_eq!(registry.insert("school", 2), Some(1));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.remove("school"), Some(2));
        assert!(registry.get("school").is_none());
    }

    #[test]
    fn ids_are_sorted() {
        let registry = InstanceRegistry::new();
        registry.insert("b", ());
        registry.insert("a", ());
        registry.insert("c", ());

        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn drain_empties_registry() {
        let registry = InstanceRegistry::new();
        registry.insert("two", 2);
        registry.insert("one", 1);

        let drained = registry.drain();

        assert_eq!(drained, vec![("one".to_string(), 1), ("two".to_string(), 2)]);
        assert!(registry.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let registry = Arc::new(InstanceRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.insert(format!("acct{}", i), i);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 4);
    }
}
