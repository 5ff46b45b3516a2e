//! Per-logger context store
//!
//! A context store holds key-value fields that are merged into every record
//! emitted by its owning logger (when context is enabled). Insertion order
//! is preserved so rendered context blocks are stable.

use super::detail::Detail;
use parking_lot::RwLock;
use std::sync::Arc;

/// Concurrent key-value store scoped to one logger instance.
///
/// All operations are mutually exclusive with each other and with any
/// in-progress snapshot; a snapshot never observes a torn write.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    fields: Arc<RwLock<Vec<(String, Detail)>>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, overwriting any existing value for the key.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Detail>) {
        let key = key.into();
        let value = value.into();
        let mut fields = self.fields.write();
        if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            fields.push((key, value));
        }
    }

    /// Remove a field. Silent no-op when the key is absent.
    pub fn remove(&self, key: &str) {
        self.fields.write().retain(|(k, _)| k != key);
    }

    /// Remove all fields.
    pub fn clear(&self) {
        self.fields.write().clear();
    }

    /// Point-in-time copy of the store, safe to read after the call returns
    /// regardless of subsequent mutation.
    pub fn snapshot(&self) -> Vec<(String, Detail)> {
        self.fields.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub(crate) fn guard(&self, key: impl Into<String>, value: impl Into<Detail>) -> ContextGuard {
        let key = key.into();
        self.add(key.clone(), value);
        ContextGuard {
            fields: Arc::clone(&self.fields),
            key,
        }
    }
}

/// RAII guard for a scoped context field.
///
/// When dropped, removes the field it added from the owning store.
///
/// # Example
///
/// ```ignore
/// {
///     let _guard = logger.scoped_context("request_id", "abc-123");
///     logger.info("Processing request"); // includes request_id
/// }
/// // request_id removed here
/// ```
pub struct ContextGuard {
    fields: Arc<RwLock<Vec<(String, Detail)>>>,
    key: String,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.fields.write().retain(|(k, _)| *k != self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_add_overwrites() {
        let ctx = ContextStore::new();
        ctx.add("service", "gateway");
        ctx.add("service", "api");
        assert_eq!(ctx.len(), 1);
        let snapshot = ctx.snapshot();
        assert_eq!(snapshot[0].1, Detail::from("api"));
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let ctx = ContextStore::new();
        ctx.add("a", 1);
        ctx.remove("missing");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_clear() {
        let ctx = ContextStore::new();
        ctx.add("a", 1);
        ctx.add("b", 2);
        ctx.clear();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let ctx = ContextStore::new();
        ctx.add("a", 1);
        let snapshot = ctx.snapshot();
        ctx.add("b", 2);
        ctx.remove("a");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, "a");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let ctx = ContextStore::new();
        ctx.add("z", 1);
        ctx.add("a", 2);
        ctx.add("m", 3);
        let snapshot = ctx.snapshot();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let ctx = ContextStore::new();
        {
            let _guard = ctx.guard("scoped", "value");
            assert_eq!(ctx.len(), 1);
        }
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_concurrent_mutation_never_tears() {
        let ctx = ContextStore::new();
        let writer = {
            let ctx = ctx.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    ctx.add("key", format!("value-{}", i));
                    ctx.remove("other");
                    ctx.add("other", i);
                }
            })
        };
        for _ in 0..1000 {
            for (key, value) in ctx.snapshot() {
                // Every observed entry is a complete key-value pair.
                match key.as_str() {
                    "key" => assert!(matches!(value, Detail::Text(ref s) if s.starts_with("value-"))),
                    "other" => assert!(matches!(value, Detail::Number(_))),
                    other => panic!("unexpected key {}", other),
                }
            }
        }
        writer.join().unwrap();
    }
}
