//! Metadata Storage
//!
//! Side table mapping `(MetadataKey, Target)` pairs to annotation values.
//! Writes overwrite; there is no append at this layer. Reads clone the
//! stored value and never mutate the table.
//!
//! The store is an ordinary value. Share it with `Arc` between the code that
//! registers annotations and the code that reads them, or use
//! [`MetadataStore::global`] when a process-wide table is wanted.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::key::MetadataKey;
use crate::target::Target;

/// Annotations attached to a single target (key -> value)
type TargetMetadata = FxHashMap<MetadataKey, Value>;

static GLOBAL_STORE: Lazy<Arc<MetadataStore>> = Lazy::new(|| Arc::new(MetadataStore::new()));

/// Identity-keyed annotation store
#[derive(Debug, Default)]
pub struct MetadataStore {
    /// Map from target identity to its annotations
    targets: RwLock<FxHashMap<Target, TargetMetadata>>,
}

impl MetadataStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            targets: RwLock::new(FxHashMap::default()),
        }
    }

    /// The process-wide store
    pub fn global() -> Arc<MetadataStore> {
        Arc::clone(&GLOBAL_STORE)
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Associate `value` with `(key, target)`, replacing any previous value
    pub fn define(&self, key: MetadataKey, value: Value, target: Target) {
        tracing::trace!(key = %key, target = ?target, "define metadata");
        self.targets
            .write()
            .entry(target)
            .or_default()
            .insert(key, value);
    }

    /// Value stored for `(key, target)`, if any
    pub fn lookup(&self, key: &str, target: &Target) -> Option<Value> {
        self.targets.read().get(target)?.get(key).cloned()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Check whether `(key, target)` has a value
    pub fn has(&self, key: &str, target: &Target) -> bool {
        self.targets
            .read()
            .get(target)
            .is_some_and(|entry| entry.contains_key(key))
    }

    /// Keys defined on `target`, sorted
    pub fn keys(&self, target: &Target) -> Vec<MetadataKey> {
        let mut keys: Vec<MetadataKey> = self
            .targets
            .read()
            .get(target)
            .map(|entry| entry.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Remove the value for `(key, target)`
    ///
    /// Returns true if a value existed.
    pub fn delete(&self, key: &str, target: &Target) -> bool {
        let mut targets = self.targets.write();
        let Some(entry) = targets.get_mut(target) else {
            return false;
        };
        let removed = entry.remove(key).is_some();
        if entry.is_empty() {
            targets.remove(target);
        }
        if removed {
            tracing::trace!(key, target = ?target, "delete metadata");
        }
        removed
    }

    /// Remove every annotation on `target`
    pub fn clear_target(&self, target: &Target) -> bool {
        let removed = self.targets.write().remove(target).is_some();
        if removed {
            tracing::trace!(target = ?target, "clear target metadata");
        }
        removed
    }

    /// Number of targets carrying at least one annotation
    pub fn target_count(&self) -> usize {
        self.targets.read().len()
    }
}
