//! Reflector
//!
//! Read side of the annotation system. A [`Reflector`] answers "what is the
//! effective annotation for this key" across an ordered list of targets,
//! typically a handler followed by its enclosing class.
//!
//! | Method                  | Policy                                        |
//! |-------------------------|-----------------------------------------------|
//! | `get`                   | single target                                 |
//! | `get_all`               | one slot per target, absent kept              |
//! | `get_all_and_merge`     | union objects / concatenate sequences         |
//! | `get_all_and_override`  | first defined value wins                      |
//!
//! Every method accepts either a raw key or a decorator (see
//! [`KeyOrDecorator`]).

use std::sync::Arc;

use reflector_store::{MetadataKey, MetadataStore, Target, Value};
use serde::de::DeserializeOwned;

use crate::annotate::ClassAnnotator;
use crate::decorator::{DecoratorOptions, KeyOrDecorator, ReflectableDecorator};
use crate::error::{ReflectError, ReflectResult};
use crate::merge::merge_values;

/// Annotation accessor over a shared [`MetadataStore`]
#[derive(Debug, Clone)]
pub struct Reflector {
    store: Arc<MetadataStore>,
}

impl Default for Reflector {
    /// A reflector over a fresh, empty store
    fn default() -> Self {
        Self::new(Arc::new(MetadataStore::new()))
    }
}

impl Reflector {
    /// Create a reflector reading from `store`
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self { store }
    }

    /// A reflector over the process-wide store
    pub fn global() -> Self {
        Self::new(MetadataStore::global())
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<MetadataStore> {
        &self.store
    }

    /// Create a keyed decorator factory
    ///
    /// Without an explicit key a random one is generated, so two decorators
    /// created this way never share a key.
    pub fn create_decorator<P: 'static, T: 'static>(
        options: DecoratorOptions<P, T>,
    ) -> ReflectableDecorator<P, T> {
        ReflectableDecorator::from_options(options)
    }

    /// Start registering decorators on `class`
    pub fn annotate(&self, class: Target) -> ClassAnnotator<'_> {
        ClassAnnotator::new(&self.store, class)
    }

    // ========================================================================
    // Retrieval
    // ========================================================================

    /// Annotation on a single target
    pub fn get<'k>(&self, key: impl Into<KeyOrDecorator<'k>>, target: &Target) -> Option<Value> {
        self.store.lookup(key.into().key(), target)
    }

    /// Annotation on each target, in order
    pub fn get_all<'k>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        targets: &[Target],
    ) -> Vec<Option<Value>> {
        let key = key.into().key();
        targets
            .iter()
            .map(|target| self.store.lookup(key, target))
            .collect()
    }

    /// Defined annotations across `targets`, merged
    ///
    /// - none defined: an empty array
    /// - one defined: returned as-is if it is an object, otherwise wrapped in
    ///   a one-element array
    /// - several: folded left to right; arrays concatenate, objects union
    ///   with later targets winning, mismatched shapes pair up into an array
    pub fn get_all_and_merge<'k>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        targets: &[Target],
    ) -> Value {
        let defined = self.get_all(key, targets).into_iter().flatten().collect();
        merge_values(defined)
    }

    /// First defined annotation across `targets`
    pub fn get_all_and_override<'k>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        targets: &[Target],
    ) -> Option<Value> {
        let key = key.into().key();
        targets
            .iter()
            .find_map(|target| self.store.lookup(key, target))
    }

    // ========================================================================
    // Typed retrieval
    // ========================================================================

    /// [`Reflector::get`], deserialized into `T`
    pub fn get_as<'k, T: DeserializeOwned>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        target: &Target,
    ) -> ReflectResult<Option<T>> {
        let key = key.into().key();
        self.store
            .lookup(key, target)
            .map(|value| decode(key, Some(*target), value))
            .transpose()
    }

    /// [`Reflector::get_all_and_override`], deserialized into `T`
    pub fn get_all_and_override_as<'k, T: DeserializeOwned>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        targets: &[Target],
    ) -> ReflectResult<Option<T>> {
        let key = key.into().key();
        targets
            .iter()
            .find_map(|target| self.store.lookup(key, target).map(|v| (*target, v)))
            .map(|(target, value)| decode(key, Some(target), value))
            .transpose()
    }

    /// [`Reflector::get_all_and_merge`], deserialized into `T`
    ///
    /// The merged shape depends on how many targets define a value. A
    /// sequence defined on exactly one target comes back wrapped (`[[..]]`),
    /// while two or more concatenate flat, so a decorator storing `Vec<E>`
    /// reads as `Vec<Vec<E>>` in the first case and `Vec<E>` in the second.
    /// Read untyped with [`Reflector::get_all_and_merge`] when the number of
    /// annotated scopes varies.
    pub fn get_all_and_merge_as<'k, T: DeserializeOwned>(
        &self,
        key: impl Into<KeyOrDecorator<'k>>,
        targets: &[Target],
    ) -> ReflectResult<T> {
        let key = key.into();
        let merged = self.get_all_and_merge(key, targets);
        decode(key.key(), None, merged)
    }
}

fn decode<T: DeserializeOwned>(key: &str, target: Option<Target>, value: Value) -> ReflectResult<T> {
    serde_json::from_value(value).map_err(|source| ReflectError::Deserialize {
        key: MetadataKey::new(key),
        target,
        source,
    })
}
