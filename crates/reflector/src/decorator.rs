//! Decorators
//!
//! Rust has no decorator syntax, so a decorator here is a plain value that is
//! applied explicitly when a class or method is registered. Every decorator
//! exposes the key it writes under, which lets readers look annotations up by
//! passing the decorator itself instead of remembering a raw key.
//!
//! Two kinds exist:
//! - [`CustomDecorator`]: a key and a ready value, produced by
//!   [`set_metadata`] or by calling a [`ReflectableDecorator`].
//! - [`ReflectableDecorator`]: a key and a transform, produced by
//!   `Reflector::create_decorator`. Calling it with a parameter yields a
//!   [`CustomDecorator`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use reflector_store::{KeyGenerator, MetadataKey, MethodDescriptor, MetadataStore, Target, Value};
use serde::Serialize;

use crate::error::{ReflectError, ReflectResult};

/// Anything that carries the key it annotates under
pub trait Decorator {
    /// The annotation key (`KEY`)
    fn key(&self) -> &MetadataKey;
}

/// Where a decorator is being applied
#[derive(Debug, Clone, Copy)]
pub enum DecoratorTarget<'a> {
    /// The class itself
    Class(&'a Target),
    /// A method of `owner`; the annotation lands on the descriptor's callable
    Method {
        /// Class declaring the method
        owner: &'a Target,
        /// The method being decorated
        descriptor: &'a MethodDescriptor,
    },
}

impl DecoratorTarget<'_> {
    /// Target the annotation is written against
    pub fn resolve(&self) -> Target {
        match self {
            DecoratorTarget::Class(target) => **target,
            DecoratorTarget::Method { descriptor, .. } => descriptor.value(),
        }
    }
}

// ============================================================================
// CustomDecorator
// ============================================================================

/// A decorator with a fixed key and value
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDecorator {
    key: MetadataKey,
    value: Value,
}

/// Build a decorator that writes `value` under `key`
pub fn set_metadata(key: impl Into<MetadataKey>, value: impl Into<Value>) -> CustomDecorator {
    CustomDecorator {
        key: key.into(),
        value: value.into(),
    }
}

impl CustomDecorator {
    /// Value written on application
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Write this annotation into `store`
    ///
    /// Returns the target that received the value.
    pub fn apply(&self, store: &MetadataStore, target: DecoratorTarget<'_>) -> Target {
        let resolved = target.resolve();
        match target {
            DecoratorTarget::Class(class) => {
                tracing::debug!(key = %self.key, class = ?class, "apply class decorator");
            }
            DecoratorTarget::Method { owner, descriptor } => {
                tracing::debug!(
                    key = %self.key,
                    owner = ?owner,
                    method = descriptor.name(),
                    "apply method decorator"
                );
            }
        }
        store.define(self.key.clone(), self.value.clone(), resolved);
        resolved
    }

    /// Apply to a class
    pub fn apply_to_class(&self, store: &MetadataStore, class: &Target) -> Target {
        self.apply(store, DecoratorTarget::Class(class))
    }

    /// Apply to a method of `owner`
    pub fn apply_to_method(
        &self,
        store: &MetadataStore,
        owner: &Target,
        descriptor: &MethodDescriptor,
    ) -> Target {
        self.apply(store, DecoratorTarget::Method { owner, descriptor })
    }
}

impl Decorator for CustomDecorator {
    fn key(&self) -> &MetadataKey {
        &self.key
    }
}

// ============================================================================
// ReflectableDecorator
// ============================================================================

type Transform<P, T> = Arc<dyn Fn(P) -> T + Send + Sync>;

/// Options for `Reflector::create_decorator`
pub struct DecoratorOptions<P, T = P> {
    key: Option<MetadataKey>,
    generator: KeyGenerator,
    transform: Transform<P, T>,
}

impl<P: 'static> DecoratorOptions<P, P> {
    /// Options with a generated key and no transform
    pub fn new() -> Self {
        Self {
            key: None,
            generator: KeyGenerator::default(),
            transform: Arc::new(|param| param),
        }
    }
}

impl<P: 'static> Default for DecoratorOptions<P, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static, T: 'static> DecoratorOptions<P, T> {
    /// Use an explicit key instead of a generated one
    pub fn key(mut self, key: impl Into<MetadataKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Generator used when no explicit key is given
    pub fn generator(mut self, generator: KeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Transform parameters before they are written
    pub fn transform<U, F>(self, transform: F) -> DecoratorOptions<P, U>
    where
        F: Fn(P) -> U + Send + Sync + 'static,
    {
        DecoratorOptions {
            key: self.key,
            generator: self.generator,
            transform: Arc::new(transform),
        }
    }
}

impl<P, T> fmt::Debug for DecoratorOptions<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorOptions")
            .field("key", &self.key)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

/// A keyed decorator factory
///
/// `P` is the parameter accepted at decoration time, `T` the transformed
/// value that is stored and later read back.
pub struct ReflectableDecorator<P, T = P> {
    key: MetadataKey,
    transform: Transform<P, T>,
    _marker: PhantomData<fn(P) -> T>,
}

impl<P: 'static, T: 'static> ReflectableDecorator<P, T> {
    pub(crate) fn from_options(options: DecoratorOptions<P, T>) -> Self {
        let generated = options.key.is_none();
        let key = options
            .key
            .unwrap_or_else(|| options.generator.generate());
        tracing::debug!(key = %key, generated, "create decorator");
        Self {
            key,
            transform: options.transform,
            _marker: PhantomData,
        }
    }
}

impl<P, T: Serialize> ReflectableDecorator<P, T> {
    /// Produce the decorator to apply for `param`
    ///
    /// The transformed value is stored as `{}` when it serializes to null.
    /// That includes non-finite floats: JSON has no NaN or infinity, so
    /// serde_json writes them as null and they are stored as `{}` too.
    pub fn call(&self, param: P) -> ReflectResult<CustomDecorator> {
        let transformed = (self.transform)(param);
        let value = serde_json::to_value(&transformed).map_err(|source| {
            ReflectError::Serialize {
                key: self.key.clone(),
                source,
            }
        })?;
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            value => value,
        };
        Ok(CustomDecorator {
            key: self.key.clone(),
            value,
        })
    }
}

impl<P, T> Decorator for ReflectableDecorator<P, T> {
    fn key(&self) -> &MetadataKey {
        &self.key
    }
}

impl<P, T> Clone for ReflectableDecorator<P, T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            transform: Arc::clone(&self.transform),
            _marker: PhantomData,
        }
    }
}

impl<P, T> fmt::Debug for ReflectableDecorator<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectableDecorator")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Key or decorator
// ============================================================================

/// How a retrieval names its annotation: a raw key or a decorator handle
#[derive(Clone, Copy)]
pub enum KeyOrDecorator<'a> {
    /// A bare key
    Key(&'a str),
    /// A decorator; its key is used
    Decorator(&'a dyn Decorator),
}

impl<'a> KeyOrDecorator<'a> {
    /// The key to look up
    pub fn key(&self) -> &'a str {
        match *self {
            KeyOrDecorator::Key(key) => key,
            KeyOrDecorator::Decorator(decorator) => decorator.key().as_str(),
        }
    }
}

impl fmt::Debug for KeyOrDecorator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrDecorator::Key(key) => f.debug_tuple("Key").field(key).finish(),
            KeyOrDecorator::Decorator(decorator) => {
                f.debug_tuple("Decorator").field(decorator.key()).finish()
            }
        }
    }
}

impl<'a> From<&'a str> for KeyOrDecorator<'a> {
    fn from(key: &'a str) -> Self {
        KeyOrDecorator::Key(key)
    }
}

impl<'a> From<&'a String> for KeyOrDecorator<'a> {
    fn from(key: &'a String) -> Self {
        KeyOrDecorator::Key(key.as_str())
    }
}

impl<'a> From<&'a MetadataKey> for KeyOrDecorator<'a> {
    fn from(key: &'a MetadataKey) -> Self {
        KeyOrDecorator::Key(key.as_str())
    }
}

impl<'a> From<&'a CustomDecorator> for KeyOrDecorator<'a> {
    fn from(decorator: &'a CustomDecorator) -> Self {
        KeyOrDecorator::Decorator(decorator)
    }
}

impl<'a, P: 'a, T: 'a> From<&'a ReflectableDecorator<P, T>> for KeyOrDecorator<'a> {
    fn from(decorator: &'a ReflectableDecorator<P, T>) -> Self {
        KeyOrDecorator::Decorator(decorator)
    }
}
