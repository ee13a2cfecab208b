//! Reflector Store
//!
//! Identity-keyed storage for annotations attached to classes and callables.
//! This is the leaf layer under `reflector`: it only knows how to write and
//! read one value per `(key, target)` pair.

#![warn(missing_docs)]

pub mod key;
pub mod store;
pub mod target;

pub use key::{KeyGenerator, MetadataKey, DEFAULT_KEY_LENGTH};
pub use store::MetadataStore;
pub use target::{MethodDescriptor, Target, TargetId};

/// Annotation values are JSON-shaped data
pub use serde_json::Value;
