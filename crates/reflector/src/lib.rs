//! Reflector
//!
//! Typed annotations for classes and handlers, with merge and override
//! lookups across scopes.
//!
//! # Example
//!
//! ```ignore
//! use reflector::{DecoratorOptions, MethodDescriptor, Reflector, Target};
//!
//! let reflector = Reflector::default();
//! let roles = Reflector::create_decorator(DecoratorOptions::<Vec<&str>>::new().key("roles"));
//!
//! reflector
//!     .annotate(Target::class::<CatsController>())
//!     .decorate(&roles.call(vec!["admin"])?)
//!     .method(
//!         &MethodDescriptor::of("find", &CatsController::find),
//!         &[roles.call(vec!["user"])?],
//!     );
//!
//! // Closest scope wins
//! let handler = Target::function(&CatsController::find);
//! let effective = reflector.get_all_and_override(&roles, &[handler, Target::class::<CatsController>()]);
//! ```

#![warn(missing_docs)]

pub mod annotate;
pub mod decorator;
pub mod error;
pub mod merge;
mod reflector;

pub use annotate::ClassAnnotator;
pub use decorator::{
    set_metadata, CustomDecorator, Decorator, DecoratorOptions, DecoratorTarget, KeyOrDecorator,
    ReflectableDecorator,
};
pub use error::{ReflectError, ReflectResult};
pub use self::reflector::Reflector;

pub use reflector_store::{
    KeyGenerator, MetadataKey, MetadataStore, MethodDescriptor, Target, TargetId, Value,
    DEFAULT_KEY_LENGTH,
};
