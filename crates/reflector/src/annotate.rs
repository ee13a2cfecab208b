//! Registration-time annotation
//!
//! [`ClassAnnotator`] stands in for decorator syntax: it applies decorators
//! to a class and its methods in one place, usually next to the type's
//! definition or in a module's setup function.
//!
//! ```ignore
//! reflector
//!     .annotate(Target::class::<CatsController>())
//!     .decorate(&roles.call(vec!["admin"])?)
//!     .method(
//!         &MethodDescriptor::of("create", &CatsController::create),
//!         &[roles.call(vec!["owner"])?],
//!     );
//! ```

use reflector_store::{MetadataStore, MethodDescriptor, Target};

use crate::decorator::CustomDecorator;

/// Applies decorators to one class and its methods
#[derive(Debug)]
pub struct ClassAnnotator<'s> {
    store: &'s MetadataStore,
    class: Target,
}

impl<'s> ClassAnnotator<'s> {
    pub(crate) fn new(store: &'s MetadataStore, class: Target) -> Self {
        Self { store, class }
    }

    /// The class being annotated
    pub fn class(&self) -> Target {
        self.class
    }

    /// Apply a decorator to the class
    pub fn decorate(self, decorator: &CustomDecorator) -> Self {
        decorator.apply_to_class(self.store, &self.class);
        self
    }

    /// Apply decorators to a method, in order
    ///
    /// Later decorators overwrite earlier ones that share a key.
    pub fn method(self, descriptor: &MethodDescriptor, decorators: &[CustomDecorator]) -> Self {
        for decorator in decorators {
            decorator.apply_to_method(self.store, &self.class, descriptor);
        }
        self
    }
}
