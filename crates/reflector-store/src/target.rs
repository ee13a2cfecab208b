//! Annotation Targets
//!
//! A [`Target`] is the identity of a code artifact that can carry
//! annotations: a type standing in for a class, or a callable standing in
//! for a function or method. Identity is what matters; the store never owns
//! or inspects the artifact itself.
//!
//! Every fn item and closure in Rust has its own zero-sized type, so the
//! `TypeId` of that type is a stable identity for the callable:
//!
//! ```ignore
//! struct UsersController;
//! impl UsersController {
//!     fn find(&self) {}
//! }
//!
//! let class = Target::class::<UsersController>();
//! let handler = Target::function(&UsersController::find);
//! ```
//!
//! That only holds for zero-sized callables. A `fn(..)` pointer, a boxed
//! closure or a capturing closure shares its type with other callables, so
//! [`Target::function`] rejects them at compile time and
//! [`Target::try_function`] returns `None`. Tables of fn pointers are keyed
//! by address with [`Target::address`].

use std::any::{type_name, TypeId};
use std::fmt;
use std::mem::size_of;
use std::hash::{Hash, Hasher};

/// Identity of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    /// A type used as a class
    Class(TypeId),
    /// A fn item or non-capturing closure
    Callable(TypeId),
    /// A callable known by its code address
    Address(usize),
    /// An artifact registered under a stable name
    Named(&'static str),
}

/// A class or callable that can carry annotations
///
/// Equality and hashing use [`TargetId`] only; the name is diagnostic.
#[derive(Clone, Copy)]
pub struct Target {
    id: TargetId,
    name: &'static str,
}

impl Target {
    /// Target for the type `T`
    pub fn class<T: ?Sized + 'static>() -> Self {
        Self {
            id: TargetId::Class(TypeId::of::<T>()),
            name: type_name::<T>(),
        }
    }

    /// Target for a fn item or non-capturing closure
    ///
    /// Fails to compile for sized callables such as `fn(..)` pointers.
    pub fn function<F: 'static>(_callable: &F) -> Self {
        const {
            assert!(
                size_of::<F>() == 0,
                "Target::function needs a fn item or non-capturing closure; use Target::address for fn pointers"
            )
        };
        Self::callable::<F>()
    }

    /// Target for a fn item or non-capturing closure, `None` for any other callable
    pub fn try_function<F: 'static>(_callable: &F) -> Option<Self> {
        (size_of::<F>() == 0).then(Self::callable::<F>)
    }

    /// Target for a callable identified by its code address
    ///
    /// ```ignore
    /// let handlers: [fn(); 2] = [a, b];
    /// let first = Target::address(handlers[0] as *const (), "a");
    /// ```
    pub fn address(ptr: *const (), name: &'static str) -> Self {
        Self {
            id: TargetId::Address(ptr as usize),
            name,
        }
    }

    fn callable<F: 'static>() -> Self {
        Self {
            id: TargetId::Callable(TypeId::of::<F>()),
            name: type_name::<F>(),
        }
    }

    /// Target for an artifact known only by a stable name
    pub fn named(name: &'static str) -> Self {
        Self {
            id: TargetId::Named(name),
            name,
        }
    }

    /// Identity of this target
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            TargetId::Class(_) => write!(f, "class {}", self.name),
            TargetId::Callable(_) => write!(f, "fn {}", self.name),
            TargetId::Address(addr) => write!(f, "fn {}@{:#x}", self.name, addr),
            TargetId::Named(_) => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A class member together with its underlying callable
///
/// Method annotations are stored against [`MethodDescriptor::value`], so a
/// later lookup with the callable's target finds them no matter how the
/// descriptor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    name: &'static str,
    value: Target,
}

impl MethodDescriptor {
    /// Create a descriptor for member `name` backed by `value`
    pub fn new(name: &'static str, value: Target) -> Self {
        Self { name, value }
    }

    /// Create a descriptor for member `name` backed by a fn item
    ///
    /// Same restriction as [`Target::function`].
    pub fn of<F: 'static>(name: &'static str, callable: &F) -> Self {
        Self::new(name, Target::function(callable))
    }

    /// Member name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying callable
    pub fn value(&self) -> Target {
        self.value
    }
}
