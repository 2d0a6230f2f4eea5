//! Constructor introspection and contract upcasting
//!
//! Implementation types describe the constructor the container should call
//! through [`Injectable`]: an ordered list of the contracts it consumes and a
//! function that builds the value from the resolved [`Arguments`]. The
//! [`injectable!`](crate::injectable) macro keeps both halves in sync.
//!
//! Contracts are usually trait objects. [`Implements`] moves an `Arc<Impl>`
//! into an `Arc<dyn Contract>`; every sized type implements its own
//! contract, and [`implements!`](crate::implements) covers trait objects.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult};

/// Type-erased resolved value. Always wraps an `Arc<C>` for its contract `C`.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) fn erase<C: ?Sized + Contract>(value: Arc<C>) -> Instance {
    Arc::new(value) as Instance
}

pub(crate) fn restore<C: ?Sized + Contract>(instance: &Instance) -> Option<Arc<C>> {
    instance.downcast_ref::<Arc<C>>().cloned()
}

/// Anything that can be resolved from the container.
pub trait Contract: Send + Sync + 'static {}

impl<T: ?Sized + Send + Sync + 'static> Contract for T {}

/// Runtime identity of a contract or implementation type
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without module paths, e.g. `RndGuidWriter` for
    /// `dyn demo::RndGuidWriter`
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

fn short_type_name(full: &str) -> String {
    let full = full.strip_prefix("dyn ").unwrap_or(full);
    let mut out = String::with_capacity(full.len());
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            // drop the path segment that preceded `::`
            while out.ends_with(|ch: char| ch.is_alphanumeric() || ch == '_') {
                out.pop();
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// An implementation type the container knows how to construct.
///
/// `dependencies` lists the contracts of the selected constructor, in
/// parameter order. Prefer the constructor with the fewest parameters when a
/// type has several.
///
/// ```rust
/// use std::sync::Arc;
/// use wiring_di::{injectable, Injectable, TypeKey};
///
/// struct Clock;
/// struct Scheduler {
///     clock: Arc<Clock>,
/// }
///
/// impl Scheduler {
///     fn new(clock: Arc<Clock>) -> Self {
///         Self { clock }
///     }
/// }
///
/// injectable!(Clock => Clock::default);
/// injectable!(Scheduler => Scheduler::new, [Clock]);
///
/// # impl Default for Clock { fn default() -> Self { Clock } }
/// assert_eq!(Scheduler::dependencies(), vec![TypeKey::of::<Clock>()]);
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Contracts consumed by the constructor, in parameter order
    fn dependencies() -> Vec<TypeKey> {
        Vec::new()
    }

    /// Build the value from its resolved dependencies
    fn construct(args: Arguments) -> Result<Self, BoxError>;
}

/// Resolved constructor arguments, consumed in declaration order
pub struct Arguments {
    owner: &'static str,
    values: std::vec::IntoIter<Instance>,
}

impl Arguments {
    pub(crate) fn new(owner: &'static str, values: Vec<Instance>) -> Self {
        Self {
            owner,
            values: values.into_iter(),
        }
    }

    /// Take the next argument as contract `C`
    pub fn take<C: ?Sized + Contract>(&mut self) -> DiResult<Arc<C>> {
        self.values
            .next()
            .and_then(|value| restore::<C>(&value))
            .ok_or(DiError::ArgumentMismatch {
                implementation: self.owner,
                expected: type_name::<C>(),
            })
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Upcast from an implementation to a contract it satisfies
pub trait Implements<C: ?Sized + Contract>: Contract {
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T: Contract> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implement [`Injectable`] by naming the constructor and its dependencies.
///
/// ```rust,ignore
/// injectable!(RandomGuid => RandomGuid::new);
/// injectable!(GuidWriter => GuidWriter::new, [RandomGuid]);
/// injectable!(Report => Report::new, [dyn Clock, Settings]);
/// ```
///
/// The constructor receives one `Arc<Dep>` per listed dependency.
#[macro_export]
macro_rules! injectable {
    ($ty:ty => $ctor:path, [$($dep:ty),+ $(,)?]) => {
        impl $crate::Injectable for $ty {
            fn dependencies() -> ::std::vec::Vec<$crate::TypeKey> {
                ::std::vec![$($crate::TypeKey::of::<$dep>()),+]
            }

            fn construct(
                mut args: $crate::Arguments,
            ) -> ::std::result::Result<Self, $crate::BoxError> {
                ::std::result::Result::Ok($ctor($(args.take::<$dep>()?),+))
            }
        }
    };
    ($ty:ty => $ctor:path $(,)?) => {
        impl $crate::Injectable for $ty {
            fn construct(
                _args: $crate::Arguments,
            ) -> ::std::result::Result<Self, $crate::BoxError> {
                ::std::result::Result::Ok($ctor())
            }
        }
    };
}

/// Declare the trait-object contracts an implementation satisfies.
///
/// ```rust,ignore
/// implements!(ConsoleWriter => dyn Writer, dyn Flush);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $ty {
                fn upcast(
                    self: ::std::sync::Arc<Self>,
                ) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}
