//! Registration records

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::BoxError;
use crate::injectable::{erase, Arguments, Contract, Implements, Injectable, Instance, TypeKey};
use crate::lifecycle::Lifecycle;

type ConstructorFn = fn(Arguments) -> Result<Instance, BoxError>;
type FactoryFn = Arc<dyn Fn() -> Instance + Send + Sync>;

/// How a descriptor produces a new instance
pub(crate) enum Activator {
    /// Resolve the declared dependencies, then call the constructor
    Constructor(ConstructorFn),
    /// Zero-argument override; dependency resolution does not run
    Factory(FactoryFn),
    /// Pre-built value handed over at registration
    Instance(Instance),
}

fn construct_erased<C, I>(args: Arguments) -> Result<Instance, BoxError>
where
    C: ?Sized + Contract,
    I: Injectable + Implements<C>,
{
    let value = I::construct(args)?;
    Ok(erase::<C>(<I as Implements<C>>::upcast(Arc::new(value))))
}

/// One binding from a registration key to an implementation and lifecycle.
///
/// Immutable once registered, apart from the singleton slot which is filled
/// at most once.
pub struct Descriptor {
    key: String,
    contract: TypeKey,
    implementation: TypeKey,
    lifecycle: Lifecycle,
    dependencies: Vec<TypeKey>,
    activator: Activator,
    singleton: OnceCell<Instance>,
}

impl Descriptor {
    /// Register `T` as its own contract
    pub fn new<T: Injectable>(lifecycle: Lifecycle) -> Self {
        Self::bind::<T, T>(lifecycle)
    }

    /// Register implementation `I` under contract `C`
    pub fn bind<C, I>(lifecycle: Lifecycle) -> Self
    where
        C: ?Sized + Contract,
        I: Injectable + Implements<C>,
    {
        Self::assemble(
            TypeKey::of::<C>(),
            TypeKey::of::<I>(),
            lifecycle,
            I::dependencies(),
            Activator::Constructor(construct_erased::<C, I>),
        )
    }

    /// Register a factory that replaces constructor injection entirely
    pub fn factory<C, I, F>(lifecycle: Lifecycle, factory: F) -> Self
    where
        C: ?Sized + Contract,
        I: Implements<C>,
        F: Fn() -> I + Send + Sync + 'static,
    {
        let factory: FactoryFn =
            Arc::new(move || erase::<C>(<I as Implements<C>>::upcast(Arc::new(factory()))));

        Self::assemble(
            TypeKey::of::<C>(),
            TypeKey::of::<I>(),
            lifecycle,
            Vec::new(),
            Activator::Factory(factory),
        )
    }

    /// Register a pre-built value. Always a singleton.
    pub fn instance<C, I>(value: I) -> Self
    where
        C: ?Sized + Contract,
        I: Implements<C>,
    {
        let instance = erase::<C>(<I as Implements<C>>::upcast(Arc::new(value)));
        let mut descriptor = Self::assemble(
            TypeKey::of::<C>(),
            TypeKey::of::<I>(),
            Lifecycle::Singleton,
            Vec::new(),
            Activator::Instance(instance.clone()),
        );
        descriptor.singleton = OnceCell::with_value(instance);
        descriptor
    }

    fn assemble(
        contract: TypeKey,
        implementation: TypeKey,
        lifecycle: Lifecycle,
        dependencies: Vec<TypeKey>,
        activator: Activator,
    ) -> Self {
        Self {
            key: default_key(&contract, &implementation),
            contract,
            implementation,
            lifecycle,
            dependencies,
            activator,
            singleton: OnceCell::new(),
        }
    }

    /// Replace the derived registration key with an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.key = name.into();
        self
    }

    /// Registration key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn contract(&self) -> TypeKey {
        self.contract
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Constructor dependencies, in parameter order
    pub fn dependencies(&self) -> &[TypeKey] {
        &self.dependencies
    }

    pub fn has_factory(&self) -> bool {
        matches!(self.activator, Activator::Factory(_))
    }

    pub fn is_prebuilt(&self) -> bool {
        matches!(self.activator, Activator::Instance(_))
    }

    /// Whether the singleton slot has been populated
    pub fn has_singleton(&self) -> bool {
        self.singleton.get().is_some()
    }

    pub(crate) fn activator(&self) -> &Activator {
        &self.activator
    }

    pub(crate) fn singleton_slot(&self) -> &OnceCell<Instance> {
        &self.singleton
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("key", &self.key)
            .field("contract", &self.contract)
            .field("implementation", &self.implementation)
            .field("lifecycle", &self.lifecycle)
            .field("dependencies", &self.dependencies)
            .field("has_factory", &self.has_factory())
            .field("has_singleton", &self.has_singleton())
            .finish()
    }
}

/// Contract name for self-bound registrations, contract + implementation
/// name otherwise, so several implementations of one contract get distinct keys.
fn default_key(contract: &TypeKey, implementation: &TypeKey) -> String {
    if contract == implementation {
        contract.short_name()
    } else {
        format!("{}{}", contract.short_name(), implementation.short_name())
    }
}
