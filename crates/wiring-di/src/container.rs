//! Service container implementation
//!
//! [`ContainerBuilder`] collects registrations during setup. `build()`
//! freezes them into a [`Container`], which resolves object graphs by walking
//! constructor dependencies and applying each registration's lifecycle:
//!
//! - **Transient**: constructed on every resolution
//! - **Singleton**: constructed once, stored on the descriptor
//! - **Scoped**: constructed once per scope, stored in that scope's cache

use std::any::{type_name, TypeId};
use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::descriptor::{Activator, Descriptor};
use crate::error::{DiError, DiResult};
use crate::injectable::{restore, Arguments, Contract, Implements, Injectable, Instance, TypeKey};
use crate::lifecycle::Lifecycle;
use crate::options::ContainerOptions;
use crate::provider::{ProviderRegistry, ServiceProvider};
use crate::registry::Registry;
use crate::scope::{Scope, ScopeState};
use crate::validation::{self, ValidationReport};

const ROOT_SCOPE_ID: u64 = 1;

// ============================================================================
// ContainerBuilder
// ============================================================================

/// Collects registrations before the container is built.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wiring_di::{implements, injectable, ContainerBuilder};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// struct Scheduler {
///     clock: Arc<dyn Clock>,
/// }
/// impl Scheduler {
///     fn new(clock: Arc<dyn Clock>) -> Self { Self { clock } }
/// }
///
/// injectable!(FixedClock => FixedClock::default);
/// implements!(FixedClock => dyn Clock);
/// injectable!(Scheduler => Scheduler::new, [dyn Clock]);
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .register_singleton_as::<dyn Clock, FixedClock>()?
///     .register_transient::<Scheduler>()?;
/// let container = builder.build()?;
///
/// let scheduler = container.resolve::<Scheduler>()?;
/// assert_eq!(scheduler.clock.now(), 42);
/// # Ok::<(), wiring_di::DiError>(())
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    registry: Registry,
    options: ContainerOptions,
}

impl ContainerBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder with custom options
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            registry: Registry::new(),
            options,
        }
    }

    /// Options the container will be built with
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Register a descriptor. Duplicate keys are rejected.
    pub fn register(&mut self, descriptor: Descriptor) -> DiResult<&mut Self> {
        self.registry.insert(descriptor)?;
        Ok(self)
    }

    // ========================================================================
    // Transient Registration
    // ========================================================================

    /// Register `T` as a transient service (created every time resolved)
    pub fn register_transient<T: Injectable>(&mut self) -> DiResult<&mut Self> {
        self.register(Descriptor::new::<T>(Lifecycle::Transient))
    }

    /// Register `I` as a transient implementation of contract `C`
    pub fn register_transient_as<C, I>(&mut self) -> DiResult<&mut Self>
    where
        C: ?Sized + Contract,
        I: Injectable + Implements<C>,
    {
        self.register(Descriptor::bind::<C, I>(Lifecycle::Transient))
    }

    // ========================================================================
    // Singleton Registration
    // ========================================================================

    /// Register `T` as a singleton (created once, shared for the container's lifetime)
    pub fn register_singleton<T: Injectable>(&mut self) -> DiResult<&mut Self> {
        self.register(Descriptor::new::<T>(Lifecycle::Singleton))
    }

    /// Register `I` as the singleton implementation of contract `C`
    pub fn register_singleton_as<C, I>(&mut self) -> DiResult<&mut Self>
    where
        C: ?Sized + Contract,
        I: Injectable + Implements<C>,
    {
        self.register(Descriptor::bind::<C, I>(Lifecycle::Singleton))
    }

    /// Register a pre-built value, keyed by its own type name
    pub fn register_instance<T: Contract>(&mut self, value: T) -> DiResult<&mut Self> {
        self.register(Descriptor::instance::<T, T>(value))
    }

    /// Register a pre-built implementation of contract `C`
    pub fn register_singleton_instance<C, I>(&mut self, value: I) -> DiResult<&mut Self>
    where
        C: ?Sized + Contract,
        I: Implements<C>,
    {
        self.register(Descriptor::instance::<C, I>(value))
    }

    // ========================================================================
    // Scoped Registration
    // ========================================================================

    /// Register `T` as a scoped service (created once per scope)
    pub fn register_scoped<T: Injectable>(&mut self) -> DiResult<&mut Self> {
        self.register(Descriptor::new::<T>(Lifecycle::Scoped))
    }

    /// Register `I` as the scoped implementation of contract `C`
    pub fn register_scoped_as<C, I>(&mut self) -> DiResult<&mut Self>
    where
        C: ?Sized + Contract,
        I: Injectable + Implements<C>,
    {
        self.register(Descriptor::bind::<C, I>(Lifecycle::Scoped))
    }

    // ========================================================================
    // Factories and providers
    // ========================================================================

    /// Register a zero-argument factory for contract `C`.
    ///
    /// The factory replaces constructor injection: `I` does not need to be
    /// [`Injectable`] and no dependencies are resolved for it.
    pub fn register_factory<C, I, F>(&mut self, lifecycle: Lifecycle, factory: F) -> DiResult<&mut Self>
    where
        C: ?Sized + Contract,
        I: Implements<C>,
        F: Fn() -> I + Send + Sync + 'static,
    {
        self.register(Descriptor::factory::<C, I, F>(lifecycle, factory))
    }

    /// Let a provider register its group of services
    pub fn add_provider<P: ServiceProvider + ?Sized>(&mut self, provider: &P) -> DiResult<&mut Self> {
        debug!(provider = provider.name(), "Registering services from provider");
        provider.register(self)?;
        Ok(self)
    }

    /// Apply every provider of a registry, lowest priority value first
    pub fn add_providers(&mut self, providers: &ProviderRegistry) -> DiResult<&mut Self> {
        providers.register_all(self)?;
        Ok(self)
    }

    /// Get the number of registrations
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Freeze the registrations into a container.
    ///
    /// Unless disabled in [`ContainerOptions`], every registration with
    /// constructor dependencies is test-resolved first and all failures are
    /// reported together as [`DiError::InvalidConfiguration`].
    pub fn build(self) -> DiResult<Container> {
        let validate = self.options.validate_on_build;
        let container = self.build_unvalidated();

        if validate {
            container.validate().into_result()?;
        }

        info!(services = container.service_count(), "Container built");
        Ok(container)
    }

    /// Freeze the registrations without validating them.
    ///
    /// Cycles then surface as [`DiError::CircularDependency`] from the first
    /// `resolve` that walks into one.
    pub fn build_unvalidated(self) -> Container {
        Container {
            registry: self.registry,
            options: self.options,
            root: Arc::new(ScopeState::root(ROOT_SCOPE_ID)),
            next_scope_id: AtomicU64::new(ROOT_SCOPE_ID + 1),
        }
    }
}

// ============================================================================
// Container
// ============================================================================

/// Immutable registry plus the resolver.
///
/// Resolving directly on the container uses the root scope, so scoped
/// services behave as one-per-root-scope until a [`Scope`] is begun.
#[derive(Debug)]
pub struct Container {
    registry: Registry,
    options: ContainerOptions,
    root: Arc<ScopeState>,
    next_scope_id: AtomicU64,
}

impl Container {
    /// Create a new container builder
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Resolve the first registration for contract `C`
    ///
    /// # Errors
    /// - `ResolutionNotFound` if nothing is registered for `C` or for one of its dependencies
    /// - `ConstructionFailure` if a constructor fails
    /// - `CircularDependency` if construction walks back into a type it is building
    pub fn resolve<C: ?Sized + Contract>(&self) -> DiResult<Arc<C>> {
        self.resolve_in::<C>(&self.root)
    }

    /// Resolve the registration stored under `name`
    pub fn resolve_named<C: ?Sized + Contract>(&self, name: &str) -> DiResult<Arc<C>> {
        self.resolve_named_in::<C>(&self.root, name)
    }

    /// Like [`Container::resolve`], but `Ok(None)` when nothing is registered for `C`
    pub fn try_resolve<C: ?Sized + Contract>(&self) -> DiResult<Option<Arc<C>>> {
        self.try_resolve_in::<C>(&self.root)
    }

    /// Lazily resolve every registration for contract `C`, in registration order.
    ///
    /// Each element follows its own lifecycle. Yields nothing if `C` has no
    /// registrations.
    pub fn resolve_all<C: ?Sized + Contract>(
        &self,
    ) -> impl Iterator<Item = DiResult<Arc<C>>> + '_ {
        self.resolve_all_in::<C>(&self.root)
    }

    /// Begin a scope nested in the root scope
    pub fn begin_scope(&self) -> Scope<'_> {
        Scope::begin(self, Arc::clone(&self.root))
    }

    /// Test-resolve every registration with constructor dependencies
    pub fn validate(&self) -> ValidationReport {
        validation::validate(self)
    }

    /// Check if any registration provides contract `C`
    pub fn is_registered<C: ?Sized + Contract>(&self) -> bool {
        self.registry.contains_contract(TypeId::of::<C>())
    }

    /// Check if a registration exists under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    /// Get the number of registered services
    pub fn service_count(&self) -> usize {
        self.registry.len()
    }

    /// All descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.registry.iter()
    }

    /// Options the container was built with
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Identifier of the root scope
    pub fn root_scope_id(&self) -> u64 {
        self.root.id()
    }

    // ========================================================================
    // Internal Access (for Scope and validation)
    // ========================================================================

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn root_state(&self) -> &ScopeState {
        &self.root
    }

    pub(crate) fn allocate_scope_id(&self) -> u64 {
        self.next_scope_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn resolve_in<C: ?Sized + Contract>(&self, scope: &ScopeState) -> DiResult<Arc<C>> {
        let contract = TypeKey::of::<C>();
        let descriptor = self
            .registry
            .first_for(contract.id())
            .ok_or_else(|| DiError::not_found(contract.short_name()))?;

        let instance = Resolution::new(self, scope).dispatch(descriptor)?;
        downcast::<C>(descriptor, &instance)
    }

    pub(crate) fn resolve_named_in<C: ?Sized + Contract>(
        &self,
        scope: &ScopeState,
        name: &str,
    ) -> DiResult<Arc<C>> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| DiError::not_found(name))?;

        let instance = Resolution::new(self, scope).dispatch(descriptor)?;
        downcast::<C>(descriptor, &instance)
    }

    pub(crate) fn try_resolve_in<C: ?Sized + Contract>(
        &self,
        scope: &ScopeState,
    ) -> DiResult<Option<Arc<C>>> {
        if !self.is_registered::<C>() {
            return Ok(None);
        }
        self.resolve_in::<C>(scope).map(Some)
    }

    pub(crate) fn resolve_all_in<'a, C: ?Sized + Contract>(
        &'a self,
        scope: &'a ScopeState,
    ) -> impl Iterator<Item = DiResult<Arc<C>>> + 'a {
        self.registry
            .all_for(TypeId::of::<C>())
            .map(move |descriptor| {
                let instance = Resolution::new(self, scope).dispatch(descriptor)?;
                downcast::<C>(descriptor, &instance)
            })
    }
}

fn downcast<C: ?Sized + Contract>(descriptor: &Descriptor, instance: &Instance) -> DiResult<Arc<C>> {
    restore::<C>(instance).ok_or_else(|| DiError::ContractMismatch {
        key: descriptor.key().to_string(),
        expected: type_name::<C>(),
    })
}

// ============================================================================
// Resolution
// ============================================================================

/// One resolution walk. `path` holds the descriptors whose constructors are
/// currently waiting on their dependencies.
pub(crate) struct Resolution<'a> {
    container: &'a Container,
    scope: &'a ScopeState,
    path: Vec<&'a Descriptor>,
}

impl<'a> Resolution<'a> {
    pub(crate) fn new(container: &'a Container, scope: &'a ScopeState) -> Self {
        Self {
            container,
            scope,
            path: Vec::new(),
        }
    }

    /// Produce an instance for `descriptor` according to its lifecycle
    pub(crate) fn dispatch(&mut self, descriptor: &'a Descriptor) -> DiResult<Instance> {
        trace!(
            key = descriptor.key(),
            lifecycle = %descriptor.lifecycle(),
            scope = self.scope.id(),
            "Resolving service"
        );

        match descriptor.lifecycle() {
            Lifecycle::Transient => self.construct(descriptor),
            Lifecycle::Singleton => {
                let slot = descriptor.singleton_slot();
                if let Some(instance) = slot.get() {
                    return Ok(Arc::clone(instance));
                }
                // must run before the cell is entered; re-entering it would block
                self.guard(descriptor)?;
                slot.get_or_try_init(|| self.construct(descriptor)).cloned()
            }
            Lifecycle::Scoped => {
                let slot = self.scope.slot(descriptor.key());
                if let Some(instance) = slot.get() {
                    return Ok(Arc::clone(instance));
                }
                self.guard(descriptor)?;
                slot.get_or_try_init(|| self.construct(descriptor)).cloned()
            }
        }
    }

    fn resolve_dependency(&mut self, dependency: TypeKey) -> DiResult<Instance> {
        let registry = self.container.registry();
        let descriptor = registry
            .first_for(dependency.id())
            .ok_or_else(|| DiError::not_found(dependency.short_name()))?;
        self.dispatch(descriptor)
    }

    fn construct(&mut self, descriptor: &'a Descriptor) -> DiResult<Instance> {
        let constructor = match descriptor.activator() {
            Activator::Instance(instance) => return Ok(Arc::clone(instance)),
            Activator::Factory(factory) => return Ok(factory()),
            Activator::Constructor(constructor) => *constructor,
        };

        self.guard(descriptor)?;
        self.path.push(descriptor);
        let arguments = descriptor
            .dependencies()
            .iter()
            .map(|dependency| self.resolve_dependency(*dependency))
            .collect::<DiResult<Vec<_>>>();
        self.path.pop();

        let implementation = descriptor.implementation().name();
        trace!(implementation, "Constructing service");
        constructor(Arguments::new(implementation, arguments?))
            .map_err(|source| DiError::ConstructionFailure {
                implementation,
                source,
            })
    }

    /// Reject a constructor call that would revisit a type on the current path
    fn guard(&self, descriptor: &Descriptor) -> DiResult<()> {
        if !matches!(descriptor.activator(), Activator::Constructor(_)) {
            return Ok(());
        }

        let implementation = descriptor.implementation();
        if self.path.iter().any(|d| d.implementation() == implementation) {
            let path = self
                .path
                .iter()
                .map(|d| d.implementation().short_name())
                .chain(iter::once(implementation.short_name()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DiError::CircularDependency { path });
        }

        let limit = self.container.options().max_depth;
        if self.path.len() >= limit {
            return Err(DiError::DepthLimitExceeded {
                limit,
                requested: implementation.short_name(),
            });
        }

        Ok(())
    }
}
