//! Scope handles for scoped lifetime resolution
//!
//! A scope is a nested lifetime boundary with its own cache of scoped
//! instances. Scopes are explicit values: resolving through a [`Scope`] uses
//! that scope's cache and nothing else, so there is no shared "current scope"
//! for callers to trip over.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::debug;

use crate::container::Container;
use crate::error::DiResult;
use crate::injectable::{Contract, Instance};

/// Per-scope cache. Each key gets its own cell so a scoped instance is
/// constructed at most once per scope.
#[derive(Debug)]
pub(crate) struct ScopeState {
    id: u64,
    depth: usize,
    outer: Option<Arc<ScopeState>>,
    cache: Mutex<HashMap<String, Arc<OnceCell<Instance>>>>,
}

impl ScopeState {
    pub(crate) fn root(id: u64) -> Self {
        Self {
            id,
            depth: 0,
            outer: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn nested(id: u64, outer: Arc<ScopeState>) -> Self {
        Self {
            id,
            depth: outer.depth + 1,
            outer: Some(outer),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Cache cell for a registration key, created empty on first use
    pub(crate) fn slot(&self, key: &str) -> Arc<OnceCell<Instance>> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(slot) => Arc::clone(slot),
            None => {
                let slot = Arc::new(OnceCell::new());
                cache.insert(key.to_string(), Arc::clone(&slot));
                slot
            }
        }
    }

    pub(crate) fn cached_count(&self) -> usize {
        self.cache
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub(crate) fn clear(&self) {
        self.cache.lock().clear();
    }
}

/// A live scope begun from a [`Container`] or from another scope.
///
/// Scoped services are created once per scope and shared within it. Dropping
/// the handle (or calling [`Scope::dispose`]) releases the scope's cache; the
/// scope it was begun from is unaffected and keeps its own instances.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wiring_di::{injectable, ContainerBuilder};
///
/// #[derive(Default)]
/// struct RequestContext;
/// injectable!(RequestContext => RequestContext::default);
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_scoped::<RequestContext>().unwrap();
/// let container = builder.build().unwrap();
///
/// let scope = container.begin_scope();
/// let ctx1 = scope.resolve::<RequestContext>().unwrap();
/// let ctx2 = scope.resolve::<RequestContext>().unwrap();
/// assert!(Arc::ptr_eq(&ctx1, &ctx2));
/// ```
pub struct Scope<'c> {
    container: &'c Container,
    state: Arc<ScopeState>,
}

impl<'c> Scope<'c> {
    pub(crate) fn begin(container: &'c Container, outer: Arc<ScopeState>) -> Self {
        let state = Arc::new(ScopeState::nested(container.allocate_scope_id(), outer));
        debug!(
            scope = state.id,
            outer = state.outer.as_ref().map(|o| o.id),
            depth = state.depth,
            "Began scope"
        );
        Self { container, state }
    }

    /// Identifier of this scope, unique for the container's lifetime
    pub fn id(&self) -> u64 {
        self.state.id
    }

    /// Identifier of the scope this one was begun from
    pub fn outer_id(&self) -> Option<u64> {
        self.state.outer.as_ref().map(|outer| outer.id)
    }

    /// Nesting depth; scopes begun from the container are at depth 1
    pub fn depth(&self) -> usize {
        self.state.depth
    }

    /// Begin a scope nested inside this one
    pub fn begin_scope(&self) -> Scope<'c> {
        Scope::begin(self.container, Arc::clone(&self.state))
    }

    /// Resolve the first registration for contract `C` within this scope
    pub fn resolve<C: ?Sized + Contract>(&self) -> DiResult<Arc<C>> {
        self.container.resolve_in::<C>(&self.state)
    }

    /// Resolve the registration stored under `name` within this scope
    pub fn resolve_named<C: ?Sized + Contract>(&self, name: &str) -> DiResult<Arc<C>> {
        self.container.resolve_named_in::<C>(&self.state, name)
    }

    /// Like [`Scope::resolve`], but `Ok(None)` when nothing is registered
    pub fn try_resolve<C: ?Sized + Contract>(&self) -> DiResult<Option<Arc<C>>> {
        self.container.try_resolve_in::<C>(&self.state)
    }

    /// Lazily resolve every registration for contract `C` within this scope
    pub fn resolve_all<C: ?Sized + Contract>(
        &self,
    ) -> impl Iterator<Item = DiResult<Arc<C>>> + '_ {
        self.container.resolve_all_in::<C>(&self.state)
    }

    /// Number of scoped instances created in this scope
    pub fn cached_instance_count(&self) -> usize {
        self.state.cached_count()
    }

    /// End the scope, releasing its scoped instances.
    ///
    /// Same as dropping the handle; the release happens in the `Drop` impl.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let released = self.state.cached_count();
        self.state.clear();
        debug!(scope = self.state.id, released, "Disposed scope");
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.state.id)
            .field("outer", &self.outer_id())
            .field("depth", &self.state.depth)
            .finish()
    }
}
