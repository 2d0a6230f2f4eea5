//! Service Provider trait for grouping registrations
//!
//! A `ServiceProvider` bundles the registrations of one module so hosts can
//! compose a container from several modules without knowing their contents.
//!
//! ## Usage
//!
//! ```rust
//! use wiring_di::{injectable, ContainerBuilder, DiResult, ProviderRegistry, ServiceProvider};
//!
//! #[derive(Default)]
//! struct StorageManager;
//! injectable!(StorageManager => StorageManager::default);
//!
//! struct StorageServiceProvider;
//!
//! impl ServiceProvider for StorageServiceProvider {
//!     fn name(&self) -> &'static str {
//!         "storage"
//!     }
//!
//!     fn register(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
//!         builder.register_singleton::<StorageManager>()?;
//!         Ok(())
//!     }
//! }
//!
//! let mut providers = ProviderRegistry::new();
//! providers.add(StorageServiceProvider);
//!
//! let mut builder = ContainerBuilder::new();
//! providers.register_all(&mut builder)?;
//! let container = builder.build()?;
//! assert!(container.is_registered::<StorageManager>());
//! # Ok::<(), wiring_di::DiError>(())
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::container::ContainerBuilder;
use crate::error::DiResult;

// ============================================================================
// ServiceProvider Trait
// ============================================================================

/// Trait for types that register a group of services with a builder.
pub trait ServiceProvider: Send + Sync {
    /// Returns the name of this service provider.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Returns the priority of this service provider.
    ///
    /// Lower values are registered first. Default is 100.
    fn priority(&self) -> u32 {
        100
    }

    /// Register services with the builder.
    fn register(&self, builder: &mut ContainerBuilder) -> DiResult<()>;
}

// ============================================================================
// ProviderRegistry
// ============================================================================

/// Collects service providers and applies them in priority order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service provider to the registry.
    pub fn add<P: ServiceProvider + 'static>(&mut self, provider: P) -> &mut Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Add a shared service provider to the registry.
    pub fn add_shared(&mut self, provider: Arc<dyn ServiceProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in the order they will be applied.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.sorted().iter().map(|p| p.name()).collect()
    }

    /// Apply every provider to the builder.
    ///
    /// Providers run by ascending priority; ties keep insertion order. The
    /// first registration error stops the run.
    pub fn register_all(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
        let sorted = self.sorted();
        info!(providers = sorted.len(), "Registering service providers");

        for provider in sorted {
            debug!(
                provider = provider.name(),
                priority = provider.priority(),
                "Applying provider"
            );
            builder.add_provider(provider.as_ref())?;
        }

        Ok(())
    }

    fn sorted(&self) -> Vec<&Arc<dyn ServiceProvider>> {
        let mut sorted: Vec<_> = self.providers.iter().collect();
        // stable sort keeps insertion order for equal priorities
        sorted.sort_by_key(|p| p.priority());
        sorted
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;

    #[derive(Default)]
    struct Marker;
    crate::injectable!(Marker => Marker::default);

    struct TestProvider {
        name: &'static str,
        priority: u32,
    }

    impl ServiceProvider for TestProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn register(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
            builder.register(
                crate::Descriptor::new::<Marker>(crate::Lifecycle::Transient).named(self.name),
            )?;
            Ok(())
        }
    }

    struct MarkerProvider;

    impl ServiceProvider for MarkerProvider {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn register(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
            builder.register_transient::<Marker>()?;
            Ok(())
        }
    }

    #[test]
    fn test_provider_registry() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());

        registry
            .add(TestProvider {
                name: "test1",
                priority: 100,
            })
            .add(TestProvider {
                name: "test2",
                priority: 50,
            });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.provider_names(), vec!["test2", "test1"]);
    }

    #[test]
    fn test_register_all() {
        let mut registry = ProviderRegistry::new();
        registry.add(MarkerProvider);

        let mut builder = ContainerBuilder::new();
        registry.register_all(&mut builder).unwrap();
        assert_eq!(builder.len(), 1);

        let container = builder.build().unwrap();
        assert!(container.resolve::<Marker>().is_ok());
    }

    #[test]
    fn test_priority_ordering_is_stable() {
        let mut registry = ProviderRegistry::new();
        registry
            .add(TestProvider {
                name: "low",
                priority: 200,
            })
            .add(TestProvider {
                name: "high",
                priority: 10,
            })
            .add(TestProvider {
                name: "medium-a",
                priority: 100,
            })
            .add(MarkerProvider)
            .add(TestProvider {
                name: "medium-b",
                priority: 100,
            });

        assert_eq!(
            registry.provider_names(),
            vec!["high", "medium-a", "marker", "medium-b", "low"]
        );

        let mut builder = ContainerBuilder::new();
        registry.register_all(&mut builder).unwrap();
        let container = builder.build().unwrap();
        let keys: Vec<_> = container.descriptors().map(|d| d.key().to_string()).collect();
        assert_eq!(keys, vec!["high", "medium-a", "Marker", "medium-b", "low"]);
    }

    #[test]
    fn test_registration_errors_propagate() {
        let mut registry = ProviderRegistry::new();
        registry.add(MarkerProvider).add_shared(Arc::new(MarkerProvider));

        let mut builder = ContainerBuilder::new();
        let result = registry.register_all(&mut builder);
        assert!(matches!(
            result,
            Err(DiError::RegistrationConflict { ref key }) if key == "Marker"
        ));
    }
}
