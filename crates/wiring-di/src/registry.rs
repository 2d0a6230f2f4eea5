//! Insertion-ordered descriptor storage

use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::descriptor::Descriptor;
use crate::error::{DiError, DiResult};

/// Registration key to descriptor mapping.
///
/// Keys are unique. Descriptors keep their registration order, which is the
/// order `resolve_all` yields them in.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
    by_key: HashMap<String, usize>,
    by_contract: HashMap<TypeId, Vec<usize>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, rejecting duplicate keys
    pub fn insert(&mut self, descriptor: Descriptor) -> DiResult<()> {
        if self.by_key.contains_key(descriptor.key()) {
            return Err(DiError::RegistrationConflict {
                key: descriptor.key().to_string(),
            });
        }

        let index = self.descriptors.len();
        self.by_key.insert(descriptor.key().to_string(), index);
        self.by_contract
            .entry(descriptor.contract().id())
            .or_default()
            .push(index);

        debug!(
            key = descriptor.key(),
            contract = descriptor.contract().name(),
            lifecycle = %descriptor.lifecycle(),
            "Registered service"
        );
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor registered under `key`
    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.by_key.get(key).map(|&index| &self.descriptors[index])
    }

    /// First descriptor registered for a contract
    pub fn first_for(&self, contract: TypeId) -> Option<&Descriptor> {
        self.all_for(contract).next()
    }

    /// Every descriptor registered for a contract, in registration order
    pub fn all_for(&self, contract: TypeId) -> impl Iterator<Item = &Descriptor> + '_ {
        self.by_contract
            .get(&contract)
            .into_iter()
            .flatten()
            .map(move |&index| &self.descriptors[index])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn contains_contract(&self, contract: TypeId) -> bool {
        self.by_contract.contains_key(&contract)
    }

    /// All descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;

    trait Sink: Send + Sync {}

    struct Console;
    struct Syslog;
    impl Sink for Console {}
    impl Sink for Syslog {}

    crate::implements!(Console => dyn Sink);
    crate::implements!(Syslog => dyn Sink);
    crate::injectable!(Console => Console::default);
    crate::injectable!(Syslog => Syslog::default);

    impl Default for Console {
        fn default() -> Self {
            Console
        }
    }

    impl Default for Syslog {
        fn default() -> Self {
            Syslog
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry
            .insert(Descriptor::bind::<dyn Sink, Console>(Lifecycle::Transient))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains_key("SinkConsole"));
        assert!(registry.contains_contract(TypeId::of::<dyn Sink>()));
        assert_eq!(registry.get("SinkConsole").map(|d| d.lifecycle()), Some(Lifecycle::Transient));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = Registry::new();
        registry
            .insert(Descriptor::bind::<dyn Sink, Console>(Lifecycle::Transient))
            .unwrap();

        let result = registry.insert(Descriptor::bind::<dyn Sink, Console>(Lifecycle::Singleton));
        assert!(matches!(
            result,
            Err(DiError::RegistrationConflict { ref key }) if key == "SinkConsole"
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("SinkConsole").map(|d| d.lifecycle()), Some(Lifecycle::Transient));
    }

    #[test]
    fn test_all_for_keeps_registration_order() {
        let mut registry = Registry::new();
        registry
            .insert(Descriptor::bind::<dyn Sink, Syslog>(Lifecycle::Singleton))
            .unwrap();
        registry
            .insert(Descriptor::bind::<dyn Sink, Console>(Lifecycle::Transient))
            .unwrap();
        registry
            .insert(Descriptor::bind::<dyn Sink, Console>(Lifecycle::Scoped).named("console-scoped"))
            .unwrap();

        let keys: Vec<_> = registry
            .all_for(TypeId::of::<dyn Sink>())
            .map(|d| d.key().to_string())
            .collect();
        assert_eq!(keys, vec!["SinkSyslog", "SinkConsole", "console-scoped"]);
        assert_eq!(
            registry.first_for(TypeId::of::<dyn Sink>()).map(|d| d.key()),
            Some("SinkSyslog")
        );
        assert!(registry.first_for(TypeId::of::<Console>()).is_none());
    }
}
