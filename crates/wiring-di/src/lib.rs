//! Dependency Injection Container
//!
//! This crate resolves object graphs from registrations: each registration
//! binds a contract (usually a trait object) to an implementation with a
//! lifecycle, and the container builds implementations by resolving their
//! constructor dependencies recursively.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring_di::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! injectable!(English => English::default);
//! implements!(English => dyn Greeter);
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_singleton_as::<dyn Greeter, English>()?;
//! let container = builder.build()?;
//!
//! let greeter: Arc<dyn Greeter> = container.resolve::<dyn Greeter>()?;
//! assert_eq!(greeter.greet(), "hello");
//! # Ok::<(), DiError>(())
//! ```
//!
//! See [`usage`] module for detailed usage examples.

pub mod container;
pub mod descriptor;
pub mod error;
pub mod injectable;
pub mod lifecycle;
pub mod options;
pub mod provider;
pub mod registry;
pub mod scope;
pub mod usage;
pub mod validation;

pub use container::{Container, ContainerBuilder};
pub use descriptor::Descriptor;
pub use error::{BoxError, DiError, DiResult};
pub use injectable::{Arguments, Contract, Implements, Injectable, TypeKey};
pub use lifecycle::Lifecycle;
pub use options::ContainerOptions;
pub use provider::{ProviderRegistry, ServiceProvider};
pub use registry::Registry;
pub use scope::Scope;
pub use validation::{
    ConfigurationError, ValidationEntry, ValidationFailure, ValidationOutcome, ValidationReport,
};

/// Commonly used items for registering and resolving services
pub mod prelude {
    pub use crate::{
        implements, injectable, Container, ContainerBuilder, Descriptor, DiError, DiResult,
        Implements, Injectable, Lifecycle, Scope, ServiceProvider,
    };
}
