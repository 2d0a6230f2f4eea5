//! # Container Usage Guide
//!
//! ## Declaring Constructors
//!
//! The container never inspects types at runtime. Each implementation states
//! its constructor and the contracts it consumes with [`injectable!`], and
//! each trait-object contract it satisfies with [`implements!`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring_di::{implements, injectable};
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Default)]
//! pub struct SystemClock;
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 { 0 }
//! }
//!
//! pub struct AuditLog {
//!     clock: Arc<dyn Clock>,
//! }
//! impl AuditLog {
//!     pub fn new(clock: Arc<dyn Clock>) -> Self { Self { clock } }
//! }
//!
//! injectable!(SystemClock => SystemClock::default);
//! implements!(SystemClock => dyn Clock);
//! injectable!(AuditLog => AuditLog::new, [dyn Clock]);
//! ```
//!
//! Types whose constructor can fail implement [`Injectable`](crate::Injectable)
//! by hand and return the error from `construct`; it surfaces as
//! [`DiError::ConstructionFailure`](crate::DiError::ConstructionFailure).
//!
//! ## Lifecycles
//!
//! | Lifecycle   | Instances                                  |
//! |-------------|--------------------------------------------|
//! | `Transient` | a new one per resolution                   |
//! | `Singleton` | one per container                          |
//! | `Scoped`    | one per scope, the root scope included     |
//!
//! ## Several Implementations of One Contract
//!
//! Each registration gets a key: the type name for self-bound types, the
//! contract name followed by the implementation name otherwise. `resolve`
//! returns the first registration for a contract, `resolve_named` looks up a
//! key, and `resolve_all` lazily yields every registration in order:
//!
//! ```rust
//! use wiring_di::{implements, injectable, ContainerBuilder};
//!
//! trait Sink: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! #[derive(Default)]
//! struct Console;
//! impl Sink for Console {
//!     fn name(&self) -> &'static str { "console" }
//! }
//!
//! #[derive(Default)]
//! struct Syslog;
//! impl Sink for Syslog {
//!     fn name(&self) -> &'static str { "syslog" }
//! }
//!
//! injectable!(Console => Console::default);
//! injectable!(Syslog => Syslog::default);
//! implements!(Console => dyn Sink);
//! implements!(Syslog => dyn Sink);
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .register_transient_as::<dyn Sink, Console>()?
//!     .register_singleton_as::<dyn Sink, Syslog>()?;
//! let container = builder.build()?;
//!
//! assert_eq!(container.resolve::<dyn Sink>()?.name(), "console");
//! assert_eq!(container.resolve_named::<dyn Sink>("SinkSyslog")?.name(), "syslog");
//!
//! let names = container
//!     .resolve_all::<dyn Sink>()
//!     .map(|sink| sink.map(|s| s.name()))
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(names, vec!["console", "syslog"]);
//! # Ok::<(), wiring_di::DiError>(())
//! ```
//!
//! Registering the same key twice fails with
//! [`DiError::RegistrationConflict`](crate::DiError::RegistrationConflict);
//! give the second registration an explicit name with
//! [`Descriptor::named`](crate::Descriptor::named).
//!
//! ## Scopes
//!
//! Scopes are values. Resolve through the handle, and drop it (or call
//! `dispose`) to release its scoped instances:
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring_di::{injectable, ContainerBuilder};
//!
//! #[derive(Default)]
//! struct Request;
//! injectable!(Request => Request::default);
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_scoped::<Request>()?;
//! let container = builder.build()?;
//!
//! let outer = container.begin_scope();
//! let first = outer.resolve::<Request>()?;
//! {
//!     let inner = outer.begin_scope();
//!     assert!(!Arc::ptr_eq(&first, &inner.resolve::<Request>()?));
//! }
//! assert!(Arc::ptr_eq(&first, &outer.resolve::<Request>()?));
//! outer.dispose();
//! # Ok::<(), wiring_di::DiError>(())
//! ```
//!
//! ## Factories and Pre-built Values
//!
//! A factory replaces constructor injection entirely, so the implementation
//! needs no `injectable!` declaration:
//!
//! ```rust
//! use wiring_di::{ContainerBuilder, Lifecycle};
//!
//! struct Settings {
//!     retries: u32,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_factory::<Settings, _, _>(Lifecycle::Singleton, || Settings { retries: 3 })?;
//! builder.register_instance(String::from("production"))?;
//! let container = builder.build()?;
//!
//! assert_eq!(container.resolve::<Settings>()?.retries, 3);
//! assert_eq!(container.resolve::<String>()?.as_str(), "production");
//! # Ok::<(), wiring_di::DiError>(())
//! ```
//!
//! ## Validation
//!
//! `build()` test-resolves every registration that has constructor
//! dependencies and reports all failures at once:
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring_di::{injectable, ContainerBuilder, DiError};
//!
//! struct A(Arc<B>);
//! struct B(Arc<A>);
//! injectable!(A => A, [B]);
//! injectable!(B => B, [A]);
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_transient::<A>()?.register_transient::<B>()?;
//!
//! match builder.build() {
//!     Err(DiError::InvalidConfiguration(err)) => assert_eq!(err.len(), 2),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # Ok::<(), wiring_di::DiError>(())
//! ```
//!
//! Validation can be turned off through [`ContainerOptions`](crate::ContainerOptions),
//! loaded from TOML and `WIRING_*` environment variables:
//!
//! ```rust
//! use wiring_di::{ContainerBuilder, ContainerOptions};
//!
//! let options = ContainerOptions::from_toml_str("validate_on_build = false")?;
//! let builder = ContainerBuilder::with_options(options);
//! assert!(!builder.options().validate_on_build);
//! # Ok::<(), wiring_di::DiError>(())
//! ```
//!
//! ## Best Practices
//!
//! 1. **Register everything at startup** and let `build()` report problems
//! 2. **Depend on trait objects** so implementations can be swapped
//! 3. **Keep one scope per unit of work** and drop it when the work ends
//! 4. **Group related registrations** in a [`ServiceProvider`](crate::ServiceProvider)
//!
//! [`injectable!`]: crate::injectable
//! [`implements!`]: crate::implements
