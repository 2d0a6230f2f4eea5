//! Tests for build-time validation and cycle detection
use std::sync::Arc;

use wiring_di::*;

#[derive(Debug)]
struct A {
    _b: Arc<B>,
}
#[derive(Debug)]
struct B {
    _a: Arc<A>,
}
#[derive(Debug)]
struct C {
    _a: Arc<A>,
    _b: Arc<B>,
}

impl A {
    fn new(b: Arc<B>) -> Self {
        Self { _b: b }
    }
}

impl B {
    fn new(a: Arc<A>) -> Self {
        Self { _a: a }
    }
}

impl C {
    fn new(a: Arc<A>, b: Arc<B>) -> Self {
        Self { _a: a, _b: b }
    }
}

injectable!(A => A::new, [B]);
injectable!(B => B::new, [A]);
injectable!(C => C::new, [A, B]);

fn cyclic_builder() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder
        .register_transient::<A>()
        .unwrap()
        .register_transient::<B>()
        .unwrap()
        .register_transient::<C>()
        .unwrap();
    builder
}

fn configuration_error(result: DiResult<Container>) -> ConfigurationError {
    match result {
        Err(DiError::InvalidConfiguration(err)) => err,
        Err(other) => panic!("expected configuration error, got {other}"),
        Ok(_) => panic!("expected build to fail"),
    }
}

#[test]
fn test_build_reports_every_cycle_member() {
    let err = configuration_error(cyclic_builder().build());

    assert_eq!(err.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert!(err.failures().iter().all(|f| f.error.is_circular()));

    let message = err.to_string();
    assert!(message.contains("Could not resolve A (A): Circular dependency detected: A -> B -> A"));
    assert!(message.contains("Could not resolve B (B): Circular dependency detected: B -> A -> B"));
    assert!(message.contains("Could not resolve C (C): Circular dependency detected: C -> A -> B -> A"));
    assert_eq!(message.lines().count(), 3);
}

#[test]
fn test_unvalidated_cycle_fails_at_resolve_time() {
    let container = cyclic_builder().build_unvalidated();

    let err = container.resolve::<A>().unwrap_err();
    assert!(err.is_circular());
    assert_eq!(err.to_string(), "Circular dependency detected: A -> B -> A");

    let err = container.begin_scope().resolve::<C>().unwrap_err();
    assert!(err.is_circular());
}

#[test]
fn test_singleton_cycle_does_not_hang() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_singleton::<A>()
        .unwrap()
        .register_scoped::<B>()
        .unwrap();
    let container = builder.build_unvalidated();

    assert!(container.resolve::<A>().unwrap_err().is_circular());
    assert!(container.resolve::<B>().unwrap_err().is_circular());
}

#[test]
fn test_validate_report_counts() {
    let container = cyclic_builder().build_unvalidated();
    let report = container.validate();

    assert!(!report.is_ok());
    assert_eq!(report.passed(), 0);
    assert_eq!(report.failures().count(), 3);
    assert_eq!(report.entries().len(), 3);
}

// ---------------------------------------------------------------------------
// Acyclic graphs
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Leaf;
struct Middle {
    _leaf: Arc<Leaf>,
}
struct Root {
    _middle: Arc<Middle>,
    _leaf: Arc<Leaf>,
}

impl Middle {
    fn new(leaf: Arc<Leaf>) -> Self {
        Self { _leaf: leaf }
    }
}

impl Root {
    fn new(middle: Arc<Middle>, leaf: Arc<Leaf>) -> Self {
        Self {
            _middle: middle,
            _leaf: leaf,
        }
    }
}

injectable!(Leaf => Leaf::default);
injectable!(Middle => Middle::new, [Leaf]);
injectable!(Root => Root::new, [Middle, Leaf]);

#[test]
fn test_diamond_is_not_a_cycle() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_singleton::<Leaf>()
        .unwrap()
        .register_transient::<Middle>()
        .unwrap()
        .register_transient::<Root>()
        .unwrap();
    let container = builder.build().unwrap();

    let report = container.validate();
    assert!(report.is_ok());
    assert_eq!(report.passed(), 2);
    assert!(container.resolve::<Root>().is_ok());
}

#[test]
fn test_validation_keeps_singletons() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_transient::<Leaf>()
        .unwrap()
        .register_singleton::<Middle>()
        .unwrap();
    let container = builder.build().unwrap();

    let middle = container.descriptors().find(|d| d.key() == "Middle").unwrap();
    assert!(middle.has_singleton());
}

fn singleton_over_scoped(validate: bool) -> Container {
    let mut builder = ContainerBuilder::with_options(ContainerOptions::default().with_validation(validate));
    builder
        .register_scoped::<Leaf>()
        .unwrap()
        .register_singleton::<Middle>()
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn test_validation_does_not_change_root_resolutions() {
    for validate in [false, true] {
        let container = singleton_over_scoped(validate);

        let middle = container.resolve::<Middle>().unwrap();
        let leaf = container.resolve::<Leaf>().unwrap();
        assert!(
            Arc::ptr_eq(&middle._leaf, &leaf),
            "root leaf should be the one held by the singleton (validate = {validate})"
        );

        let scope = container.begin_scope();
        assert!(!Arc::ptr_eq(&scope.resolve::<Leaf>().unwrap(), &leaf));
        assert!(Arc::ptr_eq(&scope.resolve::<Middle>().unwrap(), &middle));
    }
}

#[test]
fn test_factory_registrations_are_exempt() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_factory::<Middle, _, _>(Lifecycle::Transient, || Middle::new(Arc::new(Leaf)))
        .unwrap();
    let container = builder.build().unwrap();

    let report = container.validate();
    assert!(matches!(
        report.entries()[0].outcome,
        ValidationOutcome::Skipped
    ));
    assert!(container.resolve::<Middle>().is_ok());
}

#[test]
fn test_depth_limit() {
    let options = ContainerOptions::default().with_max_depth(2);
    let mut builder = ContainerBuilder::with_options(options);
    builder
        .register_transient::<Leaf>()
        .unwrap()
        .register_transient::<Middle>()
        .unwrap()
        .register_transient::<Root>()
        .unwrap();

    let err = configuration_error(builder.build());
    assert_eq!(err.keys().collect::<Vec<_>>(), vec!["Root"]);
    assert!(matches!(
        err.failures()[0].error,
        DiError::DepthLimitExceeded { limit: 2, .. }
    ));
}
