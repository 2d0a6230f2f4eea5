//! A three-level dependency tree with a factory-built leaf

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use wiring_di::{implements, injectable, Lifecycle};

pub trait Dependency1: Send + Sync {
    /// Ids seen by this tree, leaf first
    fn check_dependency_tree(&self) -> TreeLine;
}

pub trait Dependency2: Send + Sync {
    fn id(&self) -> Uuid;
}

pub trait Dependency3: Send + Sync {
    fn id(&self) -> Uuid;
}

pub struct Dependency1Impl {
    dependency2: Arc<dyn Dependency2>,
    dependency3: Arc<dyn Dependency3>,
}

impl Dependency1Impl {
    pub fn new(dependency2: Arc<dyn Dependency2>, dependency3: Arc<dyn Dependency3>) -> Self {
        Self {
            dependency2,
            dependency3,
        }
    }
}

impl Dependency1 for Dependency1Impl {
    fn check_dependency_tree(&self) -> TreeLine {
        TreeLine {
            dependency3: self.dependency3.id(),
            dependency2: self.dependency2.id(),
        }
    }
}

/// Reports the id of its own leaf
pub struct Dependency2Impl {
    dependency3: Arc<dyn Dependency3>,
}

impl Dependency2Impl {
    pub fn new(dependency3: Arc<dyn Dependency3>) -> Self {
        Self { dependency3 }
    }
}

impl Dependency2 for Dependency2Impl {
    fn id(&self) -> Uuid {
        self.dependency3.id()
    }
}

pub struct Dependency3Impl {
    id: Uuid,
}

impl Dependency3Impl {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Dependency3 for Dependency3Impl {
    fn id(&self) -> Uuid {
        self.id
    }
}

injectable!(Dependency1Impl => Dependency1Impl::new, [dyn Dependency2, dyn Dependency3]);
injectable!(Dependency2Impl => Dependency2Impl::new, [dyn Dependency3]);
implements!(Dependency1Impl => dyn Dependency1);
implements!(Dependency2Impl => dyn Dependency2);
implements!(Dependency3Impl => dyn Dependency3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeLine {
    pub dependency3: Uuid,
    pub dependency2: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub validated: bool,
    pub resolutions: Vec<TreeLine>,
}

pub fn run(iterations: usize) -> anyhow::Result<TreeReport> {
    let mut builder = crate::configured_builder()?;
    let validated = builder.options().validate_on_build;
    builder
        .register_transient_as::<dyn Dependency1, Dependency1Impl>()?
        .register_transient_as::<dyn Dependency2, Dependency2Impl>()?
        .register_factory::<dyn Dependency3, _, _>(Lifecycle::Transient, || {
            Dependency3Impl::new(Uuid::new_v4())
        })?;
    let container = builder.build()?;

    let mut resolutions = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let line = container.resolve::<dyn Dependency1>()?.check_dependency_tree();
        debug!(dependency3 = %line.dependency3, dependency2 = %line.dependency2, "Resolved tree");
        resolutions.push(line);
    }

    Ok(TreeReport {
        validated,
        resolutions,
    })
}
