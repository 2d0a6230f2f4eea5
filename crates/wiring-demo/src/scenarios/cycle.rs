//! Mutually dependent types rejected by `build()`

use std::sync::Arc;

use anyhow::bail;
use serde::Serialize;
use tracing::warn;
use wiring_di::{injectable, ContainerBuilder, DiError};

pub struct A {
    _b: Arc<B>,
}

pub struct B {
    _a: Arc<A>,
}

pub struct C {
    _a: Arc<A>,
    _b: Arc<B>,
}

impl A {
    pub fn new(b: Arc<B>) -> Self {
        Self { _b: b }
    }
}

impl B {
    pub fn new(a: Arc<A>) -> Self {
        Self { _a: a }
    }
}

impl C {
    pub fn new(a: Arc<A>, b: Arc<B>) -> Self {
        Self { _a: a, _b: b }
    }
}

injectable!(A => A::new, [B]);
injectable!(B => B::new, [A]);
injectable!(C => C::new, [A, B]);

#[derive(Debug, Clone, Serialize)]
pub struct CycleFailure {
    pub key: String,
    pub contract: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub failures: Vec<CycleFailure>,
    pub message: String,
}

pub fn run() -> anyhow::Result<CycleReport> {
    // validation stays on even when the environment disables it
    let options = crate::configured_builder()?
        .options()
        .clone()
        .with_validation(true);
    let mut builder = ContainerBuilder::with_options(options);
    builder
        .register_transient::<A>()?
        .register_transient::<B>()?
        .register_transient::<C>()?;

    let err = match builder.build() {
        Err(DiError::InvalidConfiguration(err)) => err,
        Err(other) => return Err(other.into()),
        Ok(_) => bail!("build() accepted a cyclic registration"),
    };

    let failures = err
        .failures()
        .iter()
        .map(|failure| {
            warn!(key = %failure.key, "Unresolvable registration");
            CycleFailure {
                key: failure.key.clone(),
                contract: failure.contract.clone(),
                reason: failure.error.to_string(),
            }
        })
        .collect();

    Ok(CycleReport {
        failures,
        message: err.to_string(),
    })
}
