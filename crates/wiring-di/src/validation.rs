//! Build-time dependency validation
//!
//! Every registration whose constructor declares dependencies is
//! test-resolved on its own, starting from an empty resolution path, in the
//! container's root scope. Whatever the pass constructs stays cached there, so
//! later resolutions see the same instances they would have without it.
//! Cycles, missing registrations and failing constructors are collected rather
//! than reported one at a time.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::container::{Container, Resolution};
use crate::descriptor::Descriptor;
use crate::error::{DiError, DiResult};
use crate::scope::ScopeState;

/// Result of test-resolving one registration
#[derive(Debug)]
pub enum ValidationOutcome {
    /// No constructor dependencies, or a factory/pre-built value
    Skipped,
    Passed,
    Failed(DiError),
}

impl ValidationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct ValidationEntry {
    pub key: String,
    pub contract: String,
    pub outcome: ValidationOutcome,
}

/// One registration that could not be resolved
#[derive(Debug)]
pub struct ValidationFailure {
    pub key: String,
    pub contract: String,
    pub error: DiError,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not resolve {} ({}): {}",
            self.contract, self.key, self.error
        )
    }
}

/// Aggregate of every failure found while validating a container
#[derive(Debug, Error)]
#[error("{}", render(.failures))]
pub struct ConfigurationError {
    failures: Vec<ValidationFailure>,
}

impl ConfigurationError {
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Registration keys that failed, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.failures.iter().map(|failure| failure.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

fn render(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-registration outcomes of a validation pass
#[derive(Debug, Default)]
pub struct ValidationReport {
    entries: Vec<ValidationEntry>,
}

impl ValidationReport {
    pub fn entries(&self) -> &[ValidationEntry] {
        &self.entries
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationEntry> + '_ {
        self.entries.iter().filter(|entry| entry.outcome.is_failed())
    }

    /// Number of registrations that resolved successfully
    pub fn passed(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, ValidationOutcome::Passed))
            .count()
    }

    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }

    /// `Ok` if nothing failed, otherwise every failure as one [`DiError::InvalidConfiguration`]
    pub fn into_result(self) -> DiResult<()> {
        let failures: Vec<_> = self
            .entries
            .into_iter()
            .filter_map(|entry| match entry.outcome {
                ValidationOutcome::Failed(error) => Some(ValidationFailure {
                    key: entry.key,
                    contract: entry.contract,
                    error,
                }),
                _ => None,
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError { failures }.into())
        }
    }
}

pub(crate) fn validate(container: &Container) -> ValidationReport {
    let root = container.root_state();
    let entries = container
        .descriptors()
        .map(|descriptor| ValidationEntry {
            key: descriptor.key().to_string(),
            contract: descriptor.contract().short_name(),
            outcome: check(container, root, descriptor),
        })
        .collect();

    let report = ValidationReport { entries };
    debug!(
        checked = report.entries.len(),
        passed = report.passed(),
        "Validated registrations"
    );
    report
}

fn check(container: &Container, root: &ScopeState, descriptor: &Descriptor) -> ValidationOutcome {
    if descriptor.dependencies().is_empty() || descriptor.has_factory() || descriptor.is_prebuilt() {
        return ValidationOutcome::Skipped;
    }

    match Resolution::new(container, root).dispatch(descriptor) {
        Ok(_) => ValidationOutcome::Passed,
        Err(error) => {
            warn!(key = descriptor.key(), %error, "Registration failed validation");
            ValidationOutcome::Failed(error)
        }
    }
}
