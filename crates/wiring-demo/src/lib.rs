//! Demo scenarios for the wiring container
//!
//! Each scenario builds its own container, exercises one part of the engine
//! and returns a serializable report:
//!
//! - [`scenarios::writers`]: one contract with transient, singleton and scoped
//!   implementations, resolved together across a scope boundary
//! - [`scenarios::tree`]: a small dependency tree whose leaf comes from a factory
//! - [`scenarios::cycle`]: mutually dependent types caught by `build()`

pub mod report;
pub mod scenarios;

use anyhow::Context;
use wiring_di::{ContainerBuilder, ContainerOptions};

pub use report::{OutputFormat, ScenarioReport};
pub use scenarios::Scenario;

/// Builder configured from `WIRING_*` environment variables
pub fn configured_builder() -> anyhow::Result<ContainerBuilder> {
    let options = ContainerOptions::load(None).context("failed to load container options")?;
    Ok(ContainerBuilder::with_options(options))
}

/// Run one scenario
pub fn run(scenario: Scenario) -> anyhow::Result<ScenarioReport> {
    let report = match scenario {
        Scenario::Writers => ScenarioReport::Writers(scenarios::writers::run()?),
        Scenario::Tree { iterations } => ScenarioReport::Tree(scenarios::tree::run(iterations)?),
        Scenario::Cycle => ScenarioReport::Cycle(scenarios::cycle::run()?),
    };
    Ok(report)
}
