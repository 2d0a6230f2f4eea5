//! Container options

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::DiResult;

/// Tunables for building and resolving a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// Run the dependency validator when the container is built
    pub validate_on_build: bool,

    /// Longest constructor chain a single resolution may walk
    pub max_depth: usize,
}

impl ContainerOptions {
    /// Prefix for environment overrides, e.g. `WIRING_MAX_DEPTH=32`
    pub const ENV_PREFIX: &'static str = "WIRING";

    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(toml: &str) -> DiResult<Self> {
        let options = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(options)
    }

    /// Layer defaults, an optional TOML document and `WIRING_*` environment
    /// variables, in that order
    pub fn load(toml: Option<&str>) -> DiResult<Self> {
        let mut builder = Config::builder();
        if let Some(toml) = toml {
            builder = builder.add_source(File::from_str(toml, FileFormat::Toml));
        }

        let options = builder
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(options)
    }

    pub fn with_validation(mut self, validate_on_build: bool) -> Self {
        self.validate_on_build = validate_on_build;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            validate_on_build: true,
            max_depth: 64,
        }
    }
}
