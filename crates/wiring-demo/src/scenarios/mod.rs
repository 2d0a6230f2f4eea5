//! Scenario implementations

pub mod cycle;
pub mod tree;
pub mod writers;

use clap::Subcommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Scenario {
    /// Resolve three writers registered transient, singleton and scoped
    Writers,

    /// Resolve a factory-backed dependency tree several times
    Tree {
        /// Number of resolutions
        #[arg(short = 'n', long, default_value = "5")]
        iterations: usize,
    },

    /// Show build() catching a dependency cycle
    Cycle,
}

impl Scenario {
    /// Every scenario with its default arguments
    pub fn all() -> [Scenario; 3] {
        [
            Scenario::Writers,
            Scenario::Tree { iterations: 5 },
            Scenario::Cycle,
        ]
    }
}
