//! Scenario reports and their text/JSON rendering

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::scenarios::cycle::CycleReport;
use crate::scenarios::tree::TreeReport;
use crate::scenarios::writers::{WriterPass, WritersReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum ScenarioReport {
    Writers(WritersReport),
    Tree(TreeReport),
    Cycle(CycleReport),
}

impl ScenarioReport {
    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writers(report) => {
                write_pass(f, "root scope", &report.before)?;
                write_pass(f, "nested scope", &report.scoped)?;
                write_pass(f, "root scope after dispose", &report.after)
            }
            Self::Tree(report) => {
                if report.validated {
                    writeln!(f, "build() passed")?;
                }
                for line in &report.resolutions {
                    writeln!(f, "Dependency3: {}", line.dependency3)?;
                    writeln!(f, "Dependency2: {}", line.dependency2)?;
                }
                Ok(())
            }
            Self::Cycle(report) => {
                writeln!(f, "build() rejected {} registrations:", report.failures.len())?;
                writeln!(f, "{}", report.message)
            }
        }
    }
}

fn write_pass(f: &mut fmt::Formatter<'_>, title: &str, pass: &WriterPass) -> fmt::Result {
    writeln!(f, "{} (scope {}):", title, pass.scope_id)?;
    for line in &pass.lines {
        writeln!(f, "Item {} [{}]: {}", line.item, line.lifecycle, line.guid)?;
    }
    Ok(())
}
