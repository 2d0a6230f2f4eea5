//! wiring-demo - runs the container scenarios and prints their reports

use anyhow::Result;
use clap::Parser;
use wiring_demo::{OutputFormat, Scenario};

#[derive(Parser)]
#[command(name = "wiring-demo")]
#[command(about = "Exercise the wiring dependency container", version)]
struct Cli {
    /// Scenario to run (all of them when omitted)
    #[command(subcommand)]
    scenario: Option<Scenario>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log container activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };

    // stdout carries the report
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let scenarios = match cli.scenario {
        Some(scenario) => vec![scenario],
        None => Scenario::all().to_vec(),
    };

    for scenario in scenarios {
        tracing::info!(?scenario, "Running scenario");
        let report = wiring_demo::run(scenario)?;
        println!("{}", report.render(cli.format)?);
    }

    Ok(())
}
