//! Scenario driver - builds missions, runs checks and prints the outcome.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin run_scenario -- --scenario all
//!   cargo run -p deconflict-cli --bin run_scenario -- --file mission.json --json

use anyhow::{bail, Result};
use clap::Parser;
use deconflict_cli::report::render_text;
use deconflict_cli::{builtin, load_scenario, Scenario, ScenarioReport, BUILTIN_SCENARIOS};
use deconflict_core::EngineConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a primary drone mission against registered traffic")]
struct Args {
    /// Built-in scenario: collision, clear, staggered, stationary or all
    #[arg(long, default_value = "collision")]
    scenario: String,

    /// Load the scenario from a JSON file instead
    #[arg(long, conflicts_with = "scenario")]
    file: Option<PathBuf>,

    /// Minimum separation in meters
    #[arg(long, default_value_t = 10.0)]
    safety_radius: f64,

    /// Sampling interval in seconds
    #[arg(long, default_value_t = 0.5)]
    time_step: f64,

    /// Print the full report (missions, trajectories, result) as JSON
    #[arg(long)]
    json: bool,

    /// Exit with status 2 when any scenario has a conflict
    #[arg(long)]
    fail_on_conflict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?)
        .init();
    Ok(())
}

fn select_scenarios(args: &Args) -> Result<Vec<Scenario>> {
    let defaults = EngineConfig {
        safety_radius: args.safety_radius,
        time_step: args.time_step,
    };

    if let Some(path) = &args.file {
        return Ok(vec![load_scenario(path, &defaults)?]);
    }

    let names: Vec<&str> = if args.scenario == "all" {
        BUILTIN_SCENARIOS.to_vec()
    } else {
        vec![args.scenario.as_str()]
    };

    let mut scenarios = Vec::with_capacity(names.len());
    for name in names {
        match builtin(name, args.safety_radius, args.time_step) {
            Some(scenario) => scenarios.push(scenario?),
            None => bail!(
                "unknown scenario '{}', expected one of: {}, all",
                name,
                BUILTIN_SCENARIOS.join(", ")
            ),
        }
    }
    Ok(scenarios)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let scenarios = select_scenarios(&args)?;
    let reports = scenarios
        .iter()
        .map(|scenario| {
            tracing::info!("Running scenario {}: {}", scenario.name, scenario.description);
            scenario.run()
        })
        .collect::<Result<Vec<ScenarioReport>, _>>()?;

    if args.json {
        let output = match reports.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        println!("{}", output);
    } else {
        for report in &reports {
            println!("{}", render_text(report));
        }
    }

    if args.fail_on_conflict && reports.iter().any(|r| !r.result.is_clear()) {
        std::process::exit(2);
    }
    Ok(())
}
