//!
//! Replays a constraint document against a world fixture.
//!
//! Usage: `run <constraints.xml> --world <fixture.yaml> [--steps N] [--step-ms MS]`
//!
//! Exits with 0 on success, 1 on failure or invalid input, 2 when the
//! scenario is still undecided after the last step.

use std::fs;
use std::path::PathBuf;
use std::process;

use arbiter_runtime::Outcome;
use arbiter_tools::{ReplayError, WorldFixture, replay};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "run")]
#[command(about = "Replay a constraint document against a world fixture")]
struct Args {
    /// Path to the constraint document
    constraints: PathBuf,

    /// World fixture YAML
    #[arg(long)]
    world: PathBuf,

    /// Override number of ticks
    #[arg(long)]
    steps: Option<u64>,

    /// Override clock advance per tick (milliseconds)
    #[arg(long = "step-ms")]
    step_ms: Option<i64>,
}

fn main() {
    arbiter_tools::init_logging();

    let args = Args::parse();

    let source = match fs::read_to_string(&args.constraints) {
        Ok(source) => source,
        Err(e) => {
            error!("Error reading '{}': {}", args.constraints.display(), e);
            process::exit(1);
        }
    };

    let mut world = match WorldFixture::load(&args.world) {
        Ok(world) => {
            info!(
                "Loaded world: {} ({})",
                world.metadata.name,
                args.world.display()
            );
            world
        }
        Err(e) => {
            error!("Failed to load world '{}': {}", args.world.display(), e);
            process::exit(1);
        }
    };
    if let Some(steps) = args.steps {
        world.steps = steps;
    }
    if let Some(step_ms) = args.step_ms {
        world.step_ms = step_ms;
    }

    let report = match replay(&source, &world) {
        Ok(report) => report,
        Err(ReplayError::Constraints(diagnostics)) => {
            error!(
                "Errors found:\n{}",
                arbiter_dsl::format_diagnostics(&diagnostics).join("\n")
            );
            process::exit(1);
        }
        Err(e) => {
            error!("Replay failed: {}", e);
            process::exit(1);
        }
    };

    for (name, value) in report.variables.iter() {
        info!("  {} = {}", name, value);
    }

    match &report.outcome {
        Some(Outcome::Success) => info!(
            "Success after {} ticks ({} ms)",
            report.ticks, report.clock
        ),
        Some(Outcome::Failure(message)) => error!(
            "Failure after {} ticks ({} ms): {}",
            report.ticks, report.clock, message
        ),
        None => warn!(
            "Undecided after {} ticks ({} ms)",
            report.ticks, report.clock
        ),
    }

    process::exit(report.exit_code());
}
