//!
//! Parses a constraint document and reports diagnostics.
//!
//! Usage: `check <constraints.xml>`

use std::fs;
use std::path::PathBuf;
use std::process;

use arbiter_runtime::{EventState, ManualClock};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "check")]
#[command(about = "Validate a constraint document and report diagnostics")]
struct Args {
    /// Path to the constraint document
    constraints: PathBuf,
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

    info!("Checking constraints: {}", args.constraints.display());

    let events = match arbiter_dsl::parse(&source, &ManualClock::default()) {
        Ok(events) => events,
        Err(diagnostics) => {
            error!(
                "Errors found:\n{}",
                arbiter_dsl::format_diagnostics(&diagnostics).join("\n")
            );
            process::exit(1);
        }
    };

    let armed = events
        .iter()
        .filter(|e| e.state() == EventState::Armed)
        .count();
    info!("Constraint document is valid");
    info!("  - Events: {}", events.len());
    info!("  - Armed initially: {}", armed);
    for event in events.iter() {
        info!(
            "    {} ({:?}, drops on fire: {})",
            event.id(),
            event.state(),
            event.drops_on_fire()
        );
    }
}
