//! Headless replay of a constraint document against a world fixture.
//!
//! The fixture provides the world; the clock starts at zero and advances
//! by `stepMs` after every tick. Keyframes due at the current time are
//! applied before the tick that observes them.

use arbiter_dsl::Diagnostic;
use arbiter_runtime::{ManualClock, Outcome, Runtime, Timeline, Timestamp, Variables};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::fixture::{FixtureError, WorldFixture};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid world fixture: {0}")]
    Fixture(#[from] FixtureError),
    #[error("constraint document rejected with {} diagnostic(s)", .0.len())]
    Constraints(Vec<Diagnostic>),
}

/// Summary of a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Verdict, `None` when the steps ran out first.
    pub outcome: Option<Outcome>,
    /// Number of ticks evaluated.
    pub ticks: u64,
    /// Clock reading when the replay stopped, in milliseconds.
    pub clock: Timestamp,
    /// Variables after the last tick.
    pub variables: Variables,
}

impl ReplayReport {
    /// Process exit code: 0 on success, 1 on failure, 2 when undecided.
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            Some(Outcome::Success) => 0,
            Some(Outcome::Failure(_)) => 1,
            None => 2,
        }
    }
}

#[instrument(skip_all, fields(world = %world.metadata.name))]
pub fn replay(constraints: &str, world: &WorldFixture) -> Result<ReplayReport, ReplayError> {
    world.validate()?;

    let mut clock = ManualClock::new(0);
    let mut objects = world.object_table();
    let events = arbiter_dsl::parse(constraints, &clock).map_err(ReplayError::Constraints)?;
    let mut runtime = Runtime::with_variables(events, world.initial_variables());

    info!(
        steps = world.steps,
        step_ms = world.step_ms,
        keyframes = world.keyframes.len(),
        "replay started"
    );

    let mut keyframes = world.keyframes.iter().peekable();
    let mut outcome = None;

    for _ in 0..world.steps {
        while let Some(keyframe) = keyframes.next_if(|k| k.at <= clock.timestamp()) {
            debug!(at = keyframe.at, now = clock.timestamp(), "applying keyframe");
            keyframe.apply(runtime.variables_mut(), &mut objects);
        }

        outcome = runtime.tick(&objects, &clock);
        if outcome.is_some() {
            break;
        }
        clock.advance(world.step_ms);
    }

    let report = ReplayReport {
        outcome,
        ticks: runtime.tick_count(),
        clock: clock.timestamp(),
        variables: runtime.variables().clone(),
    };
    info!(
        ticks = report.ticks,
        clock = report.clock,
        decided = report.outcome.is_some(),
        "replay finished"
    );
    Ok(report)
}
