//! Tick executor
//!
//! Evaluates the armed events of a scenario once per simulation tick and
//! applies the effects of those that fire.

use tracing::{debug, info, instrument, trace, warn};

use crate::condition::ConditionContext;
use crate::error::{Error, Result};
use crate::events::Events;
use crate::storage::{Command, CommandQueue, Variables};
use crate::trigger::TriggerContext;
use crate::types::{EventId, Outcome, Timestamp};
use crate::world::{Objects, Timeline};

/// Runtime state for a scenario
pub struct Runtime {
    /// Event registry
    events: Events,
    /// Scenario variables
    variables: Variables,
    /// Verdict, once a success or failure trigger has fired
    outcome: Option<Outcome>,
    /// Number of ticks evaluated
    tick: u64,
}

impl Runtime {
    /// Create a runtime over a parsed event registry
    pub fn new(events: Events) -> Self {
        Self::with_variables(events, Variables::new())
    }

    /// Create a runtime with pre-populated variables
    pub fn with_variables(events: Events, variables: Variables) -> Self {
        info!(
            events = events.len(),
            armed = events.iter().filter(|e| e.is_armed()).count(),
            "runtime created"
        );
        Self {
            events,
            variables,
            outcome: None,
            tick: 0,
        }
    }

    /// Get current tick number
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    /// Verdict reached so far
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Arm an event from the host side
    pub fn set_up_event(&mut self, id: &EventId, now: Timestamp) -> Result<bool> {
        if !self.events.contains(id) {
            return Err(Error::EventNotFound(id.clone()));
        }
        Ok(self.events.set_up(id, now))
    }

    /// Drop an event from the host side
    pub fn drop_event(&mut self, id: &EventId) -> Result<bool> {
        if !self.events.contains(id) {
            return Err(Error::EventNotFound(id.clone()));
        }
        Ok(self.events.drop_event(id))
    }

    /// Execute a single tick.
    ///
    /// Armed events are evaluated in registry order; effects of a fired
    /// event are visible to the events evaluated after it. Returns the
    /// verdict if one was reached during this tick. Once the scenario is
    /// settled, further ticks do nothing.
    #[instrument(skip_all, fields(tick = self.tick))]
    pub fn tick(&mut self, objects: &dyn Objects, timeline: &dyn Timeline) -> Option<Outcome> {
        if let Some(outcome) = &self.outcome {
            warn!(%outcome, "tick after scenario settled");
            return None;
        }

        let now = timeline.timestamp();
        trace!(now, "tick start");

        let mut commands = CommandQueue::default();
        let mut verdict = None;

        for index in 0..self.events.len() {
            let (id, fired, drops_on_fire, forced_drops) = {
                let Some(event) = self.events.get_index(index) else {
                    break;
                };
                if !event.is_armed() {
                    continue;
                }

                let mut ctx =
                    ConditionContext::new(&self.variables, objects, timeline, &self.events);
                let fired = event.condition().evaluate(&mut ctx);
                let forced_drops = ctx.into_forced_drops();

                if fired {
                    debug!(event = %event.id(), "event fired");
                    let mut ctx = TriggerContext {
                        variables: &mut self.variables,
                        commands: &mut commands,
                    };
                    event.trigger().execute(&mut ctx);
                }
                (event.id().clone(), fired, event.drops_on_fire(), forced_drops)
            };

            for owner in &forced_drops {
                self.events.drop_event(owner);
            }

            for command in commands.drain() {
                match command {
                    Command::SetUp(target) => {
                        self.events.set_up(&target, now);
                    }
                    Command::Drop(target) => {
                        self.events.drop_event(&target);
                    }
                    Command::Finish(outcome) => {
                        // The first verdict of a tick wins
                        verdict.get_or_insert(outcome);
                    }
                }
            }

            if fired && drops_on_fire {
                self.events.drop_event(&id);
            }

            if verdict.is_some() {
                break;
            }
        }

        self.tick += 1;

        if let Some(outcome) = &verdict {
            info!(%outcome, tick = self.tick, at = now, "scenario settled");
            self.outcome = Some(outcome.clone());
        }
        trace!("tick complete");
        verdict
    }
}
