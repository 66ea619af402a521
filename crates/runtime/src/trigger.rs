//! Trigger actions
//!
//! Side effects run when an event fires. Variable writes happen in place;
//! registry transitions and verdicts are queued as [`Command`]s for the
//! driver, which owns the registry.

use tracing::trace;

use crate::storage::{Command, CommandQueue, Variables};
use crate::types::{EventId, Outcome, Scalar};

/// A side-effecting action
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// End the scenario as failed
    Fail(String),
    /// End the scenario as passed
    Success,
    SetVariable { name: String, value: Scalar },
    AddToVariable { name: String, value: Scalar },
    SetUpEvent(EventId),
    DropEvent(EventId),
    /// Members run in order
    Combined(Vec<Trigger>),
    DoNothing,
}

/// Context available to trigger execution
pub struct TriggerContext<'a> {
    pub variables: &'a mut Variables,
    pub commands: &'a mut CommandQueue,
}

impl Trigger {
    pub fn execute(&self, ctx: &mut TriggerContext<'_>) {
        match self {
            Trigger::Fail(message) => {
                ctx.commands.queue(Command::Finish(Outcome::Failure(message.clone())));
            }
            Trigger::Success => ctx.commands.queue(Command::Finish(Outcome::Success)),
            Trigger::SetVariable { name, value } => {
                trace!(variable = %name, %value, "set variable");
                ctx.variables.set(name.clone(), value.clone());
            }
            Trigger::AddToVariable { name, value } => {
                trace!(variable = %name, %value, "add to variable");
                ctx.variables.add(name.clone(), value.clone());
            }
            Trigger::SetUpEvent(id) => ctx.commands.queue(Command::SetUp(id.clone())),
            Trigger::DropEvent(id) => ctx.commands.queue(Command::Drop(id.clone())),
            Trigger::Combined(triggers) => {
                for trigger in triggers {
                    trigger.execute(ctx);
                }
            }
            Trigger::DoNothing => {}
        }
    }
}
