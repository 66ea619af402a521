//! Condition expressions
//!
//! Boolean expressions guarding events. Evaluation is side-effect free
//! except for forced-drop timers, which record their owner in the
//! [`ConditionContext`] so the driver can drop it once the condition has
//! been evaluated.

use std::cmp::Ordering;

use tracing::trace;

use crate::event::EventState;
use crate::events::Events;
use crate::storage::Variables;
use crate::types::{EventId, Scalar, Timestamp};
use crate::value::{Value, ValueContext};
use crate::world::{Objects, Timeline};

/// Relational operator of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equals,
    NotEqual,
    Greater,
    Less,
    NotGreater,
    NotLess,
}

impl ComparisonOp {
    /// Apply the operator to two evaluated operands.
    ///
    /// Any invalid operand makes every operator false except `NotEqual`.
    pub fn apply(self, left: &Scalar, right: &Scalar) -> bool {
        if !left.is_valid() || !right.is_valid() {
            return self == ComparisonOp::NotEqual;
        }
        match self {
            ComparisonOp::Equals => left == right,
            ComparisonOp::NotEqual => left != right,
            ComparisonOp::Greater => left.ordering(right) == Some(Ordering::Greater),
            ComparisonOp::Less => left.ordering(right) == Some(Ordering::Less),
            ComparisonOp::NotGreater => {
                matches!(left.ordering(right), Some(Ordering::Less | Ordering::Equal))
            }
            ComparisonOp::NotLess => {
                matches!(left.ordering(right), Some(Ordering::Greater | Ordering::Equal))
            }
        }
    }
}

/// How the members of a combined condition are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glue {
    And,
    Or,
}

/// A boolean expression
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Constant(bool),
    Comparison {
        op: ComparisonOp,
        left: Value,
        right: Value,
    },
    Negation(Box<Condition>),
    Combined {
        conditions: Vec<Condition>,
        glue: Glue,
    },
    /// Object lies inside a region
    Inside { object_id: String, region_id: String },
    /// Referenced event is armed
    SettedUp(EventId),
    /// Referenced event is dropped
    Dropped(EventId),
    /// At least `timeout` ms elapsed since the owner was armed
    Timer {
        timeout: Timestamp,
        force_drop: bool,
        timestamp: Value,
        owner: EventId,
    },
}

/// Context available to condition evaluation
pub struct ConditionContext<'a> {
    pub variables: &'a Variables,
    pub objects: &'a dyn Objects,
    pub timeline: &'a dyn Timeline,
    pub events: &'a Events,
    /// Owners of timers that expired with force-drop during this evaluation
    forced_drops: Vec<EventId>,
}

impl<'a> ConditionContext<'a> {
    pub fn new(
        variables: &'a Variables,
        objects: &'a dyn Objects,
        timeline: &'a dyn Timeline,
        events: &'a Events,
    ) -> Self {
        Self {
            variables,
            objects,
            timeline,
            events,
            forced_drops: Vec::new(),
        }
    }

    pub fn values(&self) -> ValueContext<'a> {
        ValueContext {
            variables: self.variables,
            objects: self.objects,
            timeline: self.timeline,
        }
    }

    /// Events that must be dropped as a result of the evaluation
    pub fn into_forced_drops(self) -> Vec<EventId> {
        self.forced_drops
    }
}

impl Condition {
    /// Negate a condition
    pub fn negate(self) -> Self {
        Condition::Negation(Box::new(self))
    }

    pub fn evaluate(&self, ctx: &mut ConditionContext<'_>) -> bool {
        match self {
            Condition::Constant(value) => *value,
            Condition::Comparison { op, left, right } => {
                let values = ctx.values();
                op.apply(&left.evaluate(&values), &right.evaluate(&values))
            }
            Condition::Negation(inner) => !inner.evaluate(ctx),
            // Every member is evaluated so timers nested anywhere still settle their owner
            Condition::Combined { conditions, glue } => match glue {
                Glue::And => conditions
                    .iter()
                    .fold(true, |all, condition| condition.evaluate(ctx) && all),
                Glue::Or => conditions
                    .iter()
                    .fold(false, |any, condition| condition.evaluate(ctx) || any),
            },
            Condition::Inside {
                object_id,
                region_id,
            } => ctx.objects.contains(object_id, region_id),
            Condition::SettedUp(id) => ctx.events.state(id) == Some(EventState::Armed),
            Condition::Dropped(id) => ctx.events.state(id) == Some(EventState::Dropped),
            Condition::Timer {
                timeout,
                force_drop,
                timestamp,
                owner,
            } => {
                let Some(armed_at) = ctx.events.get(owner).and_then(|e| e.armed_at()) else {
                    return false;
                };
                let Some(now) = timestamp.evaluate(&ctx.values()).as_f64() else {
                    return false;
                };

                let expired = now - armed_at as f64 >= *timeout as f64;
                if expired && *force_drop {
                    trace!(event = %owner, timeout, "timer expired, dropping owner");
                    ctx.forced_drops.push(owner.clone());
                }
                expired
            }
        }
    }
}
