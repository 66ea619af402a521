//! Events
//!
//! An event binds a condition to a trigger and carries the arming state
//! that decides whether the condition is evaluated at all.

use crate::condition::Condition;
use crate::trigger::Trigger;
use crate::types::{EventId, Timestamp};

/// Event lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventState {
    /// Created but not yet evaluated
    Unarmed,
    /// Evaluated every tick
    Armed,
    /// Terminal, never evaluated again
    Dropped,
}

/// A condition guarding a trigger
#[derive(Debug, Clone)]
pub struct Event {
    id: EventId,
    condition: Condition,
    trigger: Trigger,
    drops_on_fire: bool,
    state: EventState,
    armed_at: Option<Timestamp>,
}

impl Event {
    /// Create an unarmed event
    pub fn new(id: EventId, condition: Condition, trigger: Trigger, drops_on_fire: bool) -> Self {
        Self {
            id,
            condition,
            trigger,
            drops_on_fire,
            state: EventState::Unarmed,
            armed_at: None,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn drops_on_fire(&self) -> bool {
        self.drops_on_fire
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == EventState::Armed
    }

    pub fn is_dropped(&self) -> bool {
        self.state == EventState::Dropped
    }

    /// Time the event was last armed, used as the origin of its timers
    pub fn armed_at(&self) -> Option<Timestamp> {
        self.armed_at
    }

    /// Arm the event. Returns `false` if it was not unarmed.
    pub fn set_up(&mut self, now: Timestamp) -> bool {
        if self.state != EventState::Unarmed {
            return false;
        }
        self.state = EventState::Armed;
        self.armed_at = Some(now);
        true
    }

    /// Drop the event for good. Returns `false` if it was already dropped.
    pub fn mark_dropped(&mut self) -> bool {
        if self.state == EventState::Dropped {
            return false;
        }
        self.state = EventState::Dropped;
        true
    }
}
