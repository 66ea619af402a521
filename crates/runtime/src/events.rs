//! Event registry
//!
//! Owns every event of a scenario keyed by id. Events refer to each other
//! only by id, so arming and dropping go through the registry.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{Event, EventState};
use crate::types::{EventId, Timestamp};

/// Insertion-ordered id → event mapping
#[derive(Debug, Clone, Default)]
pub struct Events {
    events: IndexMap<EventId, Event>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event, rejecting duplicate ids
    pub fn insert(&mut self, event: Event) -> Result<()> {
        if self.events.contains_key(event.id()) {
            return Err(Error::DuplicateEventId(event.id().clone()));
        }
        self.events.insert(event.id().clone(), event);
        Ok(())
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    /// Get an event by insertion position
    pub fn get_index(&self, index: usize) -> Option<&Event> {
        self.events.get_index(index).map(|(_, event)| event)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.events.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// State of an event, `None` if the id is unknown
    pub fn state(&self, id: &EventId) -> Option<EventState> {
        self.events.get(id).map(Event::state)
    }

    /// Arm an event. Unknown ids and events past `Unarmed` are left alone.
    pub fn set_up(&mut self, id: &EventId, now: Timestamp) -> bool {
        let changed = self
            .events
            .get_mut(id)
            .is_some_and(|event| event.set_up(now));
        if changed {
            debug!(event = %id, at = now, "event set up");
        }
        changed
    }

    /// Drop an event. Unknown ids and dropped events are left alone.
    pub fn drop_event(&mut self, id: &EventId) -> bool {
        let changed = self
            .events
            .get_mut(id)
            .is_some_and(Event::mark_dropped);
        if changed {
            debug!(event = %id, "event dropped");
        }
        changed
    }
}
