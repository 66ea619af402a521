//! Variable storage
//!
//! Named scalars shared between triggers, value lookups and the host,
//! plus the queue of event transitions requested by triggers.

use indexmap::IndexMap;

use crate::types::{EventId, Outcome, Scalar};

/// Storage for scenario variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: IndexMap<String, Scalar>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable's current value
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.values.get(name)
    }

    /// Overwrite (or create) a variable
    pub fn set(&mut self, name: impl Into<String>, value: Scalar) {
        self.values.insert(name.into(), value);
    }

    /// Accumulate into a variable.
    ///
    /// Numeric values are summed; a missing or non-numeric stored value (or
    /// a non-numeric addend) is replaced by `value`.
    pub fn add(&mut self, name: impl Into<String>, value: Scalar) {
        let name = name.into();
        let next = self
            .values
            .get(&name)
            .and_then(|current| current.checked_sum(&value))
            .unwrap_or(value);
        self.values.insert(name, next);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Scalar)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A registry change or verdict requested by a trigger
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetUp(EventId),
    Drop(EventId),
    Finish(Outcome),
}

/// Commands queued while a trigger runs, applied by the driver afterwards
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<Command>,
}

impl CommandQueue {
    pub fn queue(&mut self, command: Command) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain queued commands in the order they were issued
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.queue.drain(..)
    }
}
