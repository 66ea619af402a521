//! Simulation world seen by the evaluator
//!
//! The runtime reads the simulated scene through two narrow traits:
//! [`Objects`] for entity lookups and [`Timeline`] for the clock.
//! [`ObjectTable`] and [`ManualClock`] are in-memory implementations for
//! headless hosts, fixtures and tests.

use indexmap::{IndexMap, IndexSet};

use crate::types::{Scalar, Timestamp};

/// Lookup of simulated objects by id
pub trait Objects {
    /// Type name of an object, `None` if the object is unknown
    fn type_of(&self, object_id: &str) -> Option<String>;

    /// Named property of an object, `None` if object or property is unknown
    fn property(&self, object_id: &str, property: &str) -> Option<Scalar>;

    /// Whether the object currently lies inside the region; unknown ids are never inside
    fn contains(&self, object_id: &str, region_id: &str) -> bool;
}

/// Monotonic simulation clock
pub trait Timeline {
    /// Current simulation time in milliseconds
    fn timestamp(&self) -> Timestamp;
}

/// A simulated object snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimObject {
    /// Type name reported by `typeof`
    pub type_name: String,
    /// Properties reported by `objectstate`
    pub properties: IndexMap<String, Scalar>,
    /// Regions the object is currently inside
    pub regions: IndexSet<String>,
}

impl SimObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Builder method: set a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder method: place the object inside a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.regions.insert(region.into());
        self
    }
}

/// In-memory object registry
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    objects: IndexMap<String, SimObject>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object
    pub fn insert(&mut self, id: impl Into<String>, object: SimObject) {
        self.objects.insert(id.into(), object);
    }

    pub fn remove(&mut self, id: &str) -> Option<SimObject> {
        self.objects.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Objects for ObjectTable {
    fn type_of(&self, object_id: &str) -> Option<String> {
        self.objects.get(object_id).map(|o| o.type_name.clone())
    }

    fn property(&self, object_id: &str, property: &str) -> Option<Scalar> {
        self.objects
            .get(object_id)
            .and_then(|o| o.properties.get(property))
            .cloned()
    }

    fn contains(&self, object_id: &str, region_id: &str) -> bool {
        self.objects
            .get(object_id)
            .is_some_and(|o| o.regions.contains(region_id))
    }
}

/// Clock advanced explicitly by its owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    /// Move the clock forward; negative steps are ignored to keep it monotonic
    pub fn advance(&mut self, millis: Timestamp) {
        self.now = self.now.saturating_add(millis.max(0));
    }
}

impl Timeline for ManualClock {
    fn timestamp(&self) -> Timestamp {
        self.now
    }
}
