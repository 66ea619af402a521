//! Integration test harness for Arbiter.
//!
//! This crate provides utilities for end-to-end testing of the full
//! pipeline: Parse → Arm → Tick → Verify.

use arbiter_runtime::{
    EventId, EventState, ManualClock, ObjectTable, Outcome, Runtime, Scalar, SimObject, Timeline,
    Timestamp,
};

/// Default clock advance between ticks in [`TestHarness::run_for`]
pub const DEFAULT_STEP_MS: Timestamp = 10;

/// Test harness for evaluating constraint documents against a scripted world.
pub struct TestHarness {
    runtime: Runtime,
    objects: ObjectTable,
    clock: ManualClock,
    step_ms: Timestamp,
}

impl TestHarness {
    /// Create a new test harness from a constraint document, parsed at time 0.
    ///
    /// # Panics
    ///
    /// Panics if the document is rejected.
    pub fn from_source(source: &str) -> Self {
        let clock = ManualClock::default();
        let events = match arbiter_dsl::parse(source, &clock) {
            Ok(events) => events,
            Err(diagnostics) => {
                panic!(
                    "Parse failed: {:?}",
                    arbiter_dsl::format_diagnostics(&diagnostics)
                );
            }
        };

        Self {
            runtime: Runtime::new(events),
            objects: ObjectTable::new(),
            clock,
            step_ms: DEFAULT_STEP_MS,
        }
    }

    /// Builder method: set the clock advance used by [`run_for`](Self::run_for).
    pub fn with_step(mut self, step_ms: Timestamp) -> Self {
        self.step_ms = step_ms;
        self
    }

    /// Builder method: place an object in the world.
    pub fn with_object(mut self, id: &str, object: SimObject) -> Self {
        self.objects.insert(id, object);
        self
    }

    /// Current clock reading.
    pub fn now(&self) -> Timestamp {
        self.clock.timestamp()
    }

    /// Move the clock forward without evaluating.
    pub fn advance(&mut self, millis: Timestamp) {
        self.clock.advance(millis);
    }

    /// Evaluate one tick at the current time.
    pub fn tick(&mut self) -> Option<Outcome> {
        self.runtime.tick(&self.objects, &self.clock)
    }

    /// Tick every step for `duration` ms, starting now. Stops at the first
    /// verdict and returns it.
    pub fn run_for(&mut self, duration: Timestamp) -> Option<Outcome> {
        let end = self.now().saturating_add(duration);
        while self.now() < end {
            if let Some(outcome) = self.tick() {
                return Some(outcome);
            }
            self.advance(self.step_ms);
        }
        None
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<Scalar>) {
        self.runtime.variables_mut().set(name, value.into());
    }

    pub fn variable(&self, name: &str) -> Option<&Scalar> {
        self.runtime.variables().get(name)
    }

    /// Get mutable access to the world's objects.
    pub fn objects_mut(&mut self) -> &mut ObjectTable {
        &mut self.objects
    }

    pub fn event_state(&self, id: &str) -> Option<EventState> {
        self.runtime.events().state(&EventId::from(id))
    }

    /// Verdict reached so far.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.runtime.outcome()
    }

    pub fn current_tick(&self) -> u64 {
        self.runtime.tick_count()
    }

    /// Get access to the runtime for verification.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}
