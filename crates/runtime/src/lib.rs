//! Arbiter Runtime
//!
//! Event, condition and trigger model for scenario constraints, and the
//! executor that evaluates them once per simulation tick.

pub mod condition;
pub mod error;
pub mod event;
pub mod events;
pub mod executor;
pub mod storage;
pub mod trigger;
pub mod types;
pub mod value;
pub mod world;

pub use condition::{ComparisonOp, Condition, ConditionContext, Glue};
pub use error::{Error, Result};
pub use event::{Event, EventState};
pub use events::Events;
pub use executor::Runtime;
pub use storage::{Command, CommandQueue, Variables};
pub use trigger::{Trigger, TriggerContext};
pub use types::*;
pub use value::{Value, ValueContext};
pub use world::{ManualClock, ObjectTable, Objects, SimObject, Timeline};
