//! Runtime errors

use thiserror::Error;

use crate::types::EventId;

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
///
/// Evaluation itself never fails; these cover registry maintenance by the
/// parser and by the host driving the runtime.
#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate event id: {0}")]
    DuplicateEventId(EventId),

    #[error("event not found: {0}")]
    EventNotFound(EventId),
}
