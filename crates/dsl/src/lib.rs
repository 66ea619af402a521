//! Arbiter DSL
//!
//! Reads scenario constraint documents (XML) into the event registry
//! evaluated by `arbiter-runtime`.

pub mod diagnostic;
pub mod parser;

pub use diagnostic::{Diagnostic, DiagnosticKind, Position, format_diagnostics};
pub use parser::{TIME_LIMIT_MESSAGE, parse};
