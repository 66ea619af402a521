//! Value expressions
//!
//! The closed set of scalar-producing expressions a scenario may use.
//! Unresolvable lookups degrade to [`Scalar::Invalid`] instead of failing.

use crate::storage::Variables;
use crate::types::Scalar;
use crate::world::{Objects, Timeline};

/// A scalar-producing expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
    /// Current value of a scenario variable
    Variable(String),
    /// Type name of a simulated object
    TypeOf(String),
    /// Property of a simulated object
    ObjectState { object_id: String, property: String },
    /// Current simulation time in milliseconds
    Timestamp,
    /// Placeholder produced for malformed input
    Invalid,
}

/// Context available to value evaluation
#[derive(Clone, Copy)]
pub struct ValueContext<'a> {
    pub variables: &'a Variables,
    pub objects: &'a dyn Objects,
    pub timeline: &'a dyn Timeline,
}

impl Value {
    pub fn evaluate(&self, ctx: &ValueContext<'_>) -> Scalar {
        match self {
            Value::Int(v) => Scalar::Int(*v),
            Value::Double(v) => Scalar::Double(*v),
            Value::String(s) => Scalar::String(s.clone()),
            Value::Variable(name) => ctx.variables.get(name).cloned().unwrap_or(Scalar::Invalid),
            Value::TypeOf(object_id) => ctx
                .objects
                .type_of(object_id)
                .map(Scalar::String)
                .unwrap_or(Scalar::Invalid),
            Value::ObjectState {
                object_id,
                property,
            } => ctx
                .objects
                .property(object_id, property)
                .unwrap_or(Scalar::Invalid),
            Value::Timestamp => Scalar::Int(ctx.timeline.timestamp()),
            Value::Invalid => Scalar::Invalid,
        }
    }
}
