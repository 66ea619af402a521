//! Core runtime types
//!
//! Identifiers, scalar payloads and the terminal scenario outcome.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation timestamp in milliseconds
pub type Timestamp = i64;

/// Unique identifier for an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub String);

impl EventId {
    /// Generate a fresh globally unique id for an event authored without one
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dynamically typed scalar
///
/// Produced by evaluating a value expression and stored in variables.
/// `Invalid` marks a lookup that could not be resolved; condition
/// comparisons against it only ever satisfy "not equal".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Double(f64),
    String(String),
    Invalid,
}

impl Scalar {
    /// Interpret authored literal text: integer, else floating point, else string
    pub fn from_literal(text: &str) -> Self {
        if let Ok(value) = text.trim().parse::<i64>() {
            return Scalar::Int(value);
        }
        if let Ok(value) = text.trim().parse::<f64>() {
            return Scalar::Double(value);
        }
        Scalar::String(text.to_string())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Scalar::Invalid)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric sum, or `None` when either side is not a number.
    ///
    /// Integer sums stay integral unless they overflow.
    pub fn checked_sum(&self, other: &Scalar) -> Option<Scalar> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(
                a.checked_add(*b)
                    .map(Scalar::Int)
                    .unwrap_or(Scalar::Double(*a as f64 + *b as f64)),
            ),
            _ => Some(Scalar::Double(self.as_f64()? + other.as_f64()?)),
        }
    }

    /// Ordering used by the relational comparisons.
    ///
    /// Strings on either side force a lexical comparison of the display
    /// forms; otherwise both sides compare as numbers. `None` when either
    /// side is invalid or the numbers are unordered.
    pub fn ordering(&self, other: &Scalar) -> Option<Ordering> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        match (self, other) {
            (Scalar::String(_), _) | (_, Scalar::String(_)) => {
                Some(self.to_string().cmp(&other.to_string()))
            }
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Double(v) => write!(f, "{v}"),
            Scalar::String(s) => write!(f, "{s}"),
            Scalar::Invalid => write!(f, "<invalid>"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Double(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

/// Terminal verdict of a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure(message) => write!(f, "failure: {message}"),
        }
    }
}
