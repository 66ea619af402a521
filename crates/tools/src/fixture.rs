//! World fixture definitions and loading.
//!
//! A fixture stands in for the simulation when constraints are evaluated
//! headless: initial variables, objects, and keyframes that rewrite them
//! as the clock advances.

use std::path::Path;

use arbiter_runtime::{ObjectTable, Scalar, SimObject, Timestamp, Variables};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_VERSION: &str = "arbiter/v1";
const KIND: &str = "World";

/// Errors that can occur when loading or validating a world fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Failed to read the fixture file.
    #[error("failed to read world fixture: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the fixture YAML.
    #[error("failed to parse world fixture YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid API version.
    #[error("invalid apiVersion: expected 'arbiter/v1', got '{0}'")]
    InvalidApiVersion(String),

    /// Invalid kind.
    #[error("invalid kind: expected 'World', got '{0}'")]
    InvalidKind(String),

    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Clock step is zero or negative.
    #[error("stepMs must be positive, got {0}")]
    InvalidStep(Timestamp),

    /// Keyframes are not sorted by time.
    #[error("keyframe at {at} ms follows keyframe at {previous} ms")]
    UnorderedKeyframes { previous: Timestamp, at: Timestamp },
}

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// A simulated world replayed against a constraint document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldFixture {
    /// API version for compatibility checking.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Kind must be "World".
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: FixtureMetadata,

    /// Clock advance per tick in milliseconds.
    #[serde(default = "default_step_ms")]
    pub step_ms: Timestamp,

    /// Number of ticks to replay.
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// Variables present before the first tick.
    #[serde(default)]
    pub variables: IndexMap<String, Scalar>,

    /// Objects present before the first tick.
    #[serde(default)]
    pub objects: IndexMap<String, ObjectFixture>,

    /// World changes, sorted by time.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

fn default_step_ms() -> Timestamp {
    10
}

fn default_steps() -> u64 {
    1000
}

/// Metadata for a fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureMetadata {
    /// Machine identifier for this fixture.
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// An object as written in a fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectFixture {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub properties: IndexMap<String, Scalar>,

    /// Regions the object is inside.
    #[serde(default)]
    pub regions: Vec<String>,
}

impl ObjectFixture {
    pub fn to_object(&self) -> SimObject {
        let object = self
            .properties
            .iter()
            .fold(SimObject::new(self.type_name.clone()), |object, (name, value)| {
                object.with_property(name.clone(), value.clone())
            });
        self.regions
            .iter()
            .fold(object, |object, region| object.with_region(region.clone()))
    }
}

/// World changes applied once the clock reaches `at`.
///
/// Variables are overwritten; objects are replaced as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in milliseconds.
    pub at: Timestamp,

    #[serde(default)]
    pub variables: IndexMap<String, Scalar>,

    #[serde(default)]
    pub objects: IndexMap<String, ObjectFixture>,
}

impl Keyframe {
    pub fn new(at: Timestamp) -> Self {
        Self {
            at,
            ..Self::default()
        }
    }

    /// Write this keyframe's changes into the world.
    pub fn apply(&self, variables: &mut Variables, objects: &mut ObjectTable) {
        for (name, value) in &self.variables {
            variables.set(name.clone(), value.clone());
        }
        for (id, object) in &self.objects {
            objects.insert(id.clone(), object.to_object());
        }
    }

    /// Builder method: set a variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Builder method: replace an object.
    pub fn with_object(mut self, id: impl Into<String>, object: ObjectFixture) -> Self {
        self.objects.insert(id.into(), object);
        self
    }
}

impl WorldFixture {
    /// Create an empty fixture with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: FixtureMetadata {
                name: name.into(),
                title: None,
                description: None,
            },
            step_ms: default_step_ms(),
            steps: default_steps(),
            variables: IndexMap::new(),
            objects: IndexMap::new(),
            keyframes: Vec::new(),
        }
    }

    /// Load a fixture from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a fixture from a YAML string.
    pub fn from_yaml(yaml: &str) -> FixtureResult<Self> {
        let fixture: WorldFixture = serde_yaml::from_str(yaml)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Validate schema, clock step and keyframe order.
    pub fn validate(&self) -> FixtureResult<()> {
        if self.api_version != API_VERSION {
            return Err(FixtureError::InvalidApiVersion(self.api_version.clone()));
        }
        if self.kind != KIND {
            return Err(FixtureError::InvalidKind(self.kind.clone()));
        }
        if self.metadata.name.is_empty() {
            return Err(FixtureError::MissingField("metadata.name".to_string()));
        }
        if self.step_ms <= 0 {
            return Err(FixtureError::InvalidStep(self.step_ms));
        }
        for pair in self.keyframes.windows(2) {
            if pair[1].at < pair[0].at {
                return Err(FixtureError::UnorderedKeyframes {
                    previous: pair[0].at,
                    at: pair[1].at,
                });
            }
        }
        Ok(())
    }

    /// Variables present before the first tick.
    pub fn initial_variables(&self) -> Variables {
        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Objects present before the first tick.
    pub fn object_table(&self) -> ObjectTable {
        let mut table = ObjectTable::new();
        for (id, object) in &self.objects {
            table.insert(id.clone(), object.to_object());
        }
        table
    }

    /// Builder method: set an initial variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Builder method: add an initial object.
    pub fn with_object(mut self, id: impl Into<String>, object: ObjectFixture) -> Self {
        self.objects.insert(id.into(), object);
        self
    }

    /// Builder method: append a keyframe.
    pub fn with_keyframe(mut self, keyframe: Keyframe) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    /// Builder method: set clock step and tick count.
    pub fn with_clock(mut self, step_ms: Timestamp, steps: u64) -> Self {
        self.step_ms = step_ms;
        self.steps = steps;
        self
    }
}
