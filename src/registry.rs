//! Step registry for building steps by name.
//!
//! The host looks steps up by name and passes their configuration as JSON
//! arguments, e.g. `{"start": 1, "end": 3}` for `substring`.

use std::collections::HashMap;
use std::fmt;
use serde_json::Value;

use crate::step::{ScalarMapStep, StepError};
use crate::steps::SubstringStep;
use crate::value::TraverserValue;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    NotFound(String),
    InvalidArgs(String),
    Step(StepError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(name) => write!(f, "Step not found: {}", name),
            RegistryError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            RegistryError::Step(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Step(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StepError> for RegistryError {
    fn from(err: StepError) -> Self {
        RegistryError::Step(err)
    }
}

/// Trait for step constructors
pub trait StepFactory: Send + Sync {
    /// Build a step from its configuration arguments
    fn build(&self, args: &HashMap<String, Value>) -> Result<Box<dyn ScalarMapStep>, RegistryError>;
}

impl<F> StepFactory for F
where
    F: Fn(&HashMap<String, Value>) -> Result<Box<dyn ScalarMapStep>, RegistryError> + Send + Sync,
{
    fn build(&self, args: &HashMap<String, Value>) -> Result<Box<dyn ScalarMapStep>, RegistryError> {
        self(args)
    }
}

/// Registry for storing step constructors
pub struct StepRegistry {
    factories: HashMap<String, Box<dyn StepFactory>>,
}

impl StepRegistry {
    /// Create a new empty step registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with every built-in step registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(SubstringStep::NAME, Box::new(build_substring));
        registry
    }

    /// Register a step constructor, replacing any previous one under `name`
    pub fn register(&mut self, name: impl Into<String>, factory: Box<dyn StepFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// Build a registered step
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - No step is registered under `name`
    /// * `RegistryError::InvalidArgs` - The arguments do not configure the step
    pub fn build(
        &self,
        name: &str,
        args: &HashMap<String, Value>,
    ) -> Result<Box<dyn ScalarMapStep>, RegistryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let step = factory.build(args)?;
        tracing::debug!(name, ?step, "built step");
        Ok(step)
    }

    /// Build a step and apply it to a single item
    pub fn call(
        &self,
        name: &str,
        args: &HashMap<String, Value>,
        item: &TraverserValue,
    ) -> Result<TraverserValue, RegistryError> {
        let step = self.build(name, args)?;
        Ok(step.map(item)?)
    }

    /// Check if a step is registered
    pub fn has_step(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Get list of all registered step names, sorted
    pub fn list_steps(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.list_steps())
            .finish()
    }
}

fn build_substring(args: &HashMap<String, Value>) -> Result<Box<dyn ScalarMapStep>, RegistryError> {
    let start = args
        .get("start")
        .ok_or_else(|| RegistryError::InvalidArgs("Missing 'start'".to_string()))
        .and_then(|v| integer_arg("start", v))?;

    let end = match args.get("end") {
        None | Some(Value::Null) => None,
        Some(v) => Some(integer_arg("end", v)?),
    };

    Ok(Box::new(SubstringStep::new_range(start, end)))
}

fn integer_arg(name: &str, value: &Value) -> Result<i64, RegistryError> {
    value.as_i64().ok_or_else(|| {
        RegistryError::InvalidArgs(format!("'{}' must be an integer, got {}", name, value))
    })
}
