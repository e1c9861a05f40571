//! Core step trait and types shared by every scalar map step.
//!
//! A step is built once with its fixed configuration and then invoked by the
//! host once per traverser. Steps never own execution or scheduling.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::value::TraverserValue;

/// Access level a step needs to the traverser it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraverserRequirement {
    /// Raw, untyped access to the item value
    Object,
    Bulk,
    Path,
    LabeledPath,
    Sack,
    SideEffects,
    SingleLoop,
    NestedLoop,
}

/// Identity every step carries regardless of its own parameters.
///
/// Two steps are only equal when their bases are equal too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepBase {
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl StepBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }
}

impl fmt::Display for StepBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return Ok(());
        }
        let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        write!(f, "@[{}]", labels.join(","))
    }
}

/// Error raised by a step for a single traverser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    TypeMismatch {
        step: String,
        actual: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::TypeMismatch { step, actual } => write!(
                f,
                "The {}() step can only take string as argument, encountered {}",
                step, actual
            ),
        }
    }
}

impl std::error::Error for StepError {}

/// A step that maps each traverser to exactly one value.
///
/// Implementations hold only immutable configuration, so one instance may be
/// shared across threads and invoked in any order.
pub trait ScalarMapStep: Send + Sync + fmt::Debug {
    /// Step name as it appears in error messages (e.g. `substring`)
    fn name(&self) -> &'static str;

    /// Map one traverser value.
    ///
    /// # Returns
    ///
    /// * `Ok(value)` - Mapped value, `TraverserValue::Null` for null results
    /// * `Err(StepError)` - The item cannot be processed by this step
    fn map(&self, item: &TraverserValue) -> Result<TraverserValue, StepError>;

    /// Capabilities the host must grant before invoking `map`.
    fn requirements(&self) -> HashSet<TraverserRequirement>;
}
