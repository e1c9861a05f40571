//! Substring step: slices string traversers by start and optional end index.
//!
//! Indices are 0-based, start inclusive and end exclusive. A negative index
//! counts from the end of the string (`-1` is the last character) and clamps to
//! the beginning once it runs past it. A positive index past the end clamps to
//! the length. An end at or before the start yields the empty string. Null
//! traversers pass through as null; any other non-string value is rejected.
//!
//! Positions count `char`s, so slicing never splits a UTF-8 sequence.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::step::{ScalarMapStep, StepBase, StepError, TraverserRequirement};
use crate::value::TraverserValue;

/// Substring step with fixed start and optional end index.
///
/// Equality and hashing are structural over the base identity, `start`, and
/// `end`, with an absent end only equal to another absent end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubstringStep {
    #[serde(flatten)]
    base: StepBase,
    start: i64,
    #[serde(default)]
    end: Option<i64>,
}

impl SubstringStep {
    pub const NAME: &'static str = "substring";

    /// Substring from `start` to the end of the string.
    pub fn new(start: i64) -> Self {
        Self::new_range(start, None)
    }

    /// Substring from `start` (inclusive) to `end` (exclusive).
    pub fn with_end(start: i64, end: i64) -> Self {
        Self::new_range(start, Some(end))
    }

    pub fn new_range(start: i64, end: Option<i64>) -> Self {
        Self {
            base: StepBase::new(),
            start,
            end,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.base = self.base.with_label(label);
        self
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    pub fn base(&self) -> &StepBase {
        &self.base
    }

    /// Apply the step to one traverser.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The item was null
    /// * `Ok(Some(s))` - The substring, possibly empty
    /// * `Err(StepError::TypeMismatch)` - The item was neither null nor a string
    pub fn apply(&self, item: &TraverserValue) -> Result<Option<String>, StepError> {
        // null bypasses the type check
        if item.is_null() {
            return Ok(None);
        }

        let s = item.as_str().ok_or_else(|| StepError::TypeMismatch {
            step: Self::NAME.to_string(),
            actual: item.type_name().to_string(),
        })?;

        Ok(Some(self.slice(s)))
    }

    /// Slice a string with this step's indices.
    pub fn slice(&self, s: &str) -> String {
        let len = s.chars().count();
        let start = normalize_index(len, self.start);

        let end = match self.end {
            None => len,
            Some(end) => normalize_index(len, end),
        };

        if end <= start {
            return String::new();
        }

        s[byte_offset(s, start)..byte_offset(s, end)].to_string()
    }
}

impl ScalarMapStep for SubstringStep {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn map(&self, item: &TraverserValue) -> Result<TraverserValue, StepError> {
        self.apply(item).map(TraverserValue::from)
    }

    fn requirements(&self) -> HashSet<TraverserRequirement> {
        HashSet::from([TraverserRequirement::Object])
    }
}

impl fmt::Display for SubstringStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}({},{}){}", Self::NAME, self.start, end, self.base),
            None => write!(f, "{}({}){}", Self::NAME, self.start, self.base),
        }
    }
}

/// Convert a possibly negative index into a position in `[0, len]`.
///
/// Negative indices wrap once from the end and clamp at 0 rather than wrapping
/// again. Positive indices clamp at `len`. An empty string always yields 0.
pub fn normalize_index(len: usize, index: i64) -> usize {
    if index >= 0 {
        return usize::try_from(index).map_or(len, |index| index.min(len));
    }

    if len == 0 {
        return 0;
    }

    let len = i64::try_from(len).unwrap_or(i64::MAX);
    // len >= 1 and index < 0, so the sum cannot overflow
    let wrapped = (len + index) % len;
    usize::try_from(wrapped.max(0)).unwrap_or(0)
}

/// Byte offset of the `pos`-th char, or the string length past the end.
fn byte_offset(s: &str, pos: usize) -> usize {
    s.char_indices().nth(pos).map_or(s.len(), |(offset, _)| offset)
}
