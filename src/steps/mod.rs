//! Built-in scalar map steps.

pub mod substring;

pub use substring::{normalize_index, SubstringStep};
