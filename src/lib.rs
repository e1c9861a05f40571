//! # Stepwise: Scalar Map Steps for Traversal Pipelines
//!
//! Stepwise provides per-item steps that a traversal host invokes once for
//! each traverser. Steps are built once from fixed configuration, hold no
//! mutable state, and may be shared freely across threads.
//!
//! ## Features
//!
//! - **Substring step**: negative-index wraparound with clamping, null propagation, and type checking
//! - **Step registry**: build steps by name from JSON arguments
//! - **Step files**: YAML step definitions with a host error policy
//! - **NDJSON runner**: stream items through a step from the `stepwise` CLI
//!
//! ## Example
//!
//! ```
//! use stepwise::{SubstringStep, TraverserValue};
//!
//! let step = SubstringStep::with_end(1, 3);
//! assert_eq!(step.apply(&TraverserValue::from("hello")).unwrap(), Some("el".to_string()));
//! assert_eq!(step.apply(&TraverserValue::Null).unwrap(), None);
//! assert!(step.apply(&TraverserValue::Int(42)).is_err());
//! ```
//!
//! ## Example: Step File
//!
//! ```yaml
//! step:
//!   substring:
//!     start: -3
//! on_error: report
//! ```

// Core modules
pub mod value;
pub mod step;
pub mod steps;

// Host-side surfaces
pub mod registry;
pub mod config;
pub mod serialization;
pub mod runner;
pub mod logging;

// Re-export key types
pub use value::TraverserValue;
pub use step::{ScalarMapStep, StepBase, StepError, TraverserRequirement};
pub use steps::{normalize_index, SubstringStep};
pub use registry::{RegistryError, StepFactory, StepRegistry};
pub use config::{ConfigError, ErrorPolicy, StepConfig, StepDef};
pub use serialization::{NdjsonReader, NdjsonWriter, SerializationError};
pub use runner::{run_stream, RunError, RunSummary};
