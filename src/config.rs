//! Step configuration loader.
//!
//! A step file names one step with its arguments and tells the host what to
//! do when an item fails:
//!
//! ```yaml
//! step:
//!   substring:
//!     start: 1
//!     end: 3
//! on_error: report
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::step::ScalarMapStep;
use crate::steps::SubstringStep;

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse YAML: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// What the host does with an item the step rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing item
    #[default]
    Abort,
    /// Log the failure, skip the item, and keep going
    Report,
}

/// A configured step, keyed by step name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDef {
    Substring(SubstringStep),
}

impl StepDef {
    pub fn name(&self) -> &'static str {
        match self {
            StepDef::Substring(_) => SubstringStep::NAME,
        }
    }

    pub fn into_step(self) -> Box<dyn ScalarMapStep> {
        match self {
            StepDef::Substring(step) => Box::new(step),
        }
    }
}

/// Step file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Written as a single-key map, `substring: {start: 1}`
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub step: StepDef,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl StepConfig {
    pub fn new(step: StepDef) -> Self {
        Self {
            step,
            on_error: ErrorPolicy::default(),
        }
    }

    /// Replace the file's error policy when the host supplies one.
    pub fn with_policy_override(mut self, policy: Option<ErrorPolicy>) -> Self {
        if let Some(policy) = policy {
            self.on_error = policy;
        }
        self
    }

    /// Load a step configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not a valid step file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.display(), step = config.step.name(), "loaded step config");
        Ok(config)
    }

    /// Parse a step configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TraverserValue;
    use std::io::Write;

    #[test]
    fn test_parse_substring_config() {
        let yaml = r#"
step:
  substring:
    start: 1
    end: 3
on_error: report
"#;
        let config = StepConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.step, StepDef::Substring(SubstringStep::with_end(1, 3)));
        assert_eq!(config.on_error, ErrorPolicy::Report);
    }

    #[test]
    fn test_defaults() {
        let config = StepConfig::from_yaml_str("step:\n  substring:\n    start: -3\n").unwrap();

        assert_eq!(config.step, StepDef::Substring(SubstringStep::new(-3)));
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn test_into_step() {
        let config = StepConfig::from_yaml_str("step:\n  substring:\n    start: -3\n").unwrap();
        let step = config.step.into_step();

        assert_eq!(step.name(), "substring");
        assert_eq!(
            step.map(&TraverserValue::from("hello")).unwrap(),
            TraverserValue::from("llo")
        );
    }

    #[test]
    fn test_labels_in_step_file() {
        let yaml = "step:\n  substring:\n    start: 0\n    end: 2\n    labels: [prefix]\n";
        let config = StepConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(
            config.step,
            StepDef::Substring(SubstringStep::with_end(0, 2).with_label("prefix"))
        );
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let config = StepConfig {
            step: StepDef::Substring(SubstringStep::with_end(-4, -1)),
            on_error: ErrorPolicy::Report,
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("substring:"), "{}", yaml);
        assert_eq!(StepConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_policy_override() {
        let config = StepConfig::from_yaml_str("step:\n  substring:\n    start: 1\non_error: report\n").unwrap();

        assert_eq!(config.clone().with_policy_override(None).on_error, ErrorPolicy::Report);
        assert_eq!(
            config.with_policy_override(Some(ErrorPolicy::Abort)).on_error,
            ErrorPolicy::Abort
        );

        let config = StepConfig::new(StepDef::Substring(SubstringStep::new(0)));
        assert_eq!(
            config.with_policy_override(Some(ErrorPolicy::Report)).on_error,
            ErrorPolicy::Report
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = StepConfig::from_yaml_str("step:\n  uppercase: {}\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "step:\n  substring:\n    start: 0\n    end: -1").unwrap();

        let config = StepConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.step, StepDef::Substring(SubstringStep::with_end(0, -1)));
    }

    #[test]
    fn test_missing_file() {
        let result = StepConfig::load_from_file("/nonexistent/step.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
