//! VM settings.

use serde::Deserialize;

/// Limits and output mode of a [`Vm`](crate::Vm).
///
/// Deserializes from a partial JSON object; missing keys keep their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmConfig {
    /// Maximum depth of nested calls, field evaluations and imports.
    pub max_stack: usize,
    /// Number of trace lines kept in an error; the middle of longer traces
    /// is replaced by `...`. Zero keeps every line.
    pub max_trace: usize,
    /// Render the top-level string raw instead of as JSON.
    pub string_output: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_stack: 500,
            max_trace: 20,
            string_output: false,
        }
    }
}

impl VmConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = VmConfig::from_json(r#"{"max_stack": 50}"#).unwrap();
        assert_eq!(
            config,
            VmConfig {
                max_stack: 50,
                ..VmConfig::default()
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(VmConfig::from_json(r#"{"max_depth": 50}"#).is_err());
    }
}
