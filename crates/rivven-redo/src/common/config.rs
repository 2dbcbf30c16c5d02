//! Output buffer configuration

use crate::common::{FormatPolicy, OutputFormat, RedoError, Result, SchemaMode};
use serde::{Deserialize, Serialize};

/// Configuration consumed once when building an output buffer.
///
/// ```rust
/// use rivven_redo::common::{OutputConfig, OutputFormat};
///
/// let config: OutputConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
/// assert_eq!(config.format, OutputFormat::Json);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Wire format of produced messages
    #[serde(default)]
    pub format: OutputFormat,

    /// Framing and representation policy
    #[serde(default)]
    pub policy: FormatPolicy,
}

impl OutputConfig {
    pub fn new(format: OutputFormat, policy: FormatPolicy) -> Self {
        Self { format, policy }
    }

    /// Reject combinations that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if self.policy.schema.include_obj && self.policy.schema.mode == SchemaMode::Omit {
            return Err(RedoError::config(
                "schema.include_obj requires a schema mode other than omit",
            ));
        }
        Ok(())
    }
}
