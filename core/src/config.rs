//! Run configuration — parser and formatter knobs.
//!
//! Every field has a default, so an empty JSON object `{}` is a valid
//! config file. CLI flags in `return-rate` override values loaded here.

use crate::error::{RetentionError, RetentionResult};
use serde::{Deserialize, Serialize};

/// What to do with lines carrying more than the three defined fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFieldPolicy {
    /// Treat the line as malformed.
    #[default]
    Reject,
    /// Keep the first three fields, drop the rest.
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetentionConfig {
    /// Field separator for both input lines and output rows.
    pub delimiter:      char,
    pub extra_fields:   ExtraFieldPolicy,
    /// Require dates to be real calendar days, not just integers.
    pub calendar_dates: bool,
    /// Header corner cell and filler for cells below the diagonal.
    pub placeholder:    String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            delimiter:      '\t',
            extra_fields:   ExtraFieldPolicy::Reject,
            calendar_dates: false,
            placeholder:    "-".into(),
        }
    }
}

impl RetentionConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> RetentionResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RetentionError::Config {
            path:   path.to_string(),
            reason: format!("cannot read: {e}"),
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &str, content: &str) -> RetentionResult<Self> {
        let config: Self = serde_json::from_str(content).map_err(|e| RetentionError::Config {
            path:   path.to_string(),
            reason: e.to_string(),
        })?;
        if config.placeholder.contains(config.delimiter) {
            return Err(RetentionError::Config {
                path:   path.to_string(),
                reason: "placeholder must not contain the delimiter".into(),
            });
        }
        Ok(config)
    }
}
