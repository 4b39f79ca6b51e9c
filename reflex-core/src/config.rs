//! Runtime configuration.
//!
//! A [`RuntimeConfig`] can be built in code or deserialized from a host's own
//! configuration file. Every field has a default, so an empty JSON object is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default runtime name recorded on tracing events.
pub const DEFAULT_RUNTIME_NAME: &str = "reflex";

/// Configuration for a [`Runtime`](crate::reactive::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Name attached to every tracing event emitted by the runtime.
    pub name: String,

    /// Maximum nesting depth of effect runs.
    ///
    /// `None` leaves nested triggering unguarded, so two effects that write
    /// each other's dependencies recurse until the stack overflows. With
    /// `Some(n)`, a run that would nest deeper than `n` is skipped and logged.
    pub max_trigger_depth: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_RUNTIME_NAME.to_owned(),
            max_trigger_depth: None,
        }
    }
}

impl RuntimeConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the maximum effect nesting depth.
    pub fn with_max_trigger_depth(mut self, depth: usize) -> Self {
        self.max_trigger_depth = Some(depth);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
