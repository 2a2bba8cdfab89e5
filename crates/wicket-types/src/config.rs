//! Widget configuration.

use serde::Deserialize;

use crate::error::Result;

/// Configuration for a terminal widget instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Prompt string rendered before the input line.
    pub prompt: String,
    /// Welcome banner appended as the first transcript entry on attach.
    pub welcome: String,
    /// Maximum number of history entries to retain (oldest dropped first).
    pub max_history: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            welcome: "wicket terminal ready.".to_string(),
            max_history: 100,
        }
    }
}

impl WidgetConfig {
    /// Parse a configuration from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
