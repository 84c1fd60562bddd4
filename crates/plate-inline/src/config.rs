use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::{FormatSet, builtin_formats};
use crate::toolbar::DEFAULT_TOOLBAR_OFFSET;

pub const DEFAULT_PLACEHOLDER: &str = "Start typing here...";
const DEFAULT_ACTIVE_COLOR: &str = "#606263";

fn default_formats() -> Vec<String> {
    builtin_formats().into_iter().map(|f| f.label).collect()
}

fn default_active_color() -> String {
    DEFAULT_ACTIVE_COLOR.to_string()
}

fn default_toolbar_offset() -> f32 {
    DEFAULT_TOOLBAR_OFFSET
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Labels of the formats the toolbar offers, in display order.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default = "default_active_color")]
    pub active_color: String,
    #[serde(default = "default_toolbar_offset")]
    pub toolbar_offset: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            placeholder: None,
            active_color: default_active_color(),
            toolbar_offset: default_toolbar_offset(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn placeholder_text(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }

    pub fn enabled_formats(&self) -> FormatSet {
        FormatSet::from_labels(&self.formats)
    }
}
