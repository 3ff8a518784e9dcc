use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub use_colors: bool,
    pub format: OutputFormat,
    pub include_value_kinds: bool,
    /// Append size and alignment to each lowered type that has a layout.
    pub include_layout: bool,
    pub indent: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            format: OutputFormat::Text,
            include_value_kinds: true,
            include_layout: false,
            indent: 2,
        }
    }
}

impl EmitterConfig {
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}
