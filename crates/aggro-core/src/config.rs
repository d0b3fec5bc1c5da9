//! Rendering configuration shared by the CLI and the YAML DSL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Indent rendered JSON.
    pub pretty: bool,

    /// Run stage placement checks before rendering.
    pub strict: bool,
}

impl RenderConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `AGGRO_PRETTY`: indent output (`1`, `true`, `yes`, `on`)
    /// - `AGGRO_STRICT`: validate stage placement before rendering
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("AGGRO_PRETTY") {
            if let Some(v) = parse_flag(&s) {
                cfg.pretty = v;
            }
        }

        if let Ok(s) = std::env::var("AGGRO_STRICT") {
            if let Some(v) = parse_flag(&s) {
                cfg.strict = v;
            }
        }

        cfg
    }

    pub fn render_value(&self, value: &Value) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(out)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
