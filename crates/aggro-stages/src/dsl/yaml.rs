//! YAML → Pipeline loader.
//!
//! Example:
//! ```yaml
//! config: { pretty: true, strict: true }
//! stages:
//!   - { $match: { status: active } }
//!   - { $sort: { createdAt: -1 } }
//!   - { $limit: 10 }
//! ```
//!
//! Stages are written in MongoDB's own syntax and kept as raw stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::trace::emit_event;
use aggro_core::{Error, RenderConfig, Result};

use crate::pipeline::Pipeline;
use crate::stage::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PipelineFile {
    #[serde(default)]
    config: Option<PipelineConfig>,
    stages: Vec<Value>,
}

/// Optional `config` block. Unset keys leave the base config alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pretty: Option<bool>,
    pub strict: Option<bool>,
}

impl PipelineConfig {
    pub fn apply_to(&self, config: &mut RenderConfig) {
        if let Some(pretty) = self.pretty {
            config.pretty = pretty;
        }
        if let Some(strict) = self.strict {
            config.strict = strict;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub config: PipelineConfig,
    pub pipeline: Pipeline,
}

pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline> {
    let file: PipelineFile =
        serde_yaml::from_str(yaml_src).map_err(|e| Error::Config(e.to_string()))?;

    let mut pipeline = Pipeline::new();
    for (i, value) in file.stages.into_iter().enumerate() {
        let doc = require_document(value, &format!("stage {i}"))?;
        let stage =
            Stage::raw(doc).map_err(|e| Error::MalformedStage(format!("stage {i}: {e}")))?;
        pipeline.add_stage(stage);
    }

    emit_event("dsl.parse_yaml", &[("stages", pipeline.len().to_string())]);

    Ok(ParsedPipeline {
        config: file.config.unwrap_or_default(),
        pipeline,
    })
}
