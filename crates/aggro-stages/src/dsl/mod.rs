pub mod yaml;

pub use yaml::{parse_yaml_pipeline, ParsedPipeline, PipelineConfig};
