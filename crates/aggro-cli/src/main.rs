//! mongo-aggro CLI: validate, render and fingerprint YAML pipelines.

use aggro_core::RenderConfig;
use aggro_stages::{parse_yaml_pipeline, ParsedPipeline, PipelineConfig};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mongo-aggro")]
#[command(about = "Typed MongoDB aggregation pipelines from YAML", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check stage syntax and placement
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Print the pipeline as MongoDB JSON
    Render {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Indent output (overrides config)
        #[arg(long)]
        pretty: bool,

        /// Validate stage placement before rendering (overrides config)
        #[arg(long)]
        strict: bool,
    },

    /// Print the blake3 fingerprint of the rendered pipeline
    Fingerprint {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Validate { pipeline } => {
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Render {
            pipeline,
            pretty,
            strict,
        } => {
            if let Err(e) = render_pipeline(&pipeline, pretty, strict) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Fingerprint { pipeline } => {
            if let Err(e) = fingerprint_pipeline(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path) -> Result<ParsedPipeline, Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    tracing::info!(
        path = %path.display(),
        stages = parsed.pipeline.len(),
        "loaded pipeline"
    );
    Ok(parsed)
}

fn validate_pipeline(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load(path)?;
    parsed.pipeline.validate()?;
    Ok(())
}

fn render_pipeline(
    path: &Path,
    pretty: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load(path)?;
    let config = resolve_config(RenderConfig::from_env(), &parsed.config, pretty, strict);
    if config.strict {
        parsed.pipeline.validate()?;
    }
    let value = serde_json::to_value(&parsed.pipeline)?;
    println!("{}", config.render_value(&value)?);
    Ok(())
}

fn fingerprint_pipeline(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load(path)?;
    println!("{}", parsed.pipeline.fingerprint()?);
    Ok(())
}

/// Environment, then the YAML `config` block, then CLI flags. Flags can
/// only switch options on.
fn resolve_config(
    base: RenderConfig,
    doc: &PipelineConfig,
    pretty: bool,
    strict: bool,
) -> RenderConfig {
    let mut config = base;
    doc.apply_to(&mut config);
    if pretty {
        config.pretty = true;
    }
    if strict {
        config.strict = true;
    }
    config
}
