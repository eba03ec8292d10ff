use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use flowtrack_core::pipeline::config::PipelineConfig;
use tracing::debug;

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML)
    pub config: PathBuf,

    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = PipelineConfig::from_toml_file(&args.config)
        .with_context(|| format!("Invalid pipeline config {}", args.config.display()))?;
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    debug!(config = ?config, "Loaded pipeline config");
    super::execute(&config)
}
