use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use flowtrack_core::pipeline::config::{InputSource, PipelineConfig, PipelineMode};

use super::TrackingArgs;

#[derive(Args)]
pub struct FlowArgs {
    /// First frame (image file)
    pub first: PathBuf,

    /// Second frame (image file)
    pub second: PathBuf,

    /// Output prefix; writes <prefix>_h and <prefix>_f
    #[arg(short, long, default_value = "flow")]
    pub output: PathBuf,

    /// Save the motion-compensation mask as PNG
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Skip background-motion compensation
    #[arg(long)]
    pub no_compensation: bool,

    /// Difference threshold (0-1) for the compensation mask
    #[arg(long)]
    pub threshold: Option<f32>,

    #[command(flatten)]
    pub tracking: TrackingArgs,
}

pub fn run(args: &FlowArgs) -> Result<()> {
    let mut flow = args.tracking.flow_config();
    flow.compensation.enabled = !args.no_compensation;
    if let Some(threshold) = args.threshold {
        flow.compensation.threshold = threshold;
    }

    let config = PipelineConfig {
        output: args.output.clone(),
        mode: PipelineMode::Flow,
        mask_output: args.mask.clone(),
        input: InputSource::Images(vec![args.first.clone(), args.second.clone()]),
        flow,
        tracker: args.tracking.tracker_config(),
    };
    super::execute(&config)
}
