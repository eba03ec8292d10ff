use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use flowtrack_core::pipeline::config::{InputSource, PipelineConfig, PipelineMode};

use super::TrackingArgs;

#[derive(Args)]
pub struct TrajectoriesArgs {
    /// Image files in temporal order, or a single SER file
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Trajectory output file
    #[arg(short, long, default_value = "trajectories.txt")]
    pub output: PathBuf,

    /// Border band in pixels where trajectories stop growing
    #[arg(long, default_value = "10.0")]
    pub margin: f32,

    #[command(flatten)]
    pub tracking: TrackingArgs,
}

pub fn run(args: &TrajectoriesArgs) -> Result<()> {
    let input = InputSource::from_paths(&args.inputs);
    if let InputSource::Images(ref paths) = input {
        if paths.len() < 2 {
            bail!("Need a SER file or at least two images");
        }
    }

    let mut flow = args.tracking.flow_config();
    flow.border_margin = args.margin;

    let config = PipelineConfig {
        output: args.output.clone(),
        mode: PipelineMode::Trajectories,
        mask_output: None,
        input,
        flow,
        tracker: args.tracking.tracker_config(),
    };
    super::execute(&config)
}
