pub mod config;
pub mod flow;
pub mod info;
pub mod run;
pub mod trajectories;

use anyhow::Result;
use clap::Args;
use flowtrack_core::pipeline::config::{FlowConfig, PipelineConfig, TrackerConfig};
use flowtrack_core::pipeline::run_pipeline_reported;

use crate::progress::BarReporter;
use crate::summary::{print_config_summary, print_run_summary};

/// Grid and tracker options shared by the flow and trajectory commands.
#[derive(Args)]
pub struct TrackingArgs {
    /// Spacing in pixels between seeded grid points
    #[arg(long, default_value = "10")]
    pub step: usize,

    /// Per-axis displacement above which a vector counts as motion
    #[arg(long, default_value = "1.0")]
    pub min_vector: f32,

    /// Lucas-Kanade window size in pixels
    #[arg(long, default_value = "40")]
    pub window: usize,

    /// Maximum pyramid level
    #[arg(long, default_value = "5")]
    pub levels: usize,
}

impl TrackingArgs {
    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            pixel_step: self.step,
            min_vector_size: self.min_vector,
            ..Default::default()
        }
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            window_size: self.window,
            max_level: self.levels,
            ..Default::default()
        }
    }
}

/// Print the config, run it with a progress bar and print what was produced.
pub fn execute(config: &PipelineConfig) -> Result<()> {
    print_config_summary(config);

    let reporter = BarReporter::new();
    let summary = run_pipeline_reported(config, &reporter)?;
    reporter.finish();

    print_run_summary(&summary);
    Ok(())
}
