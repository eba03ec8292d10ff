use tracing::{info, warn};

use crate::compensation::DltPerspective;
use crate::error::{FlowTrackError, Result};
use crate::flow::{build_trajectories_reported, compute_flow};
use crate::frame::Frame;
use crate::io::flow_writer::{write_flow, write_trajectories_file};
use crate::io::image_io::{load_images, save_png};
use crate::io::ser::SerReader;
use crate::track::PyramidalLk;

use super::config::{InputSource, PipelineConfig, PipelineMode};
use super::types::{NoOpReporter, PipelineStage, PipelineSummary, ProgressReporter};

/// Read every frame of the configured input.
pub fn load_frames(source: &InputSource) -> Result<Vec<Frame>> {
    match source {
        InputSource::Images(paths) => load_images(paths),
        InputSource::Ser(path) => {
            let reader = SerReader::open(path)?;
            info!(
                total_frames = reader.frame_count(),
                width = reader.header.width,
                height = reader.header.height,
                "Reading SER file"
            );
            reader.frames().collect()
        }
    }
}

/// Run the configured pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    run_pipeline_reported(config, &NoOpReporter)
}

/// Load frames, track them with pyramidal Lucas-Kanade and write results.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineSummary> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Reading, None);
    let frames = load_frames(&config.input)?;
    reporter.finish_stage();

    let (width, height) = frames
        .first()
        .map(|f| f.dimensions())
        .ok_or(FlowTrackError::EmptySequence)?;
    let tracker = PyramidalLk::new(config.tracker.clone())?;

    let mut summary = PipelineSummary {
        mode: config.mode,
        frames: frames.len(),
        width,
        height,
        seeded: 0,
        complete_trajectories: 0,
        significant_vectors: 0,
        outputs: Vec::new(),
        compensation_error: None,
    };

    match config.mode {
        PipelineMode::Flow => {
            let [first, second, ..] = frames.as_slice() else {
                return Err(FlowTrackError::Config(
                    "flow mode needs at least two frames".into(),
                ));
            };

            reporter.begin_stage(PipelineStage::Tracking, Some(1));
            let result = compute_flow(first, second, &config.flow, &tracker, &DltPerspective)?;
            reporter.advance(1);
            reporter.finish_stage();

            summary.seeded = result.field.populated_count();
            summary.significant_vectors = result.significant_vectors;

            reporter.begin_stage(PipelineStage::Writing, None);
            let (h_path, v_path) = write_flow(&result.field, &config.output, config.flow.pixel_step)?;
            summary.outputs.push(h_path);
            summary.outputs.push(v_path);

            match (&result.compensation, &config.mask_output) {
                (Some(Ok(mask)), Some(mask_path)) => {
                    save_png(mask, mask_path)?;
                    summary.outputs.push(mask_path.clone());
                }
                (Some(Err(e)), _) => {
                    summary.compensation_error = Some(e.to_string());
                    if config.mask_output.is_some() {
                        warn!(error = %e, "No compensation mask written");
                    }
                }
                _ => {}
            }
            reporter.finish_stage();
        }
        PipelineMode::Trajectories => {
            let result =
                build_trajectories_reported(&frames, &config.flow, &tracker, reporter)?;
            summary.seeded = result.seeded;
            summary.complete_trajectories = result.trajectories.len();
            summary.significant_vectors = result.significant_vectors;

            reporter.begin_stage(PipelineStage::Writing, None);
            write_trajectories_file(&result.trajectories, &config.output)?;
            summary.outputs.push(config.output.clone());
            let (h_path, v_path) = write_flow(&result.field, &config.output, config.flow.pixel_step)?;
            summary.outputs.push(h_path);
            summary.outputs.push(v_path);
            reporter.finish_stage();
        }
    }

    info!(
        mode = %summary.mode,
        outputs = summary.outputs.len(),
        "Pipeline complete"
    );
    Ok(summary)
}
