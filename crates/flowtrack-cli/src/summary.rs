use console::Style;
use flowtrack_core::pipeline::config::{InputSource, PipelineConfig, PipelineMode};
use flowtrack_core::pipeline::PipelineSummary;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    disabled: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            warning: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_config_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(format!("FlowTrack {}", config.mode)));
    println!();

    match &config.input {
        InputSource::Ser(path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.path.apply_to(path.display())
        ),
        InputSource::Images(paths) => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.value.apply_to(format!("{} image(s)", paths.len()))
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Step"),
        s.value.apply_to(format!("{} px", config.flow.pixel_step))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Min vector"),
        s.value.apply_to(config.flow.min_vector_size)
    );

    match config.mode {
        PipelineMode::Trajectories => println!(
            "  {:<14}{}",
            s.label.apply_to("Border"),
            s.value.apply_to(format!("{} px", config.flow.border_margin))
        ),
        PipelineMode::Flow if config.flow.compensation.enabled => println!(
            "  {:<14}{}",
            s.label.apply_to("Compensation"),
            s.value
                .apply_to(format!("threshold {:.3}", config.flow.compensation.threshold))
        ),
        PipelineMode::Flow => println!(
            "  {:<14}{}",
            s.label.apply_to("Compensation"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tracker"),
        s.value.apply_to(format!(
            "window {} / levels {} / iterations {}",
            config.tracker.window_size, config.tracker.max_level, config.tracker.max_iterations
        ))
    );
    println!();
}

pub fn print_run_summary(summary: &PipelineSummary) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!(
            "{} ({}x{})",
            summary.frames, summary.width, summary.height
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Seeded"),
        s.value.apply_to(summary.seeded)
    );
    if summary.mode == PipelineMode::Trajectories {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Complete"),
            s.value.apply_to(summary.complete_trajectories)
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Moving"),
        s.value.apply_to(summary.significant_vectors)
    );
    if let Some(ref reason) = summary.compensation_error {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Compensation"),
            s.warning.apply_to(reason)
        );
    }
    for path in &summary.outputs {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Wrote"),
            s.path.apply_to(path.display())
        );
    }
    println!();
}
