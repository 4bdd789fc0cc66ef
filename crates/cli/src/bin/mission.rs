use std::path::PathBuf;

use clap::Parser;
use mission_transpiler::config::{Settings, load_settings};
use mission_transpiler::pipeline::{PipelineOptions, StageOutcome, run_pipeline};
use mission_transpiler::plot::PlotOptions;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Transpile the saved form, run the simulator, and plot its report"
)]
struct Cli {
    /// Settings file (TOML or YAML); defaults to the standard layout under --base-dir
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Project directory holding Datos/, Transpiler_output/, and GMAT_output/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Stop after writing the script
    #[arg(long, default_value_t = false)]
    skip_run: bool,

    /// Do not render the orbit plot
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    /// Render the plot without caption and axis labels
    #[arg(long, default_value_t = false)]
    no_labels: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::rooted_at(&cli.base_dir),
    };
    let options = PipelineOptions {
        execute: !cli.skip_run,
        plot: (!cli.no_plot).then_some(PlotOptions {
            labels: !cli.no_labels,
            ..PlotOptions::default()
        }),
    };

    let report = run_pipeline(&settings, &options)?;
    let plan = &report.script.plan;

    println!("=== Mission Pipeline ===");
    println!("Spacecraft      : {}", plan.spacecraft.name);
    println!("Coordinate sys. : {}", plan.spacecraft.coordinate_system);
    println!("Epoch           : {}", plan.spacecraft.epoch);
    println!("Duration        : {} days", plan.duration_days);
    println!(
        "Burn            : {}",
        match &plan.burn {
            Some(burn) => format!(
                "dv = [{}, {}, {}] km/s",
                burn.delta_v[0], burn.delta_v[1], burn.delta_v[2]
            ),
            None => "none".to_string(),
        }
    );
    println!("Script          : {}", report.script.script_path.display());
    for (stage, outcome) in &report.stages {
        let status = match outcome {
            StageOutcome::Completed => "ok".to_string(),
            StageOutcome::Skipped => "skipped".to_string(),
            StageOutcome::Failed(reason) => format!("FAILED ({reason})"),
        };
        println!("{:<15} : {}", format!("Stage {stage}"), status);
    }
    if let Some(table) = &report.report {
        println!("Report rows     : {}", table.rows.len());
    }
    for (label, path) in [
        ("Report CSV", &report.report_csv),
        ("Summary", &report.summary),
        ("Plot", &report.plot),
    ] {
        if let Some(path) = path {
            println!("{label:<15} : {}", path.display());
        }
    }

    if !report.succeeded() {
        anyhow::bail!("script generated, but a later stage failed");
    }
    Ok(())
}
