use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use mission_transpiler::export::report::{export_csv, read_report};
use mission_transpiler::plot::{PlotOptions, render_orbit};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render the XY orbit from a simulator report file"
)]
struct Cli {
    /// Whitespace-delimited report written by the simulator
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "GMAT_output/orbit_xy.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 900)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
    /// Skip caption and axis labels (no system font needed)
    #[arg(long, default_value_t = false)]
    no_labels: bool,
    /// Also export the parsed report as CSV ('-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table = read_report(&cli.input)?;
    if table.is_empty() {
        return Err(anyhow!(
            "No numeric rows in report {}",
            cli.input.display()
        ));
    }

    if let Some(csv_path) = &cli.csv {
        export_csv(&table, csv_path)?;
    }

    let options = PlotOptions {
        width: cli.width,
        height: cli.height,
        labels: !cli.no_labels,
    };
    let bounds = render_orbit(&table, &cli.output, &options)?;
    eprintln!(
        "Plotted {} samples to {} (x: {:.1}..{:.1} km, y: {:.1}..{:.1} km)",
        table.rows.len(),
        cli.output.display(),
        bounds.x.0,
        bounds.x.1,
        bounds.y.0,
        bounds.y.1
    );
    Ok(())
}
