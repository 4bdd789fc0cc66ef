//! Transpile the form front-end's saved data into a mission script.

use std::path::PathBuf;

use clap::Parser;
use mission_transpiler::config::{self, Settings, load_settings};
use mission_transpiler::script::{ScriptTarget, generate_into};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a mission script from the GUI's sectioned data file"
)]
struct Cli {
    /// Settings file (TOML or YAML) describing the project layout
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Sectioned data file (defaults to the settings' data file)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Script output path (defaults to the settings' script path)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Echo the generated script to stdout
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let input = cli.input.unwrap_or_else(|| settings.data_path());
    let target = match cli.output {
        Some(script_path) => ScriptTarget::beside(script_path),
        None => ScriptTarget {
            script_path: settings.script_path(),
            report_path: settings.report_path(),
        },
    };

    let form = config::parse(&input)?;
    let generated = generate_into(&form, &target)?;

    println!("Script written to : {}", generated.script_path.display());
    println!("Report expected at: {}", generated.report_path.display());
    if cli.print {
        println!("{}", "-".repeat(41));
        print!("{}", generated.text);
    }
    Ok(())
}
