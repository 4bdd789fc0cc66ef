//! Pipeline orchestrator that sequences transpilation, simulator execution, and reporting.
//!
//! Missing input and a missing simulator abort the run. A simulator that fails or
//! leaves no report only marks its stage as failed: the generated script is
//! still returned so the caller can inspect or rerun it.

use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use mission_config::{ConfigError, Settings};
use mission_export::report::{ReportTable, export_csv, read_report};
use mission_export::summary::{Metadata, write_summary};
use mission_runner::{RunnerError, Simulator, verify_report};
use mission_script::{GeneratedScript, ScriptError, ScriptTarget, generate_into};

use crate::plot::{PlotOptions, render_orbit};

/// The three sequential stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transpile,
    Execute,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transpile => "transpile",
            Self::Execute => "execute",
            Self::Report => "report",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Failed(String),
    Skipped,
}

impl StageOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Fatal pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("loading the form failed: {0}")]
    Config(#[from] ConfigError),
    #[error("script generation failed: {0}")]
    Script(#[from] ScriptError),
    #[error("simulator unavailable: {0}")]
    Simulator(#[from] RunnerError),
}

/// Which stages to run past transpilation.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub execute: bool,
    /// `None` disables the orbit plot.
    pub plot: Option<PlotOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            execute: true,
            plot: Some(PlotOptions::default()),
        }
    }
}

/// Outcome of every stage plus the artifacts that were produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub stages: Vec<(Stage, StageOutcome)>,
    pub script: GeneratedScript,
    pub report: Option<ReportTable>,
    pub report_csv: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub plot: Option<PathBuf>,
}

impl PipelineReport {
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    pub fn succeeded(&self) -> bool {
        !self.stages.iter().any(|(_, outcome)| outcome.is_failure())
    }
}

/// Parse the form and write the mission script; the report path comes from `settings`.
pub fn transpile(settings: &Settings) -> Result<GeneratedScript, PipelineError> {
    let config = mission_config::parse(settings.data_path())?;
    let target = ScriptTarget {
        script_path: settings.script_path(),
        report_path: settings.report_path(),
    };
    Ok(generate_into(&config, &target)?)
}

/// Run every enabled stage, locating the simulator from `settings`.
pub fn run_pipeline(
    settings: &Settings,
    options: &PipelineOptions,
) -> Result<PipelineReport, PipelineError> {
    let script = transpile(settings)?;
    if !options.execute {
        return Ok(skipped_after_transpile(script));
    }
    let simulator = Simulator::locate(&settings.simulator)?;
    Ok(execute_and_report(settings, options, &simulator, script))
}

/// Run every enabled stage with an already located simulator.
pub fn run_with_simulator(
    settings: &Settings,
    options: &PipelineOptions,
    simulator: &Simulator,
) -> Result<PipelineReport, PipelineError> {
    let script = transpile(settings)?;
    if !options.execute {
        return Ok(skipped_after_transpile(script));
    }
    Ok(execute_and_report(settings, options, simulator, script))
}

fn skipped_after_transpile(script: GeneratedScript) -> PipelineReport {
    PipelineReport {
        stages: vec![
            (Stage::Transpile, StageOutcome::Completed),
            (Stage::Execute, StageOutcome::Skipped),
            (Stage::Report, StageOutcome::Skipped),
        ],
        script,
        report: None,
        report_csv: None,
        summary: None,
        plot: None,
    }
}

fn execute_and_report(
    settings: &Settings,
    options: &PipelineOptions,
    simulator: &Simulator,
    script: GeneratedScript,
) -> PipelineReport {
    let mut report = skipped_after_transpile(script);

    let output = match simulator.run(&report.script.script_path) {
        Ok(output) => output,
        Err(err) => {
            warn!("simulator run failed: {err}");
            report.stages[1].1 = StageOutcome::Failed(err.to_string());
            return report;
        }
    };
    info!(
        "simulator finished ({} lines of output)",
        output.stdout.lines().count()
    );
    for line in output.stderr.lines().filter(|line| !line.trim().is_empty()) {
        warn!("simulator stderr: {line}");
    }
    report.stages[1].1 = StageOutcome::Completed;

    report.stages[2].1 = match collect_report(settings, options, &mut report) {
        Ok(()) => StageOutcome::Completed,
        Err(reason) => {
            warn!("reporting failed: {reason}");
            StageOutcome::Failed(reason)
        }
    };
    report
}

fn collect_report(
    settings: &Settings,
    options: &PipelineOptions,
    report: &mut PipelineReport,
) -> Result<(), String> {
    let report_path = report.script.report_path.clone();
    verify_report(&report_path).map_err(|err| err.to_string())?;
    let table = read_report(&report_path).map_err(|err| err.to_string())?;
    info!(
        "report {} holds {} rows",
        report_path.display(),
        table.rows.len()
    );

    let csv_path = settings.report_csv_path();
    export_csv(&table, &csv_path).map_err(|err| err.to_string())?;
    report.report_csv = Some(csv_path);

    let plan = &report.script.plan;
    let generated_utc = chrono::Utc::now().to_rfc3339();
    let meta = Metadata {
        spacecraft: &plan.spacecraft.name,
        central_body: plan.force_model.central_body,
        coordinate_system: &plan.spacecraft.coordinate_system,
        epoch: &plan.spacecraft.epoch,
        duration_days: plan.duration_days,
        script_path: &report.script.script_path,
        report_path: &report_path,
        generated_utc: &generated_utc,
    };
    let summary_path = settings.summary_path();
    write_summary(&summary_path, &meta, &table).map_err(|err| err.to_string())?;
    report.summary = Some(summary_path);

    if let Some(plot_options) = &options.plot {
        let plot_path = settings.plot_path();
        render_orbit(&table, &plot_path, plot_options).map_err(|err| err.to_string())?;
        report.plot = Some(plot_path);
    }

    report.report = Some(table);
    Ok(())
}
