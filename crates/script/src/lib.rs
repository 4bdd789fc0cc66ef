//! Mission script generation: resolve a parsed form into a [`MissionPlan`], render it,
//! and write the script where the simulator will pick it up.

use std::path::{Path, PathBuf};

use log::info;
use mission_config::SectionedConfig;
use thiserror::Error;

pub mod epoch;
pub mod model;
pub mod plan;
pub mod render;

pub use epoch::normalize_epoch;
pub use model::{
    BurnFrame, ForceModel, ImpulsiveBurn, MissionPlan, Propagator, Spacecraft, StateVector,
};
pub use plan::sanitize_name;
pub use render::MissionScript;

/// Directory, beside the script's own directory, that receives simulator output.
pub const OUTPUT_DIR_NAME: &str = "GMAT_output";
/// Report file written by the simulator.
pub const REPORT_FILE_NAME: &str = "DefaultReportFile.txt";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write script {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a generated script and the report it requests end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTarget {
    pub script_path: PathBuf,
    pub report_path: PathBuf,
}

impl ScriptTarget {
    /// Standard layout: `<dir>/x.script` reports into `<dir>/../GMAT_output/DefaultReportFile.txt`.
    pub fn beside<P: Into<PathBuf>>(script_path: P) -> Self {
        let script_path = script_path.into();
        let project_dir = script_path
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        let report_path = project_dir.join(OUTPUT_DIR_NAME).join(REPORT_FILE_NAME);
        Self {
            script_path,
            report_path,
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub plan: MissionPlan,
    pub text: String,
    pub script_path: PathBuf,
    /// Absolute path the simulator was told to write its report to.
    pub report_path: PathBuf,
}

/// Generate a script at `script_path` using the standard output layout.
pub fn generate<P: Into<PathBuf>>(
    config: &SectionedConfig,
    script_path: P,
) -> Result<GeneratedScript, ScriptError> {
    generate_into(config, &ScriptTarget::beside(script_path))
}

/// Generate a script for an explicit target, creating the report directory and
/// overwriting any previous script.
pub fn generate_into(
    config: &SectionedConfig,
    target: &ScriptTarget,
) -> Result<GeneratedScript, ScriptError> {
    // The simulator runs from its own install directory, so the report path must be absolute.
    let report_path = std::path::absolute(&target.report_path).map_err(|source| {
        ScriptError::OutputDir {
            path: target.report_path.clone(),
            source,
        }
    })?;
    if let Some(dir) = report_path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ScriptError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let plan = MissionPlan::from_config(config);
    let text = plan.render(&report_path).text();

    mission_export::script::write_script(&target.script_path, &text).map_err(|source| {
        ScriptError::Write {
            path: target.script_path.clone(),
            source,
        }
    })?;
    info!(
        "mission script for `{}` written to {}",
        plan.spacecraft.name,
        target.script_path.display()
    );

    Ok(GeneratedScript {
        plan,
        text,
        script_path: target.script_path.clone(),
        report_path,
    })
}
