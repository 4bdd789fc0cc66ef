//! Discovery and invocation of the console simulator.
//!
//! The simulator runs synchronously from its own install directory with no
//! timeout; the caller blocks until the process exits.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use mission_config::SimulatorSettings;
use thiserror::Error;

/// Environment variable naming the simulator binary explicitly.
pub const ENV_OVERRIDE: &str = "GMAT_CONSOLE";

/// Console binary name searched for on `PATH`.
pub const CONSOLE_BINARY: &str = "GmatConsole";

/// Default install locations checked after any configured candidates.
pub const KNOWN_INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\GMAT\bin\GmatConsole.exe",
    r"C:\Program Files (x86)\GMAT\bin\GmatConsole.exe",
    r"C:\Program Files (x86)\GMAT-R2019aBeta-Windows-x64-public\bin\GmatConsole.exe",
    "/opt/GMAT/bin/GmatConsole",
    "/usr/local/GMAT/bin/GmatConsole",
];

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("simulator not found; searched {} location(s)", .searched.len())]
    SimulatorNotFound { searched: Vec<PathBuf> },
    #[error("failed to launch {executable}: {source}")]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("simulator exited with {}: {stderr}", describe_exit(.code))]
    ExecutionFailed { code: Option<i32>, stderr: String },
    #[error("simulator finished but no report was written to {path}")]
    ReportNotFound { path: PathBuf },
}

/// Output captured from a successful run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A located simulator binary.
#[derive(Debug, Clone)]
pub struct Simulator {
    executable: PathBuf,
    run_flag: String,
}

impl Simulator {
    pub fn new<P: Into<PathBuf>>(executable: P, run_flag: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            run_flag: run_flag.into(),
        }
    }

    /// Locate the simulator using the settings and the [`ENV_OVERRIDE`] variable.
    pub fn locate(settings: &SimulatorSettings) -> Result<Self, RunnerError> {
        let env_override = std::env::var_os(ENV_OVERRIDE).map(PathBuf::from);
        Self::locate_with(settings, env_override)
    }

    /// Locate the simulator. Candidates are tried in order: the configured
    /// executable, `env_override`, configured search paths, the known install
    /// paths, and finally `PATH`.
    pub fn locate_with(
        settings: &SimulatorSettings,
        env_override: Option<PathBuf>,
    ) -> Result<Self, RunnerError> {
        let candidates: Vec<PathBuf> = settings
            .executable
            .iter()
            .cloned()
            .chain(env_override)
            .chain(settings.search_paths.iter().cloned())
            .chain(KNOWN_INSTALL_PATHS.iter().map(PathBuf::from))
            .collect();

        for candidate in &candidates {
            if candidate.is_file() {
                info!("using simulator at {}", candidate.display());
                return Ok(Self::new(candidate, settings.run_flag.clone()));
            }
            debug!("no simulator at {}", candidate.display());
        }

        match which::which(CONSOLE_BINARY) {
            Ok(found) => {
                info!("using simulator from PATH at {}", found.display());
                Ok(Self::new(found, settings.run_flag.clone()))
            }
            Err(_) => Err(RunnerError::SimulatorNotFound {
                searched: candidates,
            }),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Directory the simulator is launched from: the one holding the binary.
    pub fn working_dir(&self) -> &Path {
        self.executable
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Run `script` and wait for the simulator to exit.
    pub fn run(&self, script: &Path) -> Result<RunOutput, RunnerError> {
        let script = std::path::absolute(script).unwrap_or_else(|_| script.to_path_buf());
        let executable = std::path::absolute(&self.executable)
            .unwrap_or_else(|_| self.executable.clone());
        info!(
            "running {} {} {}",
            executable.display(),
            self.run_flag,
            script.display()
        );

        let output = Command::new(&executable)
            .arg(&self.run_flag)
            .arg(&script)
            .current_dir(self.working_dir())
            .output()
            .map_err(|source| RunnerError::Launch {
                executable: executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stdout.lines() {
            debug!("simulator: {line}");
        }

        if !output.status.success() {
            return Err(RunnerError::ExecutionFailed {
                code: output.status.code(),
                stderr: tail(&stderr, 20),
            });
        }
        Ok(RunOutput { stdout, stderr })
    }
}

/// Confirm the simulator left a report at `path`.
pub fn verify_report(path: &Path) -> Result<(), RunnerError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RunnerError::ReportNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
