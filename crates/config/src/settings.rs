//! Project layout and simulator lookup settings.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Where the tool reads its input and writes its artifacts.
///
/// Relative entries are resolved against `base_dir`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub data_file: PathBuf,
    pub script_file: PathBuf,
    pub output_dir: PathBuf,
    pub report_file_name: String,
    pub plot_file: PathBuf,
    pub simulator: SimulatorSettings,
}

/// How to find and launch the console simulator.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Explicit binary; skips the search when set.
    pub executable: Option<PathBuf>,
    /// Extra candidates tried before the built-in install locations.
    pub search_paths: Vec<PathBuf>,
    /// Flag telling the binary to run a script and exit.
    pub run_flag: String,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            executable: None,
            search_paths: Vec::new(),
            run_flag: "--run".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            data_file: PathBuf::from("Datos/datos_guardados.txt"),
            script_file: PathBuf::from("Transpiler_output/demo.script"),
            output_dir: PathBuf::from("GMAT_output"),
            report_file_name: "DefaultReportFile.txt".to_string(),
            plot_file: PathBuf::from("GMAT_output/orbit_xy.png"),
            simulator: SimulatorSettings::default(),
        }
    }
}

impl Settings {
    /// Default layout under `base_dir`.
    pub fn rooted_at<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn data_path(&self) -> PathBuf {
        self.resolve(&self.data_file)
    }

    pub fn script_path(&self) -> PathBuf {
        self.resolve(&self.script_file)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir().join(&self.report_file_name)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.resolve(&self.plot_file)
    }

    /// CSV copy of the report, next to the report itself.
    pub fn report_csv_path(&self) -> PathBuf {
        self.report_path().with_extension("csv")
    }

    /// JSON run summary, next to the report itself.
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir().join("run_summary.json")
    }
}

/// Load settings from a TOML (`.toml`) or YAML (anything else) file.
///
/// A relative `base_dir` is taken relative to the settings file's directory.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let mut settings: Settings = if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };

    if settings.base_dir.is_relative() {
        if let Some(parent) = path.parent() {
            settings.base_dir = parent.join(&settings.base_dir);
        }
    }
    Ok(settings)
}
