//! Configuration models and loaders for the Mission Transpiler.
//!
//! Two inputs are handled here: the sectioned form file written by the GUI
//! ([`sectioned`]) and the tool settings describing the project layout and
//! where the simulator lives ([`settings`]).

use std::path::PathBuf;

use thiserror::Error;

pub mod sectioned;
pub mod settings;

pub use sectioned::{Section, SectionedConfig, parse};
pub use settings::{Settings, SimulatorSettings, load_settings};

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
