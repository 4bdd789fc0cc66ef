//! Form-to-simulator bridge: transpile the GUI's sectioned form into a mission
//! script, run the console simulator on it, and plot the report it writes.
//!
//! The workspace crates are re-exported so binaries and tests only depend on
//! this facade.

pub mod pipeline;
pub mod plot;

pub use mission_config as config;
pub use mission_core as common;
pub use mission_export as export;
pub use mission_runner as runner;
pub use mission_script as script;
