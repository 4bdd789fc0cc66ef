//! Mission script emission.

use std::fmt;
use std::path::Path;

use mission_core::constants::REPORT_PRECISION;
use mission_core::values::format_real;

use crate::model::MissionPlan;

pub const FORCE_MODEL: &str = "FM";
pub const PROPAGATOR: &str = "Prop";
pub const BURN: &str = "ImpBurn";
pub const REPORT_FILE: &str = "DefaultReportFile";

/// Rendered script, one statement (or blank separator) per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MissionScript {
    lines: Vec<String>,
}

impl MissionScript {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full text; every line, including the last, ends with `\n`.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MissionScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Report paths are written with `/` separators, which the simulator accepts on every platform.
fn script_path_literal(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl MissionPlan {
    /// Render the plan; `report_path` is embedded verbatim as the report file name.
    pub fn render(&self, report_path: &Path) -> MissionScript {
        let mut script = MissionScript::default();
        let sc = &self.spacecraft;
        let sat = sc.name.as_str();

        script.push(format!("Create Spacecraft {sat};"));
        script.push(format!("Create ForceModel {FORCE_MODEL};"));
        script.push(format!("Create Propagator {PROPAGATOR};"));
        if self.burn.is_some() {
            script.push(format!("Create ImpulsiveBurn {BURN};"));
        }
        script.push(format!("Create ReportFile {REPORT_FILE};"));
        script.blank();

        script.push(format!("{sat}.DateFormat = {};", sc.date_format));
        script.push(format!("{sat}.Epoch = '{}';", sc.epoch));
        script.push(format!("{sat}.CoordinateSystem = {};", sc.coordinate_system));
        script.push(format!(
            "{sat}.DisplayStateType = {};",
            sc.state.display_state_type()
        ));
        for (element, value) in sc.state.elements() {
            script.push(format!("{sat}.{element} = {};", format_real(value)));
        }
        script.blank();

        let body = self.force_model.central_body;
        script.push(format!("{FORCE_MODEL}.CentralBody = {body};"));
        script.push(format!("{FORCE_MODEL}.PrimaryBodies = {{{body}}};"));
        script.push(format!("{FORCE_MODEL}.Drag = None;"));
        script.push(format!("{FORCE_MODEL}.SRP = Off;"));
        script.blank();

        let prop = &self.propagator;
        script.push(format!("{PROPAGATOR}.Type = {};", prop.integrator));
        script.push(format!("{PROPAGATOR}.FM = {FORCE_MODEL};"));
        script.push(format!(
            "{PROPAGATOR}.InitialStepSize = {};",
            format_real(prop.initial_step_s)
        ));
        script.push(format!(
            "{PROPAGATOR}.Accuracy = {};",
            format_real(prop.accuracy)
        ));
        script.push(format!(
            "{PROPAGATOR}.MinStep = {};",
            format_real(prop.min_step_s)
        ));
        script.push(format!(
            "{PROPAGATOR}.MaxStep = {};",
            format_real(prop.max_step_s)
        ));
        script.push(format!(
            "{PROPAGATOR}.MaxStepAttempts = {};",
            prop.max_step_attempts
        ));
        script.blank();

        if let Some(burn) = &self.burn {
            script.push(format!(
                "{BURN}.CoordinateSystem = {};",
                burn.frame.resolve(&sc.coordinate_system)
            ));
            script.push(format!("{BURN}.Origin = {};", burn.origin));
            script.push(format!("{BURN}.Axes = {};", burn.axes));
            for (index, dv) in burn.delta_v.iter().enumerate() {
                script.push(format!("{BURN}.Element{} = {};", index + 1, format_real(*dv)));
            }
            // No tanks are modelled.
            script.push(format!("{BURN}.DecrementMass = false;"));
            script.blank();
        }

        let fields: Vec<String> = self
            .report_fields
            .iter()
            .map(|field| format!("{sat}.{field}"))
            .collect();
        script.push(format!(
            "{REPORT_FILE}.Filename = '{}';",
            script_path_literal(report_path)
        ));
        script.push(format!("{REPORT_FILE}.WriteHeaders = true;"));
        script.push(format!("{REPORT_FILE}.Precision = {REPORT_PRECISION};"));
        script.push(format!("{REPORT_FILE}.Add = {{{}}};", fields.join(", ")));
        script.blank();

        let report_statement = format!("Report {REPORT_FILE} {};", fields.join(" "));
        script.push("BeginMissionSequence;");
        script.push(report_statement.clone());
        if self.burn.is_some() {
            script.push(format!("Maneuver {BURN}({sat});"));
        }
        script.push(format!(
            "Propagate {PROPAGATOR}({sat}) {{{sat}.ElapsedDays = {}}};",
            format_real(self.duration_days)
        ));
        script.push(report_statement);

        script
    }
}
