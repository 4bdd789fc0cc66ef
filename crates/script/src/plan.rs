//! Resolution of raw form values into a [`MissionPlan`].

use log::debug;
use mission_config::{Section, SectionedConfig};
use mission_core::constants::*;
use mission_core::tables::{self, DEFAULT_REPORT_FIELDS};
use mission_core::values::{count_or, positive_or, real_or};

use crate::epoch::normalize_epoch;
use crate::model::{
    BurnFrame, ForceModel, ImpulsiveBurn, MissionPlan, Propagator, Spacecraft, StateVector,
};
use crate::render::{BURN, FORCE_MODEL, PROPAGATOR, REPORT_FILE};

/// Field labels as written by the form front-end.
pub mod keys {
    pub const SPACECRAFT_NAME: &str = "Nombre nave";
    pub const CENTRAL_BODY: &str = "Cuerpo central";
    pub const REFERENCE_FRAME: &str = "Sistema de referencia";
    pub const TIME_FORMAT: &str = "Formato de tiempo";

    pub const START_DATE: &str = "Fecha inicio";
    pub const DURATION: &str = "Paso temporal";

    pub const REPRESENTATION: &str = "Sistema de coordenadas";
    pub const CARTESIAN: [&str; 6] = ["x", "y", "z", "vx", "vy", "vz"];
    pub const KEPLERIAN: [&str; 6] = ["SMA", "ECC", "INC", "RAAN", "AOP", "TA"];

    pub const INTEGRATOR: &str = "Tipo de integrador";
    pub const INITIAL_STEP: &str = "Tamano de paso inicial";
    pub const ACCURACY: &str = "Precision (accuracy)";
    pub const MIN_STEP: &str = "Paso minimo";
    pub const MAX_STEP: &str = "Paso maximo";
    pub const MAX_STEP_ATTEMPTS: &str = "Intentos max. paso";

    pub const BURN_FRAME: &str = "Sistema de coordenadas";
    pub const BURN_ORIGIN: &str = "Origen";
    pub const BURN_AXES: &str = "Axes";
    pub const DELTA_V: [&str; 3] = ["Delta V Element 1", "Delta V Element 2", "Delta V Element 3"];

    pub const REPORT_VARIABLES: &str = "Variables";
}

/// Representation value selecting the Cartesian branch; anything else is Keplerian.
pub const CARTESIAN_REPRESENTATION: &str = "Cartesianas";

const DEFAULT_CENTRAL_BODY: &str = "Tierra";

/// Turn free text into a script identifier: spaces become `_`, anything outside
/// `[A-Za-z0-9_]` is dropped, and an empty result becomes `Sat`.
///
/// Names already taken by the script's other objects also become `Sat`, so
/// every object is declared once.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        DEFAULT_SPACECRAFT_NAME.to_string()
    } else if [FORCE_MODEL, PROPAGATOR, BURN, REPORT_FILE].contains(&name.as_str()) {
        debug!("spacecraft name `{name}` collides with a script object, using {DEFAULT_SPACECRAFT_NAME}");
        DEFAULT_SPACECRAFT_NAME.to_string()
    } else {
        name
    }
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn read_six(config: &SectionedConfig, keys: [&str; 6], defaults: [f64; 6]) -> [f64; 6] {
    let mut values = defaults;
    for (value, key) in values.iter_mut().zip(keys) {
        *value = real_or(config.get(Section::Spacecraft, key), *value);
    }
    values
}

fn read_state(config: &SectionedConfig) -> StateVector {
    let representation = config
        .get(Section::Spacecraft, keys::REPRESENTATION)
        .unwrap_or(CARTESIAN_REPRESENTATION);

    if representation == CARTESIAN_REPRESENTATION {
        let [x, y, z, vx, vy, vz] = read_six(config, keys::CARTESIAN, DEFAULT_CARTESIAN);
        StateVector::Cartesian {
            x,
            y,
            z,
            vx,
            vy,
            vz,
        }
    } else {
        let [sma, ecc, inc, raan, aop, ta] = read_six(config, keys::KEPLERIAN, DEFAULT_KEPLERIAN);
        StateVector::Keplerian {
            sma,
            ecc,
            inc,
            raan,
            aop,
            ta,
        }
    }
}

fn read_propagator(config: &SectionedConfig) -> Propagator {
    let get = |key| config.get(Section::Propagate, key);
    let integrator = non_blank(get(keys::INTEGRATOR))
        .unwrap_or(DEFAULT_INTEGRATOR)
        .to_string();

    Propagator {
        integrator,
        initial_step_s: positive_or(get(keys::INITIAL_STEP), DEFAULT_INITIAL_STEP_S),
        accuracy: positive_or(get(keys::ACCURACY), DEFAULT_ACCURACY),
        min_step_s: positive_or(get(keys::MIN_STEP), DEFAULT_MIN_STEP_S),
        max_step_s: positive_or(get(keys::MAX_STEP), DEFAULT_MAX_STEP_S),
        max_step_attempts: count_or(get(keys::MAX_STEP_ATTEMPTS), DEFAULT_MAX_STEP_ATTEMPTS),
    }
}

fn read_burn(config: &SectionedConfig, central_body: &str) -> ImpulsiveBurn {
    let get = |key| config.get(Section::ImpulsiveBurn, key);
    let delta_v = keys::DELTA_V.map(|key| real_or(get(key), 0.0));

    ImpulsiveBurn {
        frame: BurnFrame::from_form(non_blank(get(keys::BURN_FRAME)).unwrap_or(LOCAL_BURN_FRAME)),
        origin: tables::body_identifier(non_blank(get(keys::BURN_ORIGIN)).unwrap_or(central_body)),
        axes: non_blank(get(keys::BURN_AXES))
            .unwrap_or(DEFAULT_BURN_AXES)
            .to_string(),
        delta_v,
    }
}

fn read_report_fields(config: &SectionedConfig) -> Vec<&'static str> {
    let selected: Vec<&'static str> = config
        .get(Section::ReportFile, keys::REPORT_VARIABLES)
        .map(|list| {
            list.split(',')
                .filter_map(|label| {
                    let field = tables::report_field(label);
                    if field.is_none() && !label.trim().is_empty() {
                        debug!("report variable `{}` is not supported", label.trim());
                    }
                    field
                })
                .collect()
        })
        .unwrap_or_default();

    if selected.is_empty() {
        DEFAULT_REPORT_FIELDS.to_vec()
    } else {
        selected
    }
}

impl MissionPlan {
    /// Resolve every form field, substituting documented defaults for anything
    /// missing or unparsable. Never fails.
    pub fn from_config(config: &SectionedConfig) -> Self {
        let general = |key| config.get(Section::General, key);

        let name = sanitize_name(general(keys::SPACECRAFT_NAME).unwrap_or_default());
        let central_form = general(keys::CENTRAL_BODY).unwrap_or(DEFAULT_CENTRAL_BODY);
        let central_body = tables::body_identifier(central_form);
        let coordinate_system = tables::coordinate_system(
            central_body,
            general(keys::REFERENCE_FRAME).unwrap_or_default(),
        );
        let date_format = tables::time_format(general(keys::TIME_FORMAT).unwrap_or("UTC"));

        let epoch = normalize_epoch(
            config
                .get(Section::Time, keys::START_DATE)
                .unwrap_or_default(),
        );
        let duration_days = real_or(
            config.get(Section::Time, keys::DURATION),
            DEFAULT_DURATION_DAYS,
        );

        let force_body = config
            .get(Section::Propagate, keys::CENTRAL_BODY)
            .unwrap_or(central_form);

        let burn = read_burn(config, central_form);

        Self {
            spacecraft: Spacecraft {
                name,
                date_format,
                epoch,
                coordinate_system,
                state: read_state(config),
            },
            force_model: ForceModel {
                central_body: tables::body_identifier(force_body),
            },
            propagator: read_propagator(config),
            burn: burn.is_active().then_some(burn),
            report_fields: read_report_fields(config),
            duration_days,
        }
    }
}
