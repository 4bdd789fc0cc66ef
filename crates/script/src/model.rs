//! Typed mission description resolved from the raw form values.

use mission_core::constants::LOCAL_BURN_FRAME;

/// Initial state in one of the two representations the form offers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateVector {
    /// Position in km, velocity in km/s.
    Cartesian {
        x: f64,
        y: f64,
        z: f64,
        vx: f64,
        vy: f64,
        vz: f64,
    },
    /// Semi-major axis in km, angles in degrees.
    Keplerian {
        sma: f64,
        ecc: f64,
        inc: f64,
        raan: f64,
        aop: f64,
        ta: f64,
    },
}

impl StateVector {
    /// Value of the spacecraft's `DisplayStateType` property.
    pub fn display_state_type(&self) -> &'static str {
        match self {
            Self::Cartesian { .. } => "Cartesian",
            Self::Keplerian { .. } => "Keplerian",
        }
    }

    /// Property names and values in emission order.
    pub fn elements(&self) -> [(&'static str, f64); 6] {
        match *self {
            Self::Cartesian {
                x,
                y,
                z,
                vx,
                vy,
                vz,
            } => [
                ("X", x),
                ("Y", y),
                ("Z", z),
                ("VX", vx),
                ("VY", vy),
                ("VZ", vz),
            ],
            Self::Keplerian {
                sma,
                ecc,
                inc,
                raan,
                aop,
                ta,
            } => [
                ("SMA", sma),
                ("ECC", ecc),
                ("INC", inc),
                ("RAAN", raan),
                ("AOP", aop),
                ("TA", ta),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spacecraft {
    pub name: String,
    pub date_format: &'static str,
    pub epoch: String,
    pub coordinate_system: String,
    pub state: StateVector,
}

/// Point-mass force model around a single body; drag and SRP are always off.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceModel {
    pub central_body: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Propagator {
    pub integrator: String,
    pub initial_step_s: f64,
    pub accuracy: f64,
    pub min_step_s: f64,
    pub max_step_s: f64,
    pub max_step_attempts: i64,
}

/// Frame a burn's delta-V components are expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnFrame {
    /// Same coordinate system as the spacecraft.
    Local,
    /// A simulator frame name, emitted verbatim.
    Named(String),
}

impl BurnFrame {
    pub fn from_form(raw: &str) -> Self {
        if raw == LOCAL_BURN_FRAME {
            Self::Local
        } else {
            Self::Named(raw.to_string())
        }
    }

    pub fn resolve<'a>(&'a self, spacecraft_frame: &'a str) -> &'a str {
        match self {
            Self::Local => spacecraft_frame,
            Self::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpulsiveBurn {
    pub frame: BurnFrame,
    pub origin: &'static str,
    pub axes: String,
    pub delta_v: [f64; 3],
}

impl ImpulsiveBurn {
    /// A burn is only worth emitting when some component is nonzero.
    pub fn is_active(&self) -> bool {
        self.delta_v.iter().map(|dv| dv.abs()).sum::<f64>() > 0.0
    }
}

/// Everything needed to render a mission script, independent of where it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPlan {
    pub spacecraft: Spacecraft,
    pub force_model: ForceModel,
    pub propagator: Propagator,
    pub burn: Option<ImpulsiveBurn>,
    /// Spacecraft fields listed in the report, without the spacecraft prefix.
    pub report_fields: Vec<&'static str>,
    pub duration_days: f64,
}
