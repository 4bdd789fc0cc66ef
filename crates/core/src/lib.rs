//! Lookup tables, documented defaults, and value parsing shared across the Mission Transpiler workspace.

/// Defaults substituted whenever a form field is absent or unparsable.
pub mod constants {
    /// Spacecraft identifier used when the sanitized name ends up empty.
    pub const DEFAULT_SPACECRAFT_NAME: &str = "Sat";
    /// Epoch emitted when the start date carries neither a date nor a time.
    pub const DEFAULT_EPOCH: &str = "01 Jan 2030 12:00:00.000";
    /// Time of day assumed for `DD/MM/YYYY` dates without a clock part.
    pub const DEFAULT_TIME_OF_DAY: &str = "12:00:00";
    /// Propagation span in days.
    pub const DEFAULT_DURATION_DAYS: f64 = 1.0;

    pub const DEFAULT_INTEGRATOR: &str = "RungeKutta89";
    pub const DEFAULT_INITIAL_STEP_S: f64 = 60.0;
    pub const DEFAULT_ACCURACY: f64 = 1e-6;
    pub const DEFAULT_MIN_STEP_S: f64 = 0.1;
    pub const DEFAULT_MAX_STEP_S: f64 = 600.0;
    pub const DEFAULT_MAX_STEP_ATTEMPTS: i64 = 50;

    /// Burn frame alias meaning "the spacecraft's own coordinate system".
    pub const LOCAL_BURN_FRAME: &str = "Local";
    pub const DEFAULT_BURN_AXES: &str = "VNB";

    /// Cartesian state defaults: position in km, velocity in km/s.
    pub const DEFAULT_CARTESIAN: [f64; 6] = [7000.0, 0.0, 0.0, 0.0, 7.5, 0.0];
    /// Keplerian defaults: SMA (km), ECC, INC, RAAN, AOP, TA (deg).
    pub const DEFAULT_KEPLERIAN: [f64; 6] = [7000.0, 0.0, 0.0, 0.0, 0.0, 0.0];

    /// Precision requested from the simulator's report writer.
    pub const REPORT_PRECISION: u32 = 16;
}

/// Static, read-only translation tables from form vocabulary to simulator identifiers.
pub mod tables {
    /// Form body names and the simulator identifiers they map to.
    pub const BODY_NAMES: &[(&str, &str)] = &[
        ("Tierra", "Earth"),
        ("Luna", "Luna"),
        ("Marte", "Mars"),
        ("Venus", "Venus"),
        ("Júpiter", "Jupiter"),
        ("Jupiter", "Jupiter"),
        ("Saturno", "Saturn"),
        ("Urano", "Uranus"),
        ("Neptuno", "Neptune"),
        ("Mercurio", "Mercury"),
        ("Sol", "Sun"),
    ];

    /// Body used when a name is not in [`BODY_NAMES`].
    pub const DEFAULT_BODY: &str = "Earth";

    pub const TIME_FORMATS: &[(&str, &str)] = &[
        ("UTC", "UTCGregorian"),
        ("TAI", "TAIGregorian"),
        ("TT", "TTGregorian"),
    ];

    pub const DEFAULT_TIME_FORMAT: &str = "UTCGregorian";

    pub const MONTHS: [(&str, &str); 12] = [
        ("01", "Jan"),
        ("02", "Feb"),
        ("03", "Mar"),
        ("04", "Apr"),
        ("05", "May"),
        ("06", "Jun"),
        ("07", "Jul"),
        ("08", "Aug"),
        ("09", "Sep"),
        ("10", "Oct"),
        ("11", "Nov"),
        ("12", "Dec"),
    ];

    /// Map a form body name to its simulator identifier, falling back to Earth.
    pub fn body_identifier(name: &str) -> &'static str {
        BODY_NAMES
            .iter()
            .find(|(form, _)| *form == name)
            .map(|(_, id)| *id)
            .unwrap_or(DEFAULT_BODY)
    }

    /// Lowercase with Spanish accents stripped, so `Eclíptico` compares like `ecliptico`.
    pub fn fold(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| match c {
                'á' | 'à' => 'a',
                'é' | 'è' => 'e',
                'í' | 'ì' => 'i',
                'ó' | 'ò' => 'o',
                'ú' | 'ù' | 'ü' => 'u',
                other => other,
            })
            .collect()
    }

    /// Reference frame suffix for a descriptor.
    ///
    /// Any descriptor containing `eclip` (case- and accent-insensitive) is ecliptic;
    /// everything else, including an empty descriptor, is equatorial.
    pub fn frame_suffix(descriptor: &str) -> &'static str {
        if fold(descriptor).contains("eclip") {
            "MJ2000Ec"
        } else {
            "MJ2000Eq"
        }
    }

    /// Compose a coordinate system identifier such as `EarthMJ2000Eq`.
    pub fn coordinate_system(body: &str, descriptor: &str) -> String {
        format!("{body}{}", frame_suffix(descriptor))
    }

    /// Map `UTC`/`TAI`/`TT` to a Gregorian epoch format token, defaulting to UTC.
    pub fn time_format(name: &str) -> &'static str {
        TIME_FORMATS
            .iter()
            .find(|(form, _)| *form == name)
            .map(|(_, token)| *token)
            .unwrap_or(DEFAULT_TIME_FORMAT)
    }

    /// Three-letter abbreviation for a two-digit month.
    pub fn month_abbreviation(month: &str) -> Option<&'static str> {
        MONTHS
            .iter()
            .find(|(digits, _)| *digits == month)
            .map(|(_, abbrev)| *abbrev)
    }

    /// Spacecraft fields a report can list, keyed by the form's label.
    pub const REPORT_VARIABLES: &[(&str, &str)] = &[
        ("Elapsed Days", "ElapsedDays"),
        ("Elapsed Seconds", "ElapsedSecs"),
        ("Posicion X", "X"),
        ("Posicion Y", "Y"),
        ("Posicion Z", "Z"),
        ("Velocidad VX", "VX"),
        ("Velocidad VY", "VY"),
        ("Velocidad VZ", "VZ"),
        ("Semieje mayor (SMA)", "SMA"),
        ("Excentricidad (ECC)", "ECC"),
        ("Inclinacion (INC)", "INC"),
        ("RAAN", "RAAN"),
        ("Argumento del periapsis (AOP)", "AOP"),
        ("Anomalia verdadera (TA)", "TA"),
    ];

    /// Fields reported when no usable selection was made.
    pub const DEFAULT_REPORT_FIELDS: [&str; 4] = ["ElapsedDays", "X", "Y", "Z"];

    pub fn report_field(label: &str) -> Option<&'static str> {
        let label = label.trim();
        REPORT_VARIABLES
            .iter()
            .find(|(form, _)| *form == label)
            .map(|(_, field)| *field)
    }
}

/// Lenient parsing of raw form values with default substitution.
pub mod values {
    use log::debug;

    /// Parse a real number, accepting `,` as the decimal separator.
    pub fn parse_real(raw: &str) -> Option<f64> {
        raw.trim().replace(',', ".").parse::<f64>().ok()
    }

    /// Parse a real number or substitute `default`.
    pub fn real_or(raw: Option<&str>, default: f64) -> f64 {
        match raw {
            None => default,
            Some(text) => parse_real(text).unwrap_or_else(|| {
                debug!("value `{text}` is not numeric, using default {default}");
                default
            }),
        }
    }

    /// Parse a strictly positive, finite real number or substitute `default`.
    pub fn positive_or(raw: Option<&str>, default: f64) -> f64 {
        let value = real_or(raw, default);
        if value.is_finite() && value > 0.0 {
            value
        } else {
            debug!("value {value} is not positive, using default {default}");
            default
        }
    }

    /// Parse a positive count; fractional input is truncated toward zero.
    pub fn count_or(raw: Option<&str>, default: i64) -> i64 {
        let parsed = raw
            .and_then(parse_real)
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64);
        match parsed {
            Some(count) if count > 0 => count,
            _ => {
                debug!("count {raw:?} is not a positive integer, using default {default}");
                default
            }
        }
    }

    /// Render a real number the way the simulator scripts expect to read it back.
    ///
    /// Integral values keep one decimal (`7000.0`), magnitudes outside
    /// `[1e-4, 1e16)` use exponent form (`1e-6`), and the rest use the shortest
    /// round-trip decimal (`7.5`).
    pub fn format_real(value: f64) -> String {
        let magnitude = value.abs();
        if !value.is_finite() {
            format!("{value}")
        } else if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
            format!("{value:e}")
        } else if value.fract() == 0.0 {
            format!("{value:.1}")
        } else {
            format!("{value}")
        }
    }

}
