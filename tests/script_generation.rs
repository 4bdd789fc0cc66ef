use std::fs;
use std::path::Path;

use mission_transpiler::config::{Section, SectionedConfig, parse};
use mission_transpiler::script::{
    BurnFrame, MissionPlan, ScriptTarget, StateVector, generate, normalize_epoch,
};

const REPORT: &str = "/tmp/out/DefaultReportFile.txt";

fn render(form: &SectionedConfig) -> String {
    MissionPlan::from_config(form).render(Path::new(REPORT)).text()
}

fn form(text: &str) -> SectionedConfig {
    SectionedConfig::parse_str(text)
}

#[test]
fn saved_form_renders_expected_script() {
    let form = parse("data/forms/datos_guardados.txt").expect("form fixture");
    let expected = "\
Create Spacecraft Mi_nave_1;
Create ForceModel FM;
Create Propagator Prop;
Create ImpulsiveBurn ImpBurn;
Create ReportFile DefaultReportFile;

Mi_nave_1.DateFormat = TAIGregorian;
Mi_nave_1.Epoch = '01 Jun 2030 08:00:00.000';
Mi_nave_1.CoordinateSystem = MarsMJ2000Ec;
Mi_nave_1.DisplayStateType = Cartesian;
Mi_nave_1.X = 7100.5;
Mi_nave_1.Y = 0.0;
Mi_nave_1.Z = 1200.0;
Mi_nave_1.VX = 0.0;
Mi_nave_1.VY = 7.35;
Mi_nave_1.VZ = 1.0;

FM.CentralBody = Mars;
FM.PrimaryBodies = {Mars};
FM.Drag = None;
FM.SRP = Off;

Prop.Type = PrinceDormand78;
Prop.FM = FM;
Prop.InitialStepSize = 30.0;
Prop.Accuracy = 1e-9;
Prop.MinStep = 0.1;
Prop.MaxStep = 1200.0;
Prop.MaxStepAttempts = 75;

ImpBurn.CoordinateSystem = MarsMJ2000Ec;
ImpBurn.Origin = Mars;
ImpBurn.Axes = VNB;
ImpBurn.Element1 = 0.1;
ImpBurn.Element2 = 0.0;
ImpBurn.Element3 = -0.05;
ImpBurn.DecrementMass = false;

DefaultReportFile.Filename = '/tmp/out/DefaultReportFile.txt';
DefaultReportFile.WriteHeaders = true;
DefaultReportFile.Precision = 16;
DefaultReportFile.Add = {Mi_nave_1.ElapsedDays, Mi_nave_1.X, Mi_nave_1.Y, Mi_nave_1.Z};

BeginMissionSequence;
Report DefaultReportFile Mi_nave_1.ElapsedDays Mi_nave_1.X Mi_nave_1.Y Mi_nave_1.Z;
Maneuver ImpBurn(Mi_nave_1);
Propagate Prop(Mi_nave_1) {Mi_nave_1.ElapsedDays = 0.5};
Report DefaultReportFile Mi_nave_1.ElapsedDays Mi_nave_1.X Mi_nave_1.Y Mi_nave_1.Z;
";
    assert_eq!(render(&form), expected);
}

#[test]
fn identical_input_renders_identical_script() {
    let text = fs::read_to_string("data/forms/datos_guardados.txt").expect("fixture");
    assert_eq!(render(&form(&text)), render(&form(&text)));
}

#[test]
fn empty_form_uses_documented_defaults() {
    let script = render(&SectionedConfig::default());
    for line in [
        "Create Spacecraft Sat;",
        "Sat.DateFormat = UTCGregorian;",
        "Sat.Epoch = '01 Jan 2030 12:00:00.000';",
        "Sat.CoordinateSystem = EarthMJ2000Eq;",
        "Sat.DisplayStateType = Cartesian;",
        "Sat.X = 7000.0;",
        "Sat.Y = 0.0;",
        "Sat.VY = 7.5;",
        "FM.CentralBody = Earth;",
        "Prop.Type = RungeKutta89;",
        "Prop.InitialStepSize = 60.0;",
        "Prop.Accuracy = 1e-6;",
        "Prop.MinStep = 0.1;",
        "Prop.MaxStep = 600.0;",
        "Prop.MaxStepAttempts = 50;",
        "Propagate Prop(Sat) {Sat.ElapsedDays = 1.0};",
    ] {
        assert!(script.lines().any(|l| l == line), "missing `{line}` in\n{script}");
    }
    assert!(script.contains("X = 7000"));
}

#[test]
fn omitted_position_falls_back_per_field() {
    let script = render(&form("=== SPACECRAFT ===\nSistema de coordenadas: Cartesianas\ny: 12\n"));
    assert!(script.contains("Sat.X = 7000.0;"));
    assert!(script.contains("Sat.Y = 12.0;"));
}

#[test]
fn spacecraft_name_is_sanitized() {
    let script = render(&form("=== GENERAL ===\nNombre nave: Mi nave #1!\n"));
    assert!(script.starts_with("Create Spacecraft Mi_nave_1;\n"));

    let script = render(&form("=== GENERAL ===\nNombre nave: ¡¿#?!\n"));
    assert!(script.starts_with("Create Spacecraft Sat;\n"));
}

#[test]
fn body_and_frame_map_to_coordinate_system() {
    let plan = MissionPlan::from_config(&form(
        "=== GENERAL ===\nCuerpo central: Marte\nSistema de referencia: Eclíptico\n",
    ));
    assert_eq!(plan.spacecraft.coordinate_system, "MarsMJ2000Ec");

    let plan = MissionPlan::from_config(&form(
        "=== GENERAL ===\nCuerpo central: Plutón\nSistema de referencia: Ecuatorial\n",
    ));
    assert_eq!(plan.spacecraft.coordinate_system, "EarthMJ2000Eq");
    assert_eq!(plan.force_model.central_body, "Earth");
}

#[test]
fn unknown_time_format_defaults_to_utc() {
    let plan = MissionPlan::from_config(&form("=== GENERAL ===\nFormato de tiempo: GPS\n"));
    assert_eq!(plan.spacecraft.date_format, "UTCGregorian");
    let plan = MissionPlan::from_config(&form("=== GENERAL ===\nFormato de tiempo: TT\n"));
    assert_eq!(plan.spacecraft.date_format, "TTGregorian");
}

#[test]
fn zero_burn_emits_no_burn_lines() {
    let script = render(&form(
        "=== IMPULSIVE BURN ===\nDelta V Element 1: 0\nDelta V Element 2: 0\nDelta V Element 3: 0\n",
    ));
    assert!(!script.contains("ImpulsiveBurn"));
    assert!(!script.contains("Maneuver"));
    assert!(!script.contains("ImpBurn"));
}

#[test]
fn nonzero_burn_emits_declaration_and_maneuver() {
    let script = render(&form(
        "=== IMPULSIVE BURN ===\nSistema de coordenadas: EarthFixed\nDelta V Element 2: 0,25\n",
    ));
    assert!(script.contains("Create ImpulsiveBurn ImpBurn;"));
    assert!(script.contains("ImpBurn.CoordinateSystem = EarthFixed;"));
    assert!(script.contains("ImpBurn.Element1 = 0.0;"));
    assert!(script.contains("ImpBurn.Element2 = 0.25;"));
    assert!(script.contains("ImpBurn.Element3 = 0.0;"));
    assert!(script.contains("Maneuver ImpBurn(Sat);"));

    let maneuver = script.find("Maneuver").unwrap();
    let propagate = script.find("Propagate").unwrap();
    assert!(maneuver < propagate);
}

#[test]
fn local_burn_frame_follows_spacecraft() {
    let plan = MissionPlan::from_config(&form(
        "=== GENERAL ===\nCuerpo central: Luna\n=== IMPULSIVE BURN ===\nDelta V Element 1: -1\n",
    ));
    let burn = plan.burn.expect("burn should be active");
    assert_eq!(burn.frame, BurnFrame::Local);
    assert_eq!(burn.frame.resolve(&plan.spacecraft.coordinate_system), "LunaMJ2000Eq");
    assert_eq!(burn.origin, "Luna");
    assert_eq!(burn.axes, "VNB");
}

#[test]
fn keplerian_form_selects_keplerian_state() {
    let form = parse("data/forms/keplerian.txt").expect("keplerian fixture");
    let plan = MissionPlan::from_config(&form);
    assert_eq!(
        plan.spacecraft.state,
        StateVector::Keplerian {
            sma: 26560.0,
            ecc: 0.01,
            inc: 55.0,
            raan: 120.0,
            aop: 0.0,
            ta: 45.0,
        }
    );
    assert_eq!(plan.spacecraft.epoch, "15 Mar 2031 00:00:00.000");

    let script = plan.render(Path::new(REPORT)).text();
    assert!(script.contains("Explorer.DisplayStateType = Keplerian;"));
    assert!(script.contains("Explorer.SMA = 26560.0;"));
    assert!(script.contains("Explorer.ECC = 0.01;"));
    assert!(!script.contains("Explorer.X ="));
    assert!(!script.contains("ImpBurn"));
}

#[test]
fn epoch_normalization_rules() {
    assert_eq!(normalize_epoch("01/06/2030 08:00:00"), "01 Jun 2030 08:00:00.000");
    assert_eq!(normalize_epoch("01/06/2030"), "01 Jun 2030 12:00:00.000");
    assert_eq!(normalize_epoch(""), "01 Jan 2030 12:00:00.000");
    assert_eq!(normalize_epoch("mañana"), "01 Jan 2030 12:00:00.000");
}

#[test]
fn malformed_duration_defaults_to_one_day() {
    let script = render(&form("=== TIEMPO ===\nPaso temporal: abc\n"));
    assert!(script.contains("Propagate Prop(Sat) {Sat.ElapsedDays = 1.0};"));

    let script = render(&form("=== TIEMPO ===\nPaso temporal:\n"));
    assert!(script.contains("{Sat.ElapsedDays = 1.0}"));
}

#[test]
fn non_positive_propagator_values_are_redefaulted() {
    let plan = MissionPlan::from_config(&form(
        "=== PROPAGATE ===\nTipo de integrador:   \nTamano de paso inicial: -5\nPrecision (accuracy): 0\nPaso maximo: x\nIntentos max. paso: 0\n",
    ));
    assert_eq!(plan.propagator.integrator, "RungeKutta89");
    assert_eq!(plan.propagator.initial_step_s, 60.0);
    assert_eq!(plan.propagator.accuracy, 1e-6);
    assert_eq!(plan.propagator.max_step_s, 600.0);
    assert_eq!(plan.propagator.max_step_attempts, 50);
}

#[test]
fn generate_writes_script_and_prepares_report_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script_path = dir.path().join("Transpiler_output").join("demo.script");
    fs::create_dir_all(script_path.parent().unwrap()).unwrap();
    fs::write(&script_path, "stale contents").unwrap();

    let form = parse("data/forms/datos_guardados.txt").expect("form fixture");
    let generated = generate(&form, &script_path).expect("generate");

    let on_disk = fs::read_to_string(&script_path).expect("script written");
    assert_eq!(on_disk, generated.text);
    assert!(!on_disk.contains("stale"));

    let expected_report = ScriptTarget::beside(&script_path).report_path;
    assert!(generated.report_path.is_absolute());
    assert!(generated.report_path.ends_with("GMAT_output/DefaultReportFile.txt"));
    assert_eq!(
        fs::canonicalize(generated.report_path.parent().unwrap()).unwrap(),
        fs::canonicalize(expected_report.parent().unwrap()).unwrap()
    );
    let literal = generated.report_path.to_string_lossy().replace('\\', "/");
    assert!(on_disk.contains(&format!("DefaultReportFile.Filename = '{literal}';")));
}

#[test]
fn report_variables_drive_add_and_report_statements() {
    let mut form = SectionedConfig::default();
    form.insert(Section::ReportFile, "Variables", "Elapsed Seconds, Velocidad VX, RAAN");
    let script = render(&form);
    assert!(script.contains("DefaultReportFile.Add = {Sat.ElapsedSecs, Sat.VX, Sat.RAAN};"));
    assert!(script.contains("Report DefaultReportFile Sat.ElapsedSecs Sat.VX Sat.RAAN;"));
}

#[test]
fn spacecraft_name_never_shadows_script_objects() {
    for reserved in ["FM", "Prop", "ImpBurn", "DefaultReportFile"] {
        let script = render(&form(&format!(
            "=== GENERAL ===\nNombre nave: {reserved}\n=== IMPULSIVE BURN ===\nDelta V Element 1: 1\n"
        )));
        assert!(script.starts_with("Create Spacecraft Sat;\n"), "{reserved}:\n{script}");
        for object in ["FM", "Prop", "ImpBurn", "DefaultReportFile"] {
            let declarations = script
                .lines()
                .filter(|line| line.starts_with("Create ") && line.ends_with(&format!(" {object};")))
                .count();
            assert_eq!(declarations, 1, "`{object}` declared {declarations} times");
        }
    }
}

#[test]
fn keplerian_fields_fall_back_individually() {
    let script = render(&form(
        "=== SPACECRAFT ===\nSistema de coordenadas: Keplerianas\nECC: abc\n",
    ));
    assert!(script.contains("Sat.DisplayStateType = Keplerian;"));
    for line in [
        "Sat.SMA = 7000.0;",
        "Sat.ECC = 0.0;",
        "Sat.INC = 0.0;",
        "Sat.RAAN = 0.0;",
        "Sat.AOP = 0.0;",
        "Sat.TA = 0.0;",
    ] {
        assert!(script.lines().any(|l| l == line), "missing `{line}` in\n{script}");
    }
}

#[test]
fn blank_burn_frame_and_axes_use_defaults() {
    let script = render(&form(
        "=== IMPULSIVE BURN ===\nSistema de coordenadas:\nOrigen:   \nAxes:\nDelta V Element 3: 0,2\n",
    ));
    assert!(script.contains("ImpBurn.CoordinateSystem = EarthMJ2000Eq;"));
    assert!(script.contains("ImpBurn.Origin = Earth;"));
    assert!(script.contains("ImpBurn.Axes = VNB;"));
    assert!(!script.contains("= ;"));
}
