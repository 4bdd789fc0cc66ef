use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const REPORT: &str = "\
Sat.ElapsedDays Sat.X Sat.Y Sat.Z
0 7000 0 0
0.5 0 7000 0
1 -7000 0 0
";

#[test]
fn transpile_writes_script_next_to_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("Transpiler_output").join("demo.script");

    Command::cargo_bin("transpile")
        .expect("transpile bin")
        .args([
            "--input",
            "data/forms/datos_guardados.txt",
            "--output",
            script.to_str().unwrap(),
            "--print",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Script written to"))
        .stdout(predicate::str::contains("Create Spacecraft Mi_nave_1;"))
        .stdout(predicate::str::contains("Maneuver ImpBurn(Mi_nave_1);"));

    let text = fs::read_to_string(&script).expect("script written");
    assert!(text.starts_with("Create Spacecraft Mi_nave_1;\n"));
    assert!(text.ends_with(";\n"));
    assert!(dir.path().join("GMAT_output").is_dir());
}

#[test]
fn transpile_uses_settings_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("Datos")).unwrap();
    fs::copy(
        "data/forms/keplerian.txt",
        dir.path().join("Datos").join("datos_guardados.txt"),
    )
    .expect("copy form");
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "base_dir = \".\"\n").expect("write settings");

    Command::cargo_bin("transpile")
        .expect("transpile bin")
        .args(["--settings", settings.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("DefaultReportFile.txt"));

    let text = fs::read_to_string(dir.path().join("Transpiler_output").join("demo.script"))
        .expect("script written");
    assert!(text.contains("Explorer.DisplayStateType = Keplerian;"));
}

#[test]
fn transpile_fails_on_missing_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("out").join("demo.script");

    Command::cargo_bin("transpile")
        .expect("transpile bin")
        .args([
            "--input",
            dir.path().join("absent.txt").to_str().unwrap(),
            "--output",
            script.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));
    assert!(!script.exists());
}

#[test]
fn plot_report_renders_png_and_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = dir.path().join("DefaultReportFile.txt");
    let png = dir.path().join("orbit.png");
    let csv = dir.path().join("orbit.csv");
    fs::write(&report, REPORT).expect("write report");

    Command::cargo_bin("plot_report")
        .expect("plot_report bin")
        .args([
            "--input",
            report.to_str().unwrap(),
            "--output",
            png.to_str().unwrap(),
            "--csv",
            csv.to_str().unwrap(),
            "--width",
            "300",
            "--height",
            "300",
            "--no-labels",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Plotted 3 samples"));

    assert!(fs::metadata(&png).expect("png metadata").len() > 0);
    let csv_text = fs::read_to_string(&csv).expect("csv written");
    assert!(csv_text.starts_with("Sat.ElapsedDays,Sat.X,Sat.Y,Sat.Z\n"));
}

#[test]
fn plot_report_rejects_empty_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = dir.path().join("DefaultReportFile.txt");
    fs::write(&report, "Sat.ElapsedDays Sat.X Sat.Y\n").expect("write report");

    Command::cargo_bin("plot_report")
        .expect("plot_report bin")
        .args(["--input", report.to_str().unwrap(), "--no-labels"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No numeric rows"));
}
