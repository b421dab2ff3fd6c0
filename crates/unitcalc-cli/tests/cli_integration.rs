//! Integration tests for the unitcalc binary
//!
//! Each test spawns the real executable and checks what a user would see on
//! stdout, stderr and the exit status.

use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn unitcalc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_unitcalc"))
}

fn run(args: &[&str]) -> Output {
    unitcalc().args(args).output().expect("failed to run unitcalc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Write a scratch file under cargo's per-test temporary directory
fn scratch_file(name: &str, content: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, content).expect("failed to write scratch file");
    path
}

#[test]
fn test_single_expression_quiet() {
    let output = run(&["-q", "[2 lb/ft^2] * [3 ft]"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "6.000 lb / ft\n");
}

#[test]
fn test_single_expression_echoes_input() {
    let output = run(&["[10 mi/h] * [5280 ft/mi] / [3600 sec/h]"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("[10 mi/h] * [5280 ft/mi] / [3600 sec/h]"));
    assert!(out.trim_end().ends_with("= 14.667 ft / sec"));
}

#[test]
fn test_display_flags() {
    let output = run(&["-q", "--digits", "1", "--latex", "[2 ft]"]);
    assert_eq!(stdout(&output), "2.0\\, \\mbox{ft}\n");

    let output = run(&["-q", "--order", "lb,ft", "[5 ft*lb]"]);
    assert_eq!(stdout(&output), "5.000 lb * ft\n");
}

#[test]
fn test_digits_flag_is_bounded() {
    let output = run(&["-q", "--digits", "100000", "[2 ft]"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--digits"));

    let output = run(&["-q", "--digits", "64", "[0.5]"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), format!("0.5{}\n", "0".repeat(63)));
}

#[test]
fn test_dimension_mismatch_fails() {
    let output = run(&["[1 lb] + [1 ft]"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Dimension mismatch"));
}

#[test]
fn test_syntax_error_fails() {
    let output = run(&["[2 ft] *"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Syntax error"));
}

#[test]
fn test_pipe_mode() {
    let mut child = unitcalc()
        .arg("-q")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn unitcalc");

    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "H = [6 ft]").unwrap();
        writeln!(stdin, "H * 2").unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "6.000 ft\n12.000 ft\n");
}

#[test]
fn test_file_with_parameters() {
    let params = scratch_file(
        "wall_params.json",
        r#"{
            "display": { "markup": "plain" },
            "values": { "H": "6 ft", "gamma": "120 lb/ft^3" }
        }"#,
    );
    let calc = scratch_file(
        "wall.calc",
        "# active thrust\nq = 0.5 * gamma * H^2\nq > [2000 lb/ft]\n",
    );

    let output = run(&[
        "-q",
        "-f",
        calc.to_str().unwrap(),
        "-p",
        params.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "2160.000 lb / ft\ntrue\n");
}

#[test]
fn test_parameters_without_display_block_render_latex() {
    let params = scratch_file("latex_params.json", r#"{ "values": { "H": "6 ft" } }"#);

    let output = run(&["-q", "-p", params.to_str().unwrap(), "H"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "6.000\\, \\mbox{ft}\n");

    let output = run(&["-q", "-p", params.to_str().unwrap(), "[6 ft]"]);
    assert_eq!(stdout(&output), "6.000\\, \\mbox{ft}\n");
}

#[test]
fn test_file_stops_at_first_error() {
    let calc = scratch_file("broken.calc", "1 + 1\n[1 lb] > [1 ft]\n3\n");

    let output = run(&["-q", "-f", calc.to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "2.000\n");
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_missing_parameter_file() {
    let output = run(&["-p", "/nonexistent/params.json", "1 + 1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load parameters"));
}

#[test]
fn test_invalid_parameter_document_lists_problems() {
    let params = scratch_file(
        "bad_params.json",
        r#"{ "values": { "a": "lb", "b": "1 ft^x" } }"#,
    );
    let output = run(&["-p", params.to_str().unwrap(), "1"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("a: "));
    assert!(err.contains("b: "));
}
