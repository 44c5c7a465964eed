mod common;

use common::{estimate_json, run_costfold, stderr, stdout, TestEnvironment};
use costfold::Document;
use pretty_assertions::assert_eq;

#[test]
fn test_table_output_for_two_files() {
    let env = TestEnvironment::new();
    env.write_estimate("dev.json", "dev", "10");
    env.write_estimate("prod.json", "prod", "20");

    let output = run_costfold(&["output", "--path", &env.arg("*.json")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains(&format!("File: {}", env.arg("dev.json"))));
    assert!(out.contains(&format!("File: {}", env.arg("prod.json"))));
    assert!(out.contains("aws_instance.dev"));
    assert!(out.contains("OVERALL TOTAL $30.00"));
    assert!(!out.contains('\u{1b}'), "NO_COLOR output must be plain");
}

#[test]
fn test_json_output_reparses() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "1.10");
    env.write_estimate("b.json", "b", "2.20");

    let output = run_costfold(&[
        "output",
        "--format",
        "json",
        "-p",
        &env.arg("a.json"),
        "-p",
        &env.arg("b.json"),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let document = Document::from_slice(&output.stdout).unwrap();
    assert_eq!(document.version, "0.1");
    assert_eq!(document.resource_count(), 2);
    assert_eq!(
        document.projects[0].metadata["filename"],
        serde_json::Value::String(env.arg("a.json"))
    );
}

#[test]
fn test_unsupported_version_fails_without_output() {
    let env = TestEnvironment::new();
    env.write("new.json", &estimate_json("0.2", "p", &[("r", "1", false)]));

    let output = run_costfold(&["output", "--path", &env.arg("new.json")]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Invalid cost estimate file version '0.2'"));
}

#[test]
fn test_malformed_file_names_path() {
    let env = TestEnvironment::new();
    env.write("broken.json", "{\"version\": ");

    let output = run_costfold(&["output", "--path", &env.arg("broken.json")]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("broken.json"));
}

#[test]
fn test_no_matching_files() {
    let env = TestEnvironment::new();

    let output = run_costfold(&["output", "--path", &env.arg("*.json")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No cost estimate files found"));
}

#[test]
fn test_invalid_field_warns_and_still_renders() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");

    let output = run_costfold(&[
        "output",
        "--path",
        &env.arg("a.json"),
        "--fields",
        "price,bogus",
    ]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Invalid field 'bogus' specified"));
    assert!(stdout(&output).contains("Price"));
}

#[test]
fn test_fields_with_non_table_format_warns() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");

    let output = run_costfold(&[
        "output",
        "--path",
        &env.arg("a.json"),
        "--format",
        "html",
        "--fields",
        "price",
    ]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("fields is only supported for table output format"));
    assert!(stdout(&output).contains("<html"));
}

#[test]
fn test_skipped_resources_hidden_by_default() {
    let env = TestEnvironment::new();
    env.write(
        "a.json",
        &estimate_json("0.1", "a", &[("aws_instance.web", "5", false), ("aws_magic.thing", "", true)]),
    );

    let hidden = run_costfold(&["output", "--path", &env.arg("a.json")]);
    assert!(!stdout(&hidden).contains("aws_magic.thing"));
    assert!(stdout(&hidden).contains("--show-skipped"));

    let shown = run_costfold(&["output", "--path", &env.arg("a.json"), "--show-skipped"]);
    assert!(stdout(&shown).contains("aws_magic.thing"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");
    let config = env.write("costfold.toml", "[output]\nformat = \"json\"\n");

    let output = run_costfold(&[
        "--config",
        &config.to_string_lossy(),
        "output",
        "--path",
        &env.arg("a.json"),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(Document::from_slice(&output.stdout).is_ok());
}

#[test]
fn test_bad_config_exit_code() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");
    let config = env.write("costfold.toml", "[output\n");

    let output = run_costfold(&[
        "--config",
        &config.to_string_lossy(),
        "output",
        "--path",
        &env.arg("a.json"),
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_deprecated_report_command() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");

    let output = run_costfold(&["report", &env.arg("a.json"), "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("deprecated"));
    assert!(Document::from_slice(&output.stdout).is_ok());
}

#[test]
fn test_missing_path_is_usage_error() {
    let output = run_costfold(&["output"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--path"));
}

#[test]
fn test_deprecated_report_accepts_fields() {
    let env = TestEnvironment::new();
    env.write_estimate("a.json", "a", "5");

    let output = run_costfold(&["report", &env.arg("a.json"), "--fields", "price,bogus"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Invalid field 'bogus' specified"));
    assert!(stdout(&output).contains("Price"));
}
