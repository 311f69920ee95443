//! End-to-end tests of the `sofainfo` binary

use sofa::builder::SofaBuilder;
use sofa::prelude::*;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn sofainfo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sofainfo"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sofainfo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_hrir(path: &Path) {
    SofaBuilder::new(Convention::SimpleFreeFieldHrir)
        .measurements(2)
        .samples(4)
        .title("CLI test")
        .build()
        .unwrap()
        .save(path)
        .unwrap();
}

#[test]
fn test_no_arguments_prints_help() {
    let output = sofainfo(&[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("sofainfo prints info about SOFA files"), "{}", text);
    assert!(text.contains("--config"));
}

#[test]
fn test_valid_file_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hrir.json");
    write_hrir(&path);

    let output = sofainfo(&[path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("is a valid SOFA file"), "{}", text);
    assert!(text.contains("is a valid 'SimpleFreeFieldHRIR' file (version 1.0)"));
    assert!(text.contains("Title"));
    assert!(text.contains("CLI test"));
    assert!(text.contains("ReceiverPosition:Type"));
    assert!(text.contains("Data.SamplingRate"));
    assert!(text.contains("Data.IR: [2x2x4]"));
}

#[test]
fn test_config_hides_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hrir.json");
    write_hrir(&path);
    let config = dir.path().join("sofainfo.toml");
    std::fs::write(&config, "[display]\ndata = false\nreceivers = false\n").unwrap();

    let output = sofainfo(&["--config", config.to_str().unwrap(), path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(!text.contains("Data.IR"), "{}", text);
    assert!(!text.contains("ReceiverPosition"));
    assert!(text.contains("EmitterPosition"));
}

#[test]
fn test_invalid_file_is_reported_not_failed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    let mut store = SofaBuilder::new(Convention::GeneralFir).build().unwrap();
    store.remove_attribute(AttributeScope::Global, "Title");
    store.save(&path).unwrap();

    let output = sofainfo(&[path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("is not a valid SOFA file"), "{}", text);
    assert!(text.contains("Missing attribute: Title"));
}

#[test]
fn test_missing_file_exits_with_error() {
    let output = sofainfo(&["/no/such/file.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_report_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hrir.json");
    write_hrir(&path);

    let output = sofainfo(&["--report", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("SimpleFreeFieldHRIR conformance"), "{}", text);
    assert!(text.contains("Summary:"));

    let output = sofainfo(&["--report", "/no/such/file.json"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_list_conventions() {
    let output = sofainfo(&["--list-conventions"]);
    assert!(output.status.success());
    let names: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(names, list_supported_conventions());
}
