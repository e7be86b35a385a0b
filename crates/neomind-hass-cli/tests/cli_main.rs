//! Basic CLI tests for the neomind-hass command-line interface.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn payload_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Test that the CLI binary exists and shows help.
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("patterns"))
        .stdout(predicate::str::contains("components"));
}

/// Test that the CLI shows version information.
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("neomind-hass"));
}

/// Test that providing no subcommand shows an error.
#[test]
fn test_no_subcommand_shows_error() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();

    cmd.assert().failure();
}

#[test]
fn test_components_lists_all_types() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.arg("components");

    cmd.assert()
        .success()
        .stdout(predicate::eq("fan\nclimate\ncover\nvacuum\n"));
}

#[test]
fn test_patterns() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.arg("patterns");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("homeassistant/+/+/config"))
        .stdout(predicate::str::contains("homeassistant/+/+/+/config"));

    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["patterns", "--component", "cover", "--prefix", "hass"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hass/cover/+/config"))
        .stdout(predicate::str::contains("homeassistant").not());
}

#[test]
fn test_patterns_rejects_unknown_component() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["patterns", "--component", "light"]);

    cmd.assert().failure();
}

#[test]
fn test_inspect_file() {
    let file = payload_file(
        r#"{
            "name": "Garage Door",
            "unique_id": "garage_door_1",
            "state_topic": "garage/door/state",
            "command_topic": "garage/door/set",
            "tilt_status_topic": "garage/door/tilt"
        }"#,
    );

    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["inspect", "--topic", "homeassistant/cover/garage/config", "--compact"])
        .arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"garage_door_1""#))
        .stdout(predicate::str::contains(r#""component":"cover""#))
        .stdout(predicate::str::contains(r#""name":"Garage Door""#))
        .stdout(predicate::str::contains("garage_door_1#cover"))
        .stdout(predicate::str::contains("garage_door_1#tilt"));
}

#[test]
fn test_inspect_stdin() {
    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["inspect", "--topic", "homeassistant/vacuum/robo/config"])
        .write_stdin(
            r#"{
                "command_topic": "robo/cmd",
                "battery_level_topic": "robo/battery",
                "json_attributes_topic": "robo/attributes"
            }"#,
        );

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("robo/attributes"))
        .stdout(predicate::str::contains("robo#command"))
        .stdout(predicate::str::contains("robo#battery"))
        .stdout(predicate::str::contains("return_to_base"));
}

#[test]
fn test_inspect_invalid_config() {
    let file = payload_file(r#"{ "state_topic": "fan/state" }"#);

    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["inspect", "--topic", "homeassistant/fan/bedroom/config"])
        .arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to assemble component"));
}

#[test]
fn test_inspect_unsupported_component() {
    let file = payload_file("{}");

    let mut cmd = Command::cargo_bin("neomind-hass").unwrap();
    cmd.args(["inspect", "--topic", "homeassistant/light/desk/config"])
        .arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported component"));
}
