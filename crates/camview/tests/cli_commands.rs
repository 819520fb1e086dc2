#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

const MISSING_PORT: &str = "/dev/camview-test-no-such-port";

fn camview(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_camview"))
        .args(args)
        .env_remove("CAMVIEW_PORT")
        .env_remove("CAMVIEW_BAUD")
        .env_remove("CAMVIEW_TIMEOUT")
        .output()
        .expect("camview should run")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn version_prints_name_and_version() {
    let output = camview(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("camview {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_extended_lists_build_details() {
    let output = camview(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: camview"));
    assert!(stdout.contains("default_port: /dev/ttyUSB0"));
}

#[test]
fn view_on_missing_port_is_transport_error() {
    let output = camview(&["view", "--port", MISSING_PORT, "--log-level", "error"]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("error: open failed"));
}

#[test]
fn probe_on_missing_port_is_transport_error() {
    let output = camview(&["probe", "--port", MISSING_PORT, "--timeout", "100ms"]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("error:"));
}

#[test]
fn zero_baud_is_usage_error() {
    let output = camview(&["view", "--port", MISSING_PORT, "--baud", "0"]);
    assert_eq!(output.status.code(), Some(64), "stderr: {}", stderr(&output));

    let output = camview(&["probe", "--port", MISSING_PORT, "--baud", "0"]);
    assert_eq!(output.status.code(), Some(64), "stderr: {}", stderr(&output));
}

#[test]
fn zero_timeout_is_usage_error() {
    let output = camview(&["probe", "--port", MISSING_PORT, "--timeout", "0s"]);
    assert_eq!(output.status.code(), Some(64), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("timeout must be greater than zero"));
}

#[test]
fn zero_scale_is_usage_error() {
    let output = camview(&["view", "--port", MISSING_PORT, "--scale", "0"]);
    assert_eq!(output.status.code(), Some(64), "stderr: {}", stderr(&output));
}

#[test]
fn port_from_environment_is_used() {
    let output = Command::new(env!("CARGO_BIN_EXE_camview"))
        .args(["probe", "--timeout", "100ms"])
        .env("CAMVIEW_PORT", MISSING_PORT)
        .output()
        .expect("camview should run");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains(MISSING_PORT));
}

#[test]
fn ports_json_is_parseable() {
    let output = camview(&["ports", "--format", "json"]);
    // Enumeration needs sysfs; sandboxes without it report a transport error.
    if output.status.code() == Some(3) {
        return;
    }
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("ports output should be JSON");
    assert_eq!(value["schema_id"], "camview.ports.v1");
    assert!(value["ports"].is_array());
}
