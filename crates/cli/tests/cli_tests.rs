//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("status"), "Should show status command");
    assert!(stdout.contains("start"), "Should show start command");
    assert!(stdout.contains("stop"), "Should show stop command");
    assert!(stdout.contains("config"), "Should show config command");
    assert!(stdout.contains("watch"), "Should show watch command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("scalesim"), "Should show binary name");
}

/// Test global options are documented
#[test]
fn test_global_options() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("SCALESIM_API_URL"), "Should show env var");
    assert!(stdout.contains("--stream-url"), "Should show stream-url option");
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test config set subcommand help
#[test]
fn test_config_set_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "config", "set", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Config set help should succeed");
    assert!(stdout.contains("PATH"), "Should show path argument");
    assert!(stdout.contains("VALUE"), "Should show value argument");
}

/// Test watch subcommand help
#[test]
fn test_watch_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "watch", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Watch help should succeed");
    assert!(stdout.contains("--duration"), "Should show duration option");
    assert!(stdout.contains("--dark"), "Should show dark option");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = Command::new("cargo")
        .args(["run", "-p", "scalesim-cli", "--", "config", "set"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
