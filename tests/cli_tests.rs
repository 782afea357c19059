use serial_test::serial;
use std::fs;
use std::process::{Command, Output};

const TEST_STORAGE: &str = "test_cli_storage.bin";

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--", TEST_STORAGE])
        .args(args)
        .output()
        .expect("Failed to execute process")
}

#[test]
#[serial]
fn test_put_and_current() {
    fs::remove_file(TEST_STORAGE).ok(); // Cleanup before test

    let output = run(&["put", "cpu", "0.42"]);
    assert!(output.status.success(), "Put command failed: {:?}", output);

    let output = run(&["current", "cpu"]);
    assert!(output.status.success(), "Current command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (timestamp, value) = stdout
        .trim()
        .split_once('\t')
        .expect("expected `timestamp<TAB>value`");
    assert!(timestamp.parse::<i64>().is_ok(), "Bad timestamp: {:?}", stdout);
    assert_eq!(value, "0.42");

    fs::remove_file(TEST_STORAGE).ok();
}

#[test]
#[serial]
fn test_put_without_value() {
    fs::remove_file(TEST_STORAGE).ok(); // Cleanup before test

    let output = Command::new("cargo")
        .args(["run", "--quiet", "--", TEST_STORAGE, "put", "cpu"])
        .env("FORCE_NO_TTY", "1") // Set env variable to override is_terminal()
        .stdin(std::process::Stdio::null()) // Explicitly set no stdin
        .output()
        .expect("Failed to execute process");

    assert!(
        !output.status.success(),
        "Expected failure on missing value"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No value provided"),
        "Unexpected error message: {:?}",
        stderr
    );

    fs::remove_file(TEST_STORAGE).ok(); // Cleanup
}

#[test]
#[serial]
fn test_namespaces_and_range() {
    fs::remove_file(TEST_STORAGE).ok(); // Cleanup before test

    for (namespace, value) in [("mem", "1"), ("disk", "2"), ("mem", "3")] {
        let output = run(&["put", namespace, value]);
        assert!(output.status.success(), "Put command failed: {:?}", output);
        // Keep puts to one namespace in distinct milliseconds.
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let output = run(&["namespaces"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["disk", "mem"]);

    let output = run(&["range", "mem", "--desc", "--limit", "1"]);
    assert!(output.status.success(), "Range command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("\t3"), "Unexpected range output: {:?}", stdout);

    let output = run(&["trim-all", "now"]);
    assert!(output.status.success(), "Trim-all command failed: {:?}", output);

    let output = run(&["range", "mem"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "Unexpected range output: {:?}", stdout);

    fs::remove_file(TEST_STORAGE).ok();
}

#[test]
#[serial]
fn test_read_commands_require_existing_file() {
    fs::remove_file(TEST_STORAGE).ok(); // Cleanup before test

    let output = run(&["current", "cpu"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Unexpected error message: {:?}",
        stderr
    );
    assert!(fs::metadata(TEST_STORAGE).is_err(), "Read must not create the file");
}
