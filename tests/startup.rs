//! Startup of the `dirserve` binary: it announces its URL on stdout once
//! bound, and on failure exits non-zero without announcing anything.

use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_dirserve");

// Tests that touch the default port 8000 run one at a time
static DEFAULT_PORT: Mutex<()> = Mutex::new(());

/// Run the binary in `dir`, killing it if it is still up after `timeout`
fn run_in(dir: &std::path::Path, timeout: Duration) -> Output {
    let mut child = Command::new(BIN)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + timeout;
    while child.try_wait().unwrap().is_none() {
        if Instant::now() >= deadline {
            child.kill().unwrap();
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    child.wait_with_output().unwrap()
}

#[test]
fn missing_root_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), Duration::from_secs(10));
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("running at"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn occupied_port_exits_non_zero() {
    let _port = DEFAULT_PORT.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("test_data")).unwrap();
    // If the port is already taken by someone else the outcome is the same
    let _guard = TcpListener::bind("127.0.0.1:8000").ok();

    let output = run_in(dir.path(), Duration::from_secs(10));
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("running at"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to bind"));
}

#[test]
fn announces_url_on_stdout() {
    let _port = DEFAULT_PORT.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("test_data")).unwrap();

    let mut child = Command::new(BIN)
        .current_dir(dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut line = String::new();
    let read = BufReader::new(child.stdout.take().unwrap()).read_line(&mut line);
    child.kill().unwrap();
    child.wait().unwrap();

    read.unwrap();
    assert_eq!(line.trim_end(), "Test server running at http://localhost:8000/");
}
