//! Unreachable store specs: a failed connect marks the store down

use crate::prelude::*;

#[test]
fn status_marks_store_down() {
    let temp = Project::unreachable();

    temp.kvipc()
        .args(&["status"])
        .exits(3)
        .stdout_has("down until ")
        .stderr_has("cannot reach the store");

    assert!(temp.marker_path().exists());
}

#[test]
fn later_processes_inherit_down_window() {
    let temp = Project::unreachable();
    temp.kvipc().args(&["status"]).exits(3);

    temp.kvipc()
        .args(&["status"])
        .exits(3)
        .stderr_has("marked down by an earlier process");
}

#[test]
fn log_file_receives_output() {
    let temp = Project::empty();
    let log = temp.path().join("logs").join("kvipc.log");
    temp.config(&format!("[logging]\nfile = {:?}\n", log.display().to_string()));

    let run = temp.kvipc().args(&["status"]).exits(3);

    assert!(!run.stderr().contains("cannot reach the store"));
    let written = std::fs::read_to_string(&log).unwrap();
    assert!(written.contains("cannot reach the store"), "log: {written}");
}

#[test]
fn rust_log_overrides_config_filter() {
    let temp = Project::unreachable();

    temp.kvipc()
        .env("RUST_LOG", "debug")
        .args(&["status"])
        .exits(3)
        .stderr_has("configuration loaded");
}
