//! Down-marker specs: a store marked down is never dialed

use crate::prelude::*;

#[test]
fn status_reports_down_window() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["status"])
        .exits(3)
        .stdout_has("down until ");
}

#[test]
fn status_json() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["status", "--format", "json"])
        .exits(3)
        .stdout_has("\"active\":false")
        .stdout_has("\"down_until\"");
}

#[test]
fn lookups_are_unavailable() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["has", "job"])
        .exits(3)
        .stdout_eq("")
        .stderr_has("store is unavailable");
    temp.kvipc().args(&["get", "job", "--id", "5"]).exits(3).stdout_eq("");
    temp.kvipc().args(&["release", "job"]).exits(3);
}

#[test]
fn writes_are_unavailable() {
    let temp = Project::marked_down();

    temp.kvipc().args(&["set", "job", "{\"a\":1}"]).exits(3);
    temp.kvipc().args(&["clean"]).exits(3);
    temp.kvipc().args(&["clean", "--type", "job"]).exits(3);
    temp.kvipc().args(&["reinit", "--yes"]).exits(3);
}

#[test]
fn exec_does_not_run_command() {
    let temp = Project::marked_down();
    let touched = temp.path().join("ran");

    temp.kvipc()
        .args(&["exec", "job", "--", "touch"])
        .args(&[touched.to_str().unwrap()])
        .exits(3)
        .stderr_has("not acquired");

    assert!(!touched.exists());
}

#[test]
fn expired_marker_is_removed() {
    let temp = Project::unreachable();
    temp.file("down", &format!("{}\n", now_secs() - 10));

    // The stale marker goes away, then the closed port marks the store down anew
    temp.kvipc().args(&["status"]).exits(3);

    let content = std::fs::read_to_string(temp.marker_path()).unwrap();
    let until: u64 = content.trim().parse().unwrap();
    assert!(until >= now_secs() + 50);
}
