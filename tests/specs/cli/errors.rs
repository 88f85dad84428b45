//! Misuse specs: everything here exits 2 before touching the store

use crate::prelude::*;

#[test]
fn missing_config_file() {
    let temp = Project::empty();

    temp.kvipc()
        .args(&["status"])
        .exits(2)
        .stderr_has("cannot load config");
}

#[test]
fn config_with_unknown_key() {
    let temp = Project::empty();
    temp.file("kvipc.toml", "[store]\nhots = \"redis\"\n");

    temp.kvipc().args(&["status"]).exits(2).stderr_has("hots");
}

#[test]
fn config_with_invalid_timing() {
    let temp = Project::empty();
    temp.config("[mutex]\ntimeout = \"10ms\"\nblock_wait = \"50ms\"\n");

    temp.kvipc()
        .args(&["status"])
        .exits(2)
        .stderr_has("mutex.timeout");
}

#[test]
fn config_path_from_flag() {
    let temp = Project::empty();

    kvipc()
        .args(&["--config"])
        .args(&[temp.path().join("nope.toml").to_str().unwrap()])
        .args(&["status"])
        .exits(2)
        .stderr_has("nope.toml");
}

#[test]
fn reserved_slot_id() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["get", "job", "--id", "1"])
        .exits(2)
        .stderr_has("reserved");
}

#[test]
fn invalid_resource_type() {
    let temp = Project::marked_down();

    temp.kvipc().args(&["has", "a:b"]).exits(2);
    temp.kvipc().args(&["release", ""]).exits(2);
}

#[test]
fn set_with_bad_json() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["set", "job", "{oops"])
        .exits(2)
        .stderr_has("not valid JSON");
}

#[test]
fn reinit_without_confirmation() {
    let temp = Project::marked_down();

    temp.kvipc()
        .args(&["reinit"])
        .exits(2)
        .stderr_has("--yes");
}

#[test]
fn exec_without_command() {
    let temp = Project::marked_down();

    temp.kvipc().args(&["exec", "job"]).exits(2);
}
