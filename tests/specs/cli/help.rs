//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let run = kvipc().args(&["--help"]).passes();
    for command in ["status", "exec", "release", "has", "get", "set", "clean", "reinit"] {
        assert!(run.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn version_prints_name() {
    kvipc().args(&["--version"]).passes().stdout_has("kvipc");
}

#[test]
fn no_command_is_misuse() {
    kvipc().exits(2);
}
