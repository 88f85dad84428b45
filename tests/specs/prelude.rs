//! Shared helpers for CLI specs

use assert_cmd::Command;
use predicates::Predicate;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

/// Port nothing listens on, so connecting fails immediately
pub const CLOSED_PORT: u16 = 1;

/// Scratch directory holding a config file and the down-marker
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project whose config points at a closed port
    pub fn unreachable() -> Self {
        let project = Self::empty();
        project.config("");
        project
    }

    /// Project whose down-marker says the store is down for another hour
    pub fn marked_down() -> Self {
        let project = Self::unreachable();
        project.file("down", &format!("{}\n", now_secs() + 3600));
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn marker_path(&self) -> PathBuf {
        self.path().join("down")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("kvipc.toml")
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Write kvipc.toml with the closed port and local marker, plus `extra`
    pub fn config(&self, extra: &str) {
        let content = format!(
            "[store]\nport = {CLOSED_PORT}\nconnect_timeout = \"500ms\"\n\n\
             [down]\nmarker_path = {:?}\nexpiration = \"60s\"\n\n{extra}",
            self.marker_path().display().to_string(),
        );
        self.file("kvipc.toml", &content);
    }

    /// The CLI with this project's config
    pub fn kvipc(&self) -> CliBuilder {
        let mut cmd = cli();
        cmd.current_dir(self.path())
            .env("KVIPC_CONFIG", self.config_path());
        CliBuilder { cmd }
    }
}

/// The CLI with no config at all
pub fn kvipc() -> CliBuilder {
    CliBuilder { cmd: cli() }
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("kvipc").unwrap();
    cmd.env_remove("KVIPC_CONFIG").env_remove("RUST_LOG");
    cmd
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and expect exit code 0
    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    /// Run and expect a specific exit code
    pub fn exits(mut self, code: i32) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "unexpected exit code\nstdout: {}\nstderr: {}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain {expected:?}\nstdout: {stdout}"
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            predicates::str::contains(expected).eval(&stderr),
            "stderr does not contain {expected:?}\nstderr: {stderr}"
        );
        self
    }
}
