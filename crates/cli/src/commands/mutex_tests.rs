// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::commands::fixtures::{
    coordinator, coordinator_with_config, down_coordinator, mutex_config, resource,
};
use kvipc_adapters::FakeStore;
use kvipc_core::SystemClock;
use kvipc_storage::MemoryDownMarker;
use std::thread;

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

#[test]
fn exec_hands_through_exit_code_and_releases() {
    let (mut coordinator, store) = coordinator();

    let outcome = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: sh("exit 7"),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Code(7));
    assert!(store.keys(0).is_empty());
}

#[test]
fn exec_runs_while_holding_mutex() {
    let (mut coordinator, store) = coordinator();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ran");

    let outcome = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: sh(&format!("touch {}", out.display())),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Code(0));
    assert!(out.exists());
    assert!(store.keys(0).is_empty());
}

#[test]
fn exec_while_down_does_not_run() {
    let mut coordinator = down_coordinator();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ran");

    let outcome = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: sh(&format!("touch {}", out.display())),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Unavailable);
    assert!(!out.exists());
}

#[test]
fn exec_missing_program_errors_and_releases() {
    let (mut coordinator, store) = coordinator();

    let result = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: vec!["/nonexistent/kvipc-test-program".to_string()],
        },
    );

    assert!(result.is_err());
    assert!(store.keys(0).is_empty());
}

#[test]
fn release_reports_absent_mutex() {
    let (mut coordinator, _) = coordinator();
    let job = resource("job");
    assert!(coordinator.block_mutex(&job));

    let args = || ReleaseArgs {
        resource: job.clone(),
    };
    assert_eq!(release(&mut coordinator, args()), Outcome::Success);
    assert_eq!(release(&mut coordinator, args()), Outcome::Absent);
}

#[test]
fn exec_kills_command_before_mutex_expires() {
    let (mut coordinator, store) = coordinator_with_config(&mutex_config(200));
    let started = Instant::now();

    let outcome = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: sh("sleep 5"),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Unavailable);
    assert!(started.elapsed() < Duration::from_secs(4));
    // Left to its TTL, not deleted
    assert_eq!(store.keys(0), vec!["kvipc:jobMX".to_string()]);
}

#[test]
fn exec_never_overlaps_next_holder() {
    let store = FakeStore::new();
    let config = mutex_config(300);
    let mut coordinator =
        Coordinator::new(store.handle(), MemoryDownMarker::new(), SystemClock, &config).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("finished");

    let peer_store = store.handle();
    let peer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        let mut peer = Coordinator::new(
            peer_store,
            MemoryDownMarker::new(),
            SystemClock,
            &mutex_config(3000),
        )
        .unwrap();
        peer.block_mutex(&resource("job"))
    });

    let outcome = exec(
        &mut coordinator,
        ExecArgs {
            resource: resource("job"),
            command: sh(&format!("sleep 1; touch {}", out.display())),
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Unavailable);
    assert!(peer.join().unwrap(), "peer should acquire once the TTL runs out");
    assert!(!out.exists());
    // The peer's key survives exec returning
    assert_eq!(store.keys(0), vec!["kvipc:jobMX".to_string()]);
}

#[test]
fn release_while_down_is_unavailable() {
    let mut coordinator = down_coordinator();

    let outcome = release(
        &mut coordinator,
        ReleaseArgs {
            resource: resource("job"),
        },
    );

    assert_eq!(outcome, Outcome::Unavailable);
}
