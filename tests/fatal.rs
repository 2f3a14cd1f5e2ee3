//! Fatal-path integration tests.
//!
//! An uncaught throw and a throw from a cleanup action mid-unwind both
//! abort the process by design, so neither can be observed from inside the
//! test harness. These tests re-execute the test binary with a mode switch
//! in the environment and assert that the child dies unsuccessfully after
//! printing the expected diagnostic.

use std::process::{Command, Output};

use nonlocal::{attempt, defer, throw};

const MODE_VAR: &str = "NONLOCAL_FATAL_MODE";

/// Entry point for the child process. Does nothing in a normal test run;
/// with the mode switch set it triggers the requested fatal condition and
/// never returns.
#[test]
fn fatal_mode_entry() {
    match std::env::var(MODE_VAR).as_deref() {
        Ok("uncaught") => {
            // Zero active frames: no catch-body anywhere may run.
            throw!(42);
        }
        Ok("cleanup-throw") => {
            // The deferred action throws while the unwind started by the
            // try-body's throw is still in progress.
            attempt! {
                try {
                    defer! { throw!(2); }
                    throw!(1);
                } catch (_) {}
            };
        }
        _ => {}
    }
}

fn spawn_fatal_child(mode: &str) -> Output {
    Command::new(std::env::current_exe().expect("test binary path"))
        .args(["--exact", "fatal_mode_entry", "--nocapture"])
        .env(MODE_VAR, mode)
        .output()
        .expect("failed to spawn child test process")
}

#[test]
fn uncaught_throw_aborts_the_process() {
    let output = spawn_fatal_child("uncaught");
    assert!(
        !output.status.success(),
        "child must abort, not exit cleanly: {:?}",
        output.status
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("nonlocal: fatal: uncaught exception (code 42)"),
        "unexpected child diagnostic: {stderr}"
    );
}

#[test]
fn throw_from_cleanup_during_unwind_aborts() {
    let output = spawn_fatal_child("cleanup-throw");
    assert!(
        !output.status.success(),
        "child must abort, not exit cleanly: {:?}",
        output.status
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("throw of code 2 from a cleanup action while an unwind is in progress"),
        "unexpected child diagnostic: {stderr}"
    );
}
