//! Handler-stack discipline integration tests.
//!
//! Verifies the stack-restoration invariant (no leaked frames for any
//! nesting depth), the pop-exactly-once discipline via the push/pop
//! counters, observable frame states, and per-thread stack isolation.

use nonlocal::{attempt, rethrow, run_protected, throw, Code, FrameState, HandlerStack};

/// Runs `scenario` and asserts it left the stack exactly as it found it,
/// with pushes and pops balanced.
fn balanced(scenario: impl FnOnce()) {
    let before = HandlerStack::stats();
    scenario();
    let after = HandlerStack::stats();
    assert_eq!(after.depth, before.depth, "leaked or lost frames");
    assert_eq!(
        after.pushes - before.pushes,
        after.pops - before.pops,
        "every push must be matched by exactly one pop"
    );
}

#[test]
fn restoration_at_every_nesting_depth() {
    fn nested(depth: u32) {
        if depth == 0 {
            return;
        }
        attempt! {
            try {
                nested(depth - 1);
            } catch (_) {}
        };
    }

    for depth in 0..=8 {
        balanced(|| nested(depth));
        assert!(HandlerStack::is_empty());
    }
}

#[test]
fn restoration_with_throws_at_every_depth() {
    fn nested_throwing(depth: u32) {
        attempt! {
            try {
                if depth == 0 {
                    throw!(1);
                }
                nested_throwing(depth - 1);
                // Propagate from the bottom through every level.
                throw!(2);
            } catch (_) {}
        };
    }

    for depth in 0..=8 {
        balanced(|| nested_throwing(depth));
        assert!(HandlerStack::is_empty());
    }
}

#[test]
fn fallthrough_pops_exactly_once() {
    balanced(|| {
        attempt! {
            try { 1 } catch (_) { 0 }
        };
    });
}

#[test]
fn caught_throw_pops_exactly_once() {
    balanced(|| {
        attempt! {
            try { throw!(1) } catch (x) { x }
        };
    });
}

#[test]
fn unwind_through_intermediate_frames_pops_each_once() {
    balanced(|| {
        let caught = attempt! {
            try {
                attempt! {
                    try {
                        attempt! {
                            try { throw!(40) } catch (_) { rethrow!() }
                        }
                    } catch (_) {
                        rethrow!()
                    }
                }
            } catch (x) {
                x
            }
        };
        assert_eq!(caught, Code::new(40));
    });
}

#[test]
fn many_sequential_regions_stay_balanced() {
    balanced(|| {
        for i in 0..100 {
            let value = attempt! {
                try {
                    if i % 3 == 0 {
                        throw!(i);
                    }
                    i
                } catch (x) {
                    x.value()
                }
            };
            assert_eq!(value, i);
        }
    });
}

#[test]
fn exit_kinds_are_counted() {
    let before = HandlerStack::stats();

    // Normal completion: the region's frame falls through.
    attempt! {
        try { 1 } catch (_) { 0 }
    };
    let after = HandlerStack::stats();
    assert_eq!(after.fell_through, before.fell_through + 1);
    assert_eq!(after.unwound, before.unwound);

    // A rethrow pops the inner frame while its unwind is in progress; the
    // outer frame catches and then falls through.
    let caught = attempt! {
        try {
            attempt! {
                try { throw!(1) } catch (_) { rethrow!() }
            }
        } catch (x) {
            x
        }
    };
    assert_eq!(caught, Code::new(1));
    let finished = HandlerStack::stats();
    assert_eq!(finished.unwound, after.unwound + 1);
    assert_eq!(finished.fell_through, after.fell_through + 1);
    assert_eq!(finished.pops, finished.fell_through + finished.unwound);
}

#[test]
fn frame_states_are_observable() {
    assert_eq!(HandlerStack::top_state(), None);

    attempt! {
        try {
            assert_eq!(HandlerStack::top_state(), Some(FrameState::Armed));
            assert_eq!(HandlerStack::depth(), 1);
            throw!(1);
        } catch (_) {
            assert_eq!(HandlerStack::top_state(), Some(FrameState::Handling));
            assert_eq!(HandlerStack::depth(), 1);
        }
    };

    assert_eq!(HandlerStack::top_state(), None);
    assert!(HandlerStack::is_empty());
}

#[test]
fn nested_region_in_catch_body_arms_on_top() {
    attempt! {
        try {
            throw!(1);
        } catch (_) {
            // The handling frame stays on the stack below the new region.
            attempt! {
                try {
                    assert_eq!(HandlerStack::depth(), 2);
                    assert_eq!(HandlerStack::top_state(), Some(FrameState::Armed));
                } catch (_) {}
            };
            assert_eq!(HandlerStack::depth(), 1);
        }
    };
    assert!(HandlerStack::is_empty());
}

#[test]
fn stacks_are_thread_confined() {
    // A frame armed on the main thread is invisible to a spawned thread:
    // its stack starts empty, so its throw reaches only its own root.
    attempt! {
        try {
            let outcome = std::thread::spawn(|| {
                assert!(HandlerStack::is_empty());
                let escaped: nonlocal::Result<()> = run_protected(|| throw!(55));
                escaped
            })
            .join()
            .expect("spawned thread must not panic");
            assert_eq!(
                outcome,
                Err(nonlocal::Error::Uncaught {
                    code: Code::new(55)
                })
            );
        } catch (_) {
            panic!("the spawned thread's throw must not cross threads");
        }
    };
}

#[test]
fn threads_unwind_independently() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let caught = attempt! {
                    try { throw!(i) } catch (x) { x }
                };
                assert_eq!(caught, Code::new(i));
                assert!(HandlerStack::is_empty());
                let stats = HandlerStack::stats();
                assert_eq!(stats.pushes, stats.pops);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread must not panic");
    }
}
