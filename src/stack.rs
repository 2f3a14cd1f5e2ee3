//! The per-thread handler stack.
//!
//! Each thread owns an independent stack of [`HandlerFrame`]s mirroring the
//! try-regions whose dynamic extent currently contains the point of
//! execution, most-recently-entered on top. The stack is empty at thread
//! start, is mutated only by frame push and frame pop, and is torn down
//! implicitly at thread exit. No locking is involved: the stack is
//! thread-confined by construction and the push guard is `!Send`.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::frame::{ContextToken, FrameFlags, HandlerFrame};
use crate::{Code, FrameState};

thread_local! {
    static STACK: RefCell<Stack> = RefCell::new(Stack::new());
}

struct Stack {
    frames: Vec<HandlerFrame>,
    next_token: u64,
    pushes: u64,
    pops: u64,
    fell_through: u64,
    unwound: u64,
}

impl Stack {
    const fn new() -> Self {
        Stack {
            frames: Vec::new(),
            next_token: 0,
            pushes: 0,
            pops: 0,
            fell_through: 0,
            unwound: 0,
        }
    }
}

/// Push/pop accounting for the calling thread's handler stack.
///
/// The counters exist so callers (and this crate's own tests) can verify the
/// pop-exactly-once discipline: after any balanced sequence of regions,
/// `pushes == pops` and `depth == 0`. Pops are further split by exit kind,
/// making the frame lifecycle's exiting state observable after the frame is
/// gone: `pops == fell_through + unwound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackStats {
    /// Number of frames currently on the stack.
    pub depth: usize,
    /// Total frames pushed on this thread since it started.
    pub pushes: u64,
    /// Total frames popped on this thread since it started.
    pub pops: u64,
    /// Frames popped by normal fallthrough (try- or catch-body completed).
    pub fell_through: u64,
    /// Frames popped while a transfer was unwinding through their region.
    pub unwound: u64,
}

/// Read-only view of the calling thread's handler stack.
///
/// All methods observe the current thread only; a stack on another thread is
/// never visible from here.
pub struct HandlerStack;

impl HandlerStack {
    /// Number of handler frames currently active on this thread.
    #[must_use]
    pub fn depth() -> usize {
        STACK.with(|s| s.borrow().frames.len())
    }

    /// True when no try-region is active on this thread.
    ///
    /// A throw executed in this state is fatal: there is no handler to
    /// transfer control to.
    #[must_use]
    pub fn is_empty() -> bool {
        Self::depth() == 0
    }

    /// State of the innermost active frame, or `None` with an empty stack.
    #[must_use]
    pub fn top_state() -> Option<FrameState> {
        STACK.with(|s| s.borrow().frames.last().map(HandlerFrame::state))
    }

    /// Lifecycle flags of the innermost active frame, or `None` with an
    /// empty stack.
    #[must_use]
    pub fn top_flags() -> Option<FrameFlags> {
        STACK.with(|s| s.borrow().frames.last().map(|f| f.flags))
    }

    /// Push/pop accounting for this thread.
    #[must_use]
    pub fn stats() -> StackStats {
        STACK.with(|s| {
            let s = s.borrow();
            StackStats {
                depth: s.frames.len(),
                pushes: s.pushes,
                pops: s.pops,
                fell_through: s.fell_through,
                unwound: s.unwound,
            }
        })
    }
}

/// Scope-owned handle to a pushed frame; pops it exactly once on drop.
///
/// The guard drops on every exit path of the region that created it: normal
/// fallthrough, early return, and any unwind passing through. `!Send`, since
/// a frame must be popped by the thread that pushed it.
pub(crate) struct FrameGuard {
    token: ContextToken,
    _thread_confined: PhantomData<*mut ()>,
}

impl FrameGuard {
    pub(crate) fn token(&self) -> ContextToken {
        self.token
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        pop(self.token);
    }
}

/// Pushes a fresh armed frame for a region being entered.
pub(crate) fn push() -> FrameGuard {
    let token = STACK.with(|s| {
        let mut s = s.borrow_mut();
        let token = ContextToken(s.next_token);
        s.next_token += 1;
        s.pushes += 1;
        s.frames.push(HandlerFrame::new(token));
        token
    });
    FrameGuard {
        token,
        _thread_confined: PhantomData,
    }
}

/// Pops the frame owning `token`, recording how the region was exited.
///
/// The frame is expected on top; anything above it can only have been leaked
/// past its own guard, and is discarded with it to keep the stack coherent.
fn pop(token: ContextToken) {
    STACK.with(|s| {
        let mut s = s.borrow_mut();
        if let Some(pos) = s.frames.iter().rposition(|f| f.token == token) {
            let exit = if std::thread::panicking() {
                FrameFlags::UNWINDING
            } else {
                FrameFlags::EXITING
            };
            s.frames[pos].flags.insert(exit);
            let removed = (s.frames.len() - pos) as u64;
            let unwinding = s.frames[pos].flags.contains(FrameFlags::UNWINDING);
            s.frames.truncate(pos);
            s.pops += removed;
            if unwinding {
                s.unwound += removed;
            } else {
                s.fell_through += removed;
            }
        }
    });
}

/// Selects the nearest enclosing still-armed frame for a throw and records
/// the raised value in it.
///
/// Frames already handling an exception (or mid-exit) are skipped, which is
/// what routes a throw from inside a catch-body to the next-enclosing
/// region. Returns the selected frame's context token, or `None` when no
/// armed frame exists on this thread.
pub(crate) fn select_target(code: Code) -> Option<ContextToken> {
    STACK.with(|s| {
        let mut s = s.borrow_mut();
        let frame = s.frames.iter_mut().rev().find(|f| f.is_armed())?;
        frame.arm_exception(code);
        Some(frame.token)
    })
}

/// Consumes the pending value of the frame owning `token`, if that frame is
/// the current top and actually has an exception pending.
pub(crate) fn bind_pending(token: ContextToken) -> Option<Code> {
    STACK.with(|s| {
        let mut s = s.borrow_mut();
        let frame = s.frames.last_mut()?;
        if frame.token != token {
            return None;
        }
        frame.bind_exception()
    })
}

/// The value bound by the innermost catch-body currently executing on this
/// thread, if any. This is what a rethrow re-raises.
pub(crate) fn currently_handling() -> Option<Code> {
    STACK.with(|s| {
        s.borrow()
            .frames
            .iter()
            .rev()
            .find(|f| f.state() == FrameState::Handling)
            .and_then(|f| f.raised)
    })
}
