//! The propagation engine: throw, rethrow, and the armed-region runner.
//!
//! The non-local transfer primitive is the platform's native stack
//! unwinding. Pushing a frame establishes a [`std::panic::catch_unwind`]
//! boundary (the *capture*); a throw records the raised value in the
//! selected frame and starts an unwind carrying a crate-private payload
//! aimed at that frame's boundary (the *resume*). [`resume_unwind`] is used
//! at the throw site rather than `panic_any`, so the panic hook never runs
//! and no backtrace is captured. Every scope between the throw site and the
//! catching frame is exited by the unwind itself, which is what runs
//! drop-based cleanup in strict reverse-acquisition order.
//!
//! Foreign panics are not intercepted: a panic that is not one of our
//! payloads crosses a frame boundary untouched (after the frame pops).

use std::panic::{self, AssertUnwindSafe};

use crate::frame::ContextToken;
use crate::stack;
use crate::{Code, Error, Result};

/// In-flight transfer payload. Carries only the target frame's context
/// token; the raised value is already recorded in the frame itself.
struct Thrown {
    token: ContextToken,
}

fn fatal(args: std::fmt::Arguments<'_>) -> ! {
    eprintln!("nonlocal: fatal: {args}");
    std::process::abort()
}

/// Raises `code` to the nearest enclosing armed frame. Never returns.
///
/// Every frame pushed after the selected one is unwound implicitly: their
/// scopes are exited as control leaves them, which pops them and runs any
/// scope-local cleanup, innermost first. A throw executed from inside a
/// catch-body targets the next-enclosing frame, since the frame whose value
/// is being handled is no longer armed.
///
/// # Fatal conditions
///
/// - No armed frame exists on this thread: the process aborts. There is no
///   default top-level handler; see [`run_protected`](crate::run_protected)
///   for an explicit, opt-in root.
/// - An unwind is already in progress (the throw comes from a cleanup
///   action running mid-unwind): the process aborts. The in-flight transfer
///   cannot be replaced once started, so this is resolved deterministically
///   rather than left undefined.
///
/// # Examples
///
/// ```rust
/// use nonlocal::{attempt, Code};
///
/// let caught = attempt! {
///     try { nonlocal::throw(Code::new(7)) } catch (c) { c }
/// };
/// assert_eq!(caught, Code::new(7));
/// ```
pub fn throw(code: Code) -> ! {
    if std::thread::panicking() {
        fatal(format_args!(
            "throw of code {code} from a cleanup action while an unwind is in progress"
        ));
    }
    match stack::select_target(code) {
        Some(token) => panic::resume_unwind(Box::new(Thrown { token })),
        None => fatal(format_args!(
            "uncaught exception (code {code}): no active handler on this thread"
        )),
    }
}

/// Re-raises the value bound by the innermost executing catch-body to the
/// next-enclosing frame. Never returns.
///
/// Exactly equivalent to calling [`throw`] with the caught value; the only
/// difference is that the value is read from the frame being handled instead
/// of being passed in. Calling this while no catch-body is executing on this
/// thread is a usage error and aborts the process.
///
/// # Examples
///
/// ```rust
/// use nonlocal::{attempt, Code};
///
/// let outer = attempt! {
///     try {
///         attempt! {
///             try { nonlocal::throw(Code::new(9)) } catch (_) { nonlocal::rethrow() }
///         }
///     } catch (c) {
///         c
///     }
/// };
/// assert_eq!(outer, Code::new(9));
/// ```
pub fn rethrow() -> ! {
    match stack::currently_handling() {
        Some(code) => throw(code),
        None => fatal(format_args!(
            "rethrow with no exception currently being handled on this thread"
        )),
    }
}

/// Runs `body` as an armed try-region, routing any value it raises to
/// `handler`.
///
/// This is the closure form underlying [`attempt!`](crate::attempt). The
/// region's frame is pushed before `body` runs and popped exactly once on
/// every exit path. If `body` completes normally, `handler` never runs and
/// its result is returned. If a throw selects this region's frame, `handler`
/// runs with the raised value bound; falling out of `handler` resolves the
/// exception. A throw from inside `handler` (including a rethrow) propagates
/// to the next-enclosing region.
///
/// The body is wrapped in [`AssertUnwindSafe`]: a transfer is never
/// observable from inside the region it exits, so upholding invariants that
/// span a throw site is the thrower's obligation, as with any use of this
/// mechanism. For the same reason the transfer must not be carried across an
/// async suspension point.
///
/// `body` and `handler` coexist as closures, so state that both touch must
/// go through interior mutability (`Cell`, `RefCell`) or be returned as the
/// region's value.
///
/// # Examples
///
/// ```rust
/// use nonlocal::{throw, try_catch, Code};
///
/// fn parse(input: &str) -> i32 {
///     match input.parse() {
///         Ok(n) => n,
///         Err(_) => throw(Code::new(22)),
///     }
/// }
///
/// let value = try_catch(|| parse("17"), |_| -1);
/// assert_eq!(value, 17);
///
/// let fallback = try_catch(|| parse("not a number"), |_| -1);
/// assert_eq!(fallback, -1);
/// ```
pub fn try_catch<T, B, H>(body: B, handler: H) -> T
where
    B: FnOnce() -> T,
    H: FnOnce(Code) -> T,
{
    let frame = stack::push();
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(payload) => match payload.downcast::<Thrown>() {
            Ok(thrown) => {
                if thrown.token != frame.token() {
                    // Aimed at an enclosing frame; keep unwinding. The frame
                    // guard pops this region on the way out.
                    panic::resume_unwind(thrown);
                }
                match stack::bind_pending(thrown.token) {
                    Some(code) => handler(code),
                    None => panic::resume_unwind(thrown),
                }
            }
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}

/// Runs `body` under an explicit root region, converting an escaped throw
/// into [`Error::Uncaught`] instead of aborting the process.
///
/// This does not change the default semantics of [`throw`]: with no
/// protected root and no enclosing region, an uncaught throw is still fatal.
/// `run_protected` is how an embedder installs a recoverable root on
/// purpose, typically at a thread or subsystem entry point.
///
/// # Errors
///
/// Returns [`Error::Uncaught`] carrying the raised code if a throw escapes
/// every region inside `body`.
///
/// # Examples
///
/// ```rust
/// use nonlocal::{run_protected, Code, Error};
///
/// let outcome = run_protected(|| nonlocal::throw(Code::new(3)));
/// assert_eq!(outcome, Err(Error::Uncaught { code: Code::new(3) }));
///
/// let fine: nonlocal::Result<&str> = run_protected(|| "ran to completion");
/// assert_eq!(fine, Ok("ran to completion"));
/// ```
pub fn run_protected<T, B>(body: B) -> Result<T>
where
    B: FnOnce() -> T,
{
    try_catch(|| Ok(body()), |code| Err(Error::Uncaught { code }))
}
