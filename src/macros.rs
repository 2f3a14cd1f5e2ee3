//! The macro surface: `attempt!`, `throw!`, `rethrow!`, and `defer!`.
//!
//! These are thin sugar over the closure-based engine in [`crate::try_catch`]
//! and friends; everything the macros can express can be written against the
//! function API directly.

/// Marks a lexical scope as a try-region, optionally with a catch-region.
///
/// The three-token shape mirrors the classic construct: a `try` block, and a
/// `catch` clause binding the caught value as a read-only local. The whole
/// expression evaluates to the value of whichever body ran.
///
/// A region with no `catch` clause arms nothing: catching is opt-in, and a
/// throw inside such a region propagates to the nearest enclosing armed
/// frame unchanged.
///
/// ```rust
/// use nonlocal::{attempt, throw, Code};
///
/// let mut seen = None;
/// attempt! {
///     try {
///         throw!(5);
///     } catch (x) {
///         seen = Some(x);
///     }
/// };
/// assert_eq!(seen, Some(Code::new(5)));
/// ```
///
/// Both bodies are expressions of the same type, so a region can also
/// produce a value: `attempt! { try { throw!(5) } catch (x) { x.value() } }`
/// evaluates to `5`. Note that a `throw!` in tail position types as `!` and
/// unifies with anything, while a `throw!` statement leaves the try-body
/// `()`-typed.
///
/// Nested regions route a throw to the innermost armed frame; a throw from
/// inside a catch-body targets the next-enclosing one:
///
/// ```rust
/// use nonlocal::{attempt, rethrow, throw, Code};
///
/// let outer = attempt! {
///     try {
///         attempt! {
///             try { throw!(8) } catch (_) { rethrow!() }
///         }
///     } catch (x) {
///         x
///     }
/// };
/// assert_eq!(outer, Code::new(8));
/// ```
#[macro_export]
macro_rules! attempt {
    (try $body:block catch (_) $handler:block) => {
        $crate::try_catch(|| $body, |_: $crate::Code| $handler)
    };
    (try $body:block catch ($bind:ident) $handler:block) => {
        $crate::try_catch(|| $body, |$bind: $crate::Code| $handler)
    };
    (try $body:block) => {{
        $body
    }};
}

/// Raises a value to the nearest enclosing armed frame. Never returns.
///
/// Accepts anything convertible into [`Code`](crate::Code), most commonly a
/// plain integer:
///
/// ```rust
/// use nonlocal::{attempt, throw, Code};
///
/// let caught = attempt! {
///     try { throw!(-2) } catch (x) { x }
/// };
/// assert_eq!(caught, Code::new(-2));
/// ```
#[macro_export]
macro_rules! throw {
    ($code:expr) => {
        $crate::throw($crate::Code::from($code))
    };
}

/// Re-raises the value bound by the innermost executing catch-body to the
/// next-enclosing frame. Never returns.
///
/// Equivalent to `throw!(x)` with the caught binding; see
/// [`rethrow`](crate::rethrow) for the usage constraints.
#[macro_export]
macro_rules! rethrow {
    () => {
        $crate::rethrow()
    };
}

/// Arms a release action that runs when the current scope is left, on any
/// exit path.
///
/// Sugar over [`guard`](crate::guard) that binds the guard to an anonymous
/// local. Multiple `defer!` statements in one scope release in reverse
/// declaration order, matching reverse-acquisition order.
///
/// ```rust
/// use std::cell::RefCell;
/// use nonlocal::defer;
///
/// let log = RefCell::new(Vec::new());
/// {
///     defer! { log.borrow_mut().push("first in, last out"); }
///     defer! { log.borrow_mut().push("last in, first out"); }
/// }
/// assert_eq!(*log.borrow(), ["last in, first out", "first in, last out"]);
/// ```
#[macro_export]
macro_rules! defer {
    ($($action:tt)*) => {
        let _guard = $crate::guard(|| {
            $($action)*
        });
    };
}
