//! Scoped acquisition with guaranteed release on every exit path.
//!
//! The propagation engine guarantees that scopes between a throw site and
//! its catching frame are exited in reverse-acquisition order, but it does
//! not manage arbitrary resources itself. [`ScopeGuard`] is the collaborator
//! for that: it runs a release action exactly once when its scope is left,
//! whether by fallthrough, early return, a throw, or a foreign panic.

use std::fmt;

/// Runs a release action exactly once when dropped, on any exit path.
///
/// Created with [`guard`] or the [`defer!`](crate::defer) macro. Dropping
/// the guard runs the action; [`ScopeGuard::dismiss`] disarms it, for
/// resources whose ownership was handed off before scope exit.
///
/// The release action must not throw while an unwind is already in
/// progress; doing so is fatal (see [`throw`](crate::throw)). Release
/// actions that can only run on the normal path should use `dismiss` rather
/// than rely on that policy.
pub struct ScopeGuard<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> ScopeGuard<F> {
    /// Disarms the guard; the release action will not run.
    pub fn dismiss(mut self) {
        self.action = None;
    }
}

impl<F: FnOnce()> Drop for ScopeGuard<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl<F: FnOnce()> fmt::Debug for ScopeGuard<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("armed", &self.action.is_some())
            .finish()
    }
}

/// Arms a release action for the current scope.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
///
/// let log = RefCell::new(Vec::new());
/// {
///     let _release = nonlocal::guard(|| log.borrow_mut().push("released"));
///     log.borrow_mut().push("acquired");
/// }
/// assert_eq!(*log.borrow(), ["acquired", "released"]);
/// ```
#[must_use = "the guard releases when dropped; an unbound guard releases immediately"]
pub fn guard<F: FnOnce()>(action: F) -> ScopeGuard<F> {
    ScopeGuard {
        action: Some(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_guard_runs_on_drop() {
        let ran = Cell::new(false);
        {
            let _g = guard(|| ran.set(true));
            assert!(!ran.get());
        }
        assert!(ran.get());
    }

    #[test]
    fn test_guard_runs_exactly_once() {
        let count = Cell::new(0);
        {
            let g = guard(|| count.set(count.get() + 1));
            drop(g);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dismiss_disarms() {
        let ran = Cell::new(false);
        {
            let g = guard(|| ran.set(true));
            g.dismiss();
        }
        assert!(!ran.get());
    }

    #[test]
    fn test_guard_runs_on_early_return() {
        fn bail(ran: &Cell<bool>) -> i32 {
            let _g = guard(|| ran.set(true));
            return 7;
        }
        let ran = Cell::new(false);
        assert_eq!(bail(&ran), 7);
        assert!(ran.get());
    }
}
