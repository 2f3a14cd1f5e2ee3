// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # nonlocal
//!
//! Structured, stack-discipline exception handling for Rust: raise an opaque
//! code from deep in a call chain and have it caught by the nearest
//! enclosing handler, with every resource acquired along the unwound path
//! released in reverse-acquisition order.
//!
//! Most Rust error flow belongs in `Result` and `?`. This crate is for the
//! cases where it does not: interpreter and VM runtimes implementing a guest
//! language's exception semantics, deeply recursive engines where threading
//! a `Result` through every signature costs more than it buys, and ports of
//! `setjmp`/`longjmp`-style protocols. The raised value is deliberately an
//! opaque integral [`Code`], not a typed error object; if a typed error fits
//! your problem, use `Result`.
//!
//! ## Quick Start
//!
//! ```rust
//! use nonlocal::{attempt, throw};
//!
//! fn checked_div(a: i32, b: i32) -> i32 {
//!     if b == 0 {
//!         throw!(1)
//!     }
//!     a / b
//! }
//!
//! let ok = attempt! {
//!     try { checked_div(6, 2) } catch (_) { -1 }
//! };
//! assert_eq!(ok, 3);
//!
//! let caught = attempt! {
//!     try { checked_div(1, 0) } catch (x) { x.value() - 100 }
//! };
//! assert_eq!(caught, -99);
//! ```
//!
//! ## The model
//!
//! Each thread owns a stack of *handler frames*, one per dynamically active
//! try-region, most-recently-entered on top. Entering a region pushes a
//! frame; a [`throw`] selects the nearest enclosing still-armed frame,
//! records the raised value in it, and performs a non-local transfer of
//! control to that frame's catch-region. Every scope between the throw site
//! and the catching frame is exited by the transfer itself, so drop-based
//! cleanup (see [`guard`] and [`defer!`]) runs in strict LIFO order. Leaving
//! a region on any path pops its frame exactly once.
//!
//! A throw from inside a catch-body, [`rethrow`] included, targets the
//! next-enclosing frame: the frame being handled is no longer armed. A
//! region without a catch clause arms nothing; catching is opt-in, and
//! absence of a handler means the value propagates further up, not that it
//! is suppressed.
//!
//! The transfer itself rides the platform's native stack unwinding, raised
//! via [`std::panic::resume_unwind`] so the panic hook never runs and no
//! backtrace is captured. Ordinary panics cross handler frames untouched.
//!
//! ## Fatal conditions
//!
//! An uncaught throw is fatal: with no armed frame on the thread, the
//! process aborts after a one-line diagnostic. There is no default
//! top-level handler; [`run_protected`] installs an explicit, opt-in root
//! that yields [`Error::Uncaught`] instead. Throwing from a cleanup action
//! while an unwind is already in progress is likewise fatal, resolved
//! deterministically rather than left undefined.
//!
//! ## Threads and async
//!
//! Handler stacks are strictly thread-confined; each thread starts with an
//! empty stack and throws never cross threads. The transfer is synchronous
//! and non-suspending. Carrying it across an `.await` (resuming a handler
//! whose capturing scope already yielded) is undefined and is the caller's
//! obligation to avoid.

#[macro_use]
mod macros;

mod code;
mod error;
mod frame;
mod guard;
mod stack;
mod unwind;

/// Convenient re-exports of the most commonly used types and functions.
pub mod prelude;

/// `nonlocal` Result type
///
/// A type alias for [`std::result::Result`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

pub use code::Code;
pub use error::Error;
pub use frame::{FrameFlags, FrameState};
pub use guard::{guard, ScopeGuard};
pub use stack::{HandlerStack, StackStats};
pub use unwind::{rethrow, run_protected, throw, try_catch};
