use thiserror::Error;

use crate::Code;

/// The generic Error type, covering every recoverable failure this library
/// can return.
///
/// Most of the propagation machinery has no recoverable failure mode at all:
/// a throw either reaches a handler frame (and is resolved there) or the
/// condition is fatal by design — an uncaught throw with no protected root,
/// a throw from a cleanup action while an unwind is already in progress, or
/// a rethrow with nothing being handled all abort the process after a
/// one-line diagnostic. What remains recoverable surfaces here.
///
/// # Examples
///
/// ```rust
/// use nonlocal::{run_protected, Code, Error};
///
/// match run_protected(|| nonlocal::throw(Code::new(7))) {
///     Ok(()) => unreachable!("the body always throws"),
///     Err(Error::Uncaught { code }) => assert_eq!(code, Code::new(7)),
/// }
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A thrown value escaped every handler frame inside a protected root.
    ///
    /// Only [`run_protected`](crate::run_protected) produces this: the
    /// explicit root region converts what would otherwise be a fatal
    /// uncaught throw into this error, carrying the raised code unchanged.
    #[error("uncaught exception (code {code}) reached the protected root")]
    Uncaught {
        /// The raised value that no catch-region resolved.
        code: Code,
    },
}
