//! # nonlocal Prelude
//!
//! This module provides a convenient prelude for the most commonly used
//! types and functions from the nonlocal library. Import this module to get
//! quick access to the essential surface for raising, catching, and scoped
//! cleanup.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all nonlocal operations
pub use crate::Error;

/// The result type used throughout nonlocal
pub use crate::Result;

/// The opaque raised value carried from throw site to catch site
pub use crate::Code;

// ================================================================================================
// Propagation Engine
// ================================================================================================

/// Raise a value to the nearest enclosing armed frame
pub use crate::throw;

/// Re-raise the innermost bound value to the next-enclosing frame
pub use crate::rethrow;

/// Run a body as an armed try-region with a handler
pub use crate::try_catch;

/// Run a body under an explicit, recoverable root region
pub use crate::run_protected;

// ================================================================================================
// Handler Stack Introspection
// ================================================================================================

/// Read-only view of the calling thread's handler stack
pub use crate::HandlerStack;

/// Push/pop accounting for pop-exactly-once verification
pub use crate::StackStats;

/// Observable per-frame lifecycle state
pub use crate::FrameState;

// ================================================================================================
// Scoped Cleanup
// ================================================================================================

/// Arm a release action for the current scope
pub use crate::guard;

/// The dismissible scope-exit guard returned by [`guard`]
pub use crate::ScopeGuard;
