//! Handler-frame representation for active try-regions.
//!
//! A frame is created when control enters a try-region and destroyed when the
//! region is left on any path. The frame records the region's lifecycle flags,
//! the last raised value, and the context token naming the region's unwind
//! boundary. Frames never leave the thread that created them.

use bitflags::bitflags;
use strum::Display;

use crate::Code;

bitflags! {
    /// Lifecycle flags tracked per handler frame.
    ///
    /// Three concerns are folded into one set: whether the frame has been
    /// armed, how the region is being exited, and whether a raised value is
    /// waiting to be consumed by the catch-region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u8 {
        /// The frame has been armed: it is on the handler stack and its
        /// unwind boundary is established.
        const INITIALIZED = 0x01;

        /// The region is being left by normal fallthrough (try-body or
        /// catch-body completed).
        const EXITING = 0x02;

        /// The region is being left by a forced unwind passing through it
        /// on the way to an enclosing frame.
        const UNWINDING = 0x04;

        /// A raised value has selected this frame and has not yet been
        /// consumed by its catch-region.
        const EXCEPTION = 0x08;

        /// The catch-region is executing with the raised value bound.
        const HANDLING = 0x10;
    }
}

/// Observable state of a handler frame, derived from its [`FrameFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FrameState {
    /// Region entered, control executing inside the try-body.
    Armed,
    /// A throw selected this frame; control is unwinding towards its
    /// catch-region and the raised value has not been bound yet.
    ExceptionPending,
    /// Control is executing inside the catch-body with the value bound.
    Handling,
    /// The region was left, normally or via rethrow; the frame is dead.
    Exited,
}

/// Opaque token naming a frame's saved unwind boundary.
///
/// Tokens are unique per thread for the lifetime of the handler stack and
/// are only meaningful while the frame that owns them is still on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextToken(pub(crate) u64);

/// One dynamically active try-region.
#[derive(Debug)]
pub(crate) struct HandlerFrame {
    /// Names this frame's unwind boundary; carried by the in-flight payload
    /// during a transfer so the boundary can verify it is the target.
    pub(crate) token: ContextToken,
    /// The last raised value, present from throw until the catch-region
    /// consumes it, and again while the catch-body runs (for rethrow).
    pub(crate) raised: Option<Code>,
    pub(crate) flags: FrameFlags,
}

impl HandlerFrame {
    pub(crate) fn new(token: ContextToken) -> Self {
        HandlerFrame {
            token,
            raised: None,
            flags: FrameFlags::INITIALIZED,
        }
    }

    /// Derives the observable state from the lifecycle flags.
    pub(crate) fn state(&self) -> FrameState {
        if self
            .flags
            .intersects(FrameFlags::EXITING | FrameFlags::UNWINDING)
        {
            FrameState::Exited
        } else if self.flags.contains(FrameFlags::HANDLING) {
            FrameState::Handling
        } else if self.flags.contains(FrameFlags::EXCEPTION) {
            FrameState::ExceptionPending
        } else {
            FrameState::Armed
        }
    }

    /// A frame is selectable by a throw only while it sits in its try-body.
    pub(crate) fn is_armed(&self) -> bool {
        self.state() == FrameState::Armed
    }

    /// Records a raised value and marks the frame exception-pending.
    pub(crate) fn arm_exception(&mut self, code: Code) {
        self.raised = Some(code);
        self.flags.insert(FrameFlags::EXCEPTION);
    }

    /// Consumes the pending value, transitioning the frame to handling.
    ///
    /// Returns `None` if no exception was pending, which means the boundary
    /// was reached by something other than a throw aimed at this frame.
    pub(crate) fn bind_exception(&mut self) -> Option<Code> {
        if !self.flags.contains(FrameFlags::EXCEPTION) {
            return None;
        }
        self.flags.remove(FrameFlags::EXCEPTION);
        self.flags.insert(FrameFlags::HANDLING);
        self.raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> HandlerFrame {
        HandlerFrame::new(ContextToken(1))
    }

    #[test]
    fn test_fresh_frame_is_armed() {
        let frame = fresh();
        assert_eq!(frame.state(), FrameState::Armed);
        assert!(frame.is_armed());
        assert!(frame.raised.is_none());
    }

    #[test]
    fn test_arm_exception_marks_pending() {
        let mut frame = fresh();
        frame.arm_exception(Code::new(5));
        assert_eq!(frame.state(), FrameState::ExceptionPending);
        assert!(!frame.is_armed());
    }

    #[test]
    fn test_bind_consumes_pending_value() {
        let mut frame = fresh();
        frame.arm_exception(Code::new(5));
        assert_eq!(frame.bind_exception(), Some(Code::new(5)));
        assert_eq!(frame.state(), FrameState::Handling);
        // A second bind finds nothing pending.
        assert_eq!(frame.bind_exception(), None);
    }

    #[test]
    fn test_bind_without_pending() {
        let mut frame = fresh();
        assert_eq!(frame.bind_exception(), None);
        assert_eq!(frame.state(), FrameState::Armed);
    }

    #[test]
    fn test_exit_flags_dominate() {
        let mut frame = fresh();
        frame.arm_exception(Code::new(9));
        frame.flags.insert(FrameFlags::UNWINDING);
        assert_eq!(frame.state(), FrameState::Exited);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(FrameState::Armed.to_string(), "Armed");
        assert_eq!(FrameState::ExceptionPending.to_string(), "ExceptionPending");
    }
}
