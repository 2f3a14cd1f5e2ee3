use std::fmt;
use std::hash::{Hash, Hasher};

/// An opaque exception code carried from a throw site to the catch site
/// that resolves it.
///
/// The propagation contract guarantees that exactly this scalar reaches the
/// catching frame; no further payload propagates. Callers typically reserve
/// ranges or constants for their own fault taxonomy:
///
/// ```rust
/// use nonlocal::Code;
///
/// const OUT_OF_MEMORY: Code = Code::new(1);
/// const IO_FAULT: Code = Code::new(2);
///
/// assert_ne!(OUT_OF_MEMORY, IO_FAULT);
/// assert_eq!(OUT_OF_MEMORY.value(), 1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Code(pub i32);

impl Code {
    /// Creates a new code from a raw value
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Code(value)
    }

    /// Returns the raw code value
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Returns true if this is the zero code
    ///
    /// Zero carries no special meaning to the engine; the catch selection is
    /// driven by frame state, never by the value. The predicate exists only
    /// because callers often reserve zero for "no fault".
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Code(value)
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for Code {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
