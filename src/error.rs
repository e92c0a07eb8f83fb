//! Contract violations - the single (fatal) error tier of the runtime
//!
//! Nothing in the object system returns a recoverable error. Every misuse of
//! the ownership contract is reported through [`fatal`], which logs the
//! violation and panics. Across the C ABI the panic becomes a process abort.

use std::fmt;

use crate::logging::error;
use crate::objects::ObjRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Handle index was never allocated by this heap
    DanglingHandle { op: &'static str, handle: ObjRef },
    /// Handle points at a slot whose object was destroyed
    UseAfterFree { op: &'static str, handle: ObjRef },
    RefcountOverflow { handle: ObjRef },
    HeapExhausted,
    TypeMismatch { expected: &'static str, found: &'static str },
    InvalidSign(i32),
    MagnitudeOverflow { lhs: u64, rhs: u64 },
    IndexOutOfBounds { index: usize, length: usize },
    NotABoolean { handle: ObjRef },
    BooleansNotInitialized,
    BooleansAlreadyInitialized,
    RuntimeNotInitialized,
    RuntimeAlreadyInitialized,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingHandle { op, handle } => {
                write!(f, "{}: handle {} does not belong to this heap", op, handle)
            }
            Self::UseAfterFree { op, handle } => {
                write!(f, "{}: object {} was already destroyed", op, handle)
            }
            Self::RefcountOverflow { handle } => {
                write!(f, "refcount overflow on object {}", handle)
            }
            Self::HeapExhausted => write!(f, "not enough memory: object heap exhausted"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::InvalidSign(sign) => {
                write!(f, "invalid integer sign {}: must be 1 or -1", sign)
            }
            Self::MagnitudeOverflow { lhs, rhs } => {
                write!(f, "integer magnitude overflow: {} + {}", lhs, rhs)
            }
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "list index {} out of bounds for length {}", index, length)
            }
            Self::NotABoolean { handle } => {
                write!(f, "object {} is neither TRUE nor FALSE", handle)
            }
            Self::BooleansNotInitialized => write!(f, "boolean singletons are not initialized"),
            Self::BooleansAlreadyInitialized => {
                write!(f, "boolean singletons are already initialized")
            }
            Self::RuntimeNotInitialized => write!(f, "runtime is not initialized on this thread"),
            Self::RuntimeAlreadyInitialized => {
                write!(f, "runtime is already initialized on this thread")
            }
        }
    }
}

impl std::error::Error for Violation {}

/// Report a contract violation and stop.
#[cold]
#[inline(never)]
#[track_caller]
pub fn fatal(violation: Violation) -> ! {
    error!(event = "contract_violation", violation = %violation, "fatal runtime error");
    panic!("{}", violation)
}
