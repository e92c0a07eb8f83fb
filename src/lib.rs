//! Weird Runtime - object model for compiled Weird programs
//!
//! This crate provides the reference-counted object heap and the builtin
//! types (bool, int, list, string) that generated code links against,
//! either from Rust or through the C ABI in [`ffi`].
//!
//! Contract violations (use-after-free, type mismatches, out-of-bounds
//! indexing) are programming errors and terminate the program; see
//! [`error::Violation`].

pub mod builtins;
pub mod error;
pub mod ffi;
pub mod heap;
pub mod logging;
pub mod objects;
pub mod runtime;

// Re-export core types
pub use error::Violation;
pub use heap::{Heap, HeapDiff, HeapStats, RefPolicy, TypeInfo};
pub use objects::{ObjRef, ObjectType, Payload, Sign};
