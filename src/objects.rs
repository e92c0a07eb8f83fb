//! Object system - unified representation for all runtime values
//!
//! Design: Every value lives in a [`Heap`](crate::heap::Heap) slot and is
//! addressed by an [`ObjRef`] handle:
//! - Handles are plain `Copy` data (index + generation), safe to pass to C
//! - The payload is a closed enum, so dispatch is an exhaustive match
//! - The type name is diagnostic only, never used for dispatch

use std::any::Any;
use std::fmt;

use crate::error::{fatal, Violation};

/// Handle to a heap object (8 bytes)
///
/// Copying a handle does not create a reference: ownership is tracked by the
/// heap's refcount, not by the handle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjRef {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the owning heap
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued for
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Object types for dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ObjectType {
    Bool = 1,
    Int = 2,
    String = 4,
    List = 5,
    Opaque = 255,
}

impl ObjectType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::String => "String",
            Self::List => "List",
            Self::Opaque => "Opaque",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object payload - different representations per type
pub enum Payload {
    Bool(bool),
    Int(IntData),
    List(ListData),
    Str(StringData),
    /// Arbitrary data registered through the generic constructor
    Opaque(Box<dyn Any>),
}

impl Payload {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Bool(_) => ObjectType::Bool,
            Self::Int(_) => ObjectType::Int,
            Self::List(_) => ObjectType::List,
            Self::Str(_) => ObjectType::String,
            Self::Opaque(_) => ObjectType::Opaque,
        }
    }

    /// Wrap any value as an opaque payload
    pub fn opaque<T: Any>(value: T) -> Self {
        Self::Opaque(Box::new(value))
    }

    /// Borrow an opaque payload as `T`, if it is one
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub(crate) fn expect_int(&self) -> &IntData {
        match self {
            Self::Int(data) => data,
            other => mismatch(ObjectType::Int, other),
        }
    }

    pub(crate) fn expect_list(&self) -> &ListData {
        match self {
            Self::List(data) => data,
            other => mismatch(ObjectType::List, other),
        }
    }

    pub(crate) fn expect_list_mut(&mut self) -> &mut ListData {
        match self {
            Self::List(data) => data,
            other => mismatch(ObjectType::List, other),
        }
    }

    pub(crate) fn expect_str(&self) -> &StringData {
        match self {
            Self::Str(data) => data,
            other => mismatch(ObjectType::String, other),
        }
    }
}

#[cold]
fn mismatch(expected: ObjectType, found: &Payload) -> ! {
    fatal(Violation::TypeMismatch {
        expected: expected.name(),
        found: found.object_type().name(),
    })
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Int(data) => f.debug_tuple("Int").field(data).finish(),
            Self::List(data) => f.debug_tuple("List").field(data).finish(),
            Self::Str(data) => f.debug_tuple("Str").field(data).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// Integer sign. Zero may carry either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Convert the `1` / `-1` convention used by generated code
    pub fn from_raw(sign: i32) -> Self {
        match sign {
            1 => Self::Positive,
            -1 => Self::Negative,
            other => fatal(Violation::InvalidSign(other)),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

/// Integer object data: sign + unsigned magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntData {
    pub sign: Sign,
    pub magnitude: u64,
}

/// List object data
///
/// `capacity` follows the list growth policy rather than whatever the
/// backing `Vec` happened to reserve.
#[derive(Debug)]
pub struct ListData {
    pub(crate) items: Vec<ObjRef>,
    pub(crate) capacity: usize,
}

impl ListData {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[ObjRef] {
        &self.items
    }
}

/// String object data: owned bytes, explicit length, no terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringData {
    pub(crate) bytes: Box<[u8]>,
}

impl StringData {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
