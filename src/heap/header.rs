//! Object metadata - bookkeeping stored next to every payload
//!
//! Design: The header owns everything the core needs (name, count, policy,
//! destructor) so that payload types never see the core's fields.

use std::borrow::Cow;

use super::Heap;
use crate::objects::{ObjRef, Payload};

/// Teardown hook, invoked with the payload once the object is unreachable.
///
/// The heap is passed along so container payloads can release the
/// references they own. The object itself is already gone at that point.
pub type Destructor = fn(&mut Heap, Payload);

/// How the core treats increment/decrement for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPolicy {
    /// Destroyed when the last reference is released
    Counted,
    /// Refcount traffic is ignored; only an explicit destroy frees it
    Immortal,
}

/// Object header - prefixed to every payload in its heap slot
#[derive(Debug)]
pub struct ObjectHeader {
    pub(crate) type_name: Cow<'static, str>,
    pub(crate) refcount: usize,
    pub(crate) policy: RefPolicy,
    pub(crate) destructor: Option<Destructor>,
}

impl ObjectHeader {
    /// Create header for a new object: one owned reference
    #[inline]
    pub(crate) fn new(type_name: Cow<'static, str>, destructor: Option<Destructor>) -> Self {
        Self {
            type_name,
            refcount: 1,
            policy: RefPolicy::Counted,
            destructor,
        }
    }

    #[inline]
    pub(crate) fn immortal(type_name: Cow<'static, str>, destructor: Option<Destructor>) -> Self {
        Self {
            policy: RefPolicy::Immortal,
            ..Self::new(type_name, destructor)
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn refcount(&self) -> usize {
        self.refcount
    }

    pub fn policy(&self) -> RefPolicy {
        self.policy
    }
}

/// Type metadata - immutable per-type information
///
/// Shared across all instances of a builtin type.
#[derive(Debug)]
pub struct TypeInfo {
    pub name: &'static str,
    pub drop: Option<Destructor>,
}

impl TypeInfo {
    /// Type info for payloads that need no cleanup beyond being dropped
    #[inline]
    pub const fn simple(name: &'static str) -> Self {
        Self { name, drop: None }
    }

    /// Type info with custom destructor
    #[inline]
    pub const fn with_drop(name: &'static str, drop: Destructor) -> Self {
        Self { name, drop: Some(drop) }
    }

    /// Register a payload of this type with the heap
    #[inline]
    pub fn instantiate(&self, heap: &mut Heap, payload: Payload) -> ObjRef {
        heap.create(self.name, self.drop, payload)
    }
}
