//! String type - owned byte buffers with explicit length
//!
//! Design: Raw bytes, no encoding and no terminator inside the object.
//! Constructors copy the caller's bytes, so the object never aliases
//! memory it does not own.

use crate::heap::{Heap, TypeInfo};
use crate::objects::{ObjRef, Payload, StringData};

static STRING_TYPE: TypeInfo = TypeInfo::simple("String");

/// Create a new string from a copy of `bytes`. Returns a new reference.
pub fn new(heap: &mut Heap, bytes: &[u8]) -> ObjRef {
    from_boxed(heap, Box::from(bytes))
}

fn from_boxed(heap: &mut Heap, bytes: Box<[u8]>) -> ObjRef {
    STRING_TYPE.instantiate(heap, Payload::Str(StringData { bytes }))
}

/// Return `a` followed by `b`. Returns a new reference.
pub fn concat(heap: &mut Heap, a: ObjRef, b: ObjRef) -> ObjRef {
    let (left, right) = (as_bytes(heap, a), as_bytes(heap, b));

    let mut joined = Vec::with_capacity(left.len() + right.len());
    joined.extend_from_slice(left);
    joined.extend_from_slice(right);

    from_boxed(heap, joined.into_boxed_slice())
}

pub fn as_bytes(heap: &Heap, s: ObjRef) -> &[u8] {
    heap.payload(s).expect_str().as_bytes()
}

pub fn len(heap: &Heap, s: ObjRef) -> usize {
    heap.payload(s).expect_str().len()
}

/// Byte-wise content equality
pub fn equals(heap: &Heap, a: ObjRef, b: ObjRef) -> bool {
    as_bytes(heap, a) == as_bytes(heap, b)
}

/// Copy the contents into a NUL-terminated buffer owned by the caller.
///
/// The buffer is not an object and is not refcounted.
pub fn to_external_buffer(heap: &Heap, s: ObjRef) -> Box<[u8]> {
    let bytes = as_bytes(heap, s);
    let mut buffer = Vec::with_capacity(bytes.len() + 1);
    buffer.extend_from_slice(bytes);
    buffer.push(0);
    buffer.into_boxed_slice()
}
