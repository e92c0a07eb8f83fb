//! Builtin types - C API for bool, int, list and string objects
//!
//! Each function mirrors its counterpart in [`crate::builtins`] and keeps the
//! same ownership contract: constructors and arithmetic return a new
//! reference, lookups do not.

use std::ffi::c_char;
use std::{ptr, slice};

use crate::builtins::{boolean, int, list, string};
use crate::error::{fatal, Violation};
use crate::objects::{ObjRef, Sign};

use super::with_heap;

/// TRUE for any nonzero `value`, FALSE for zero. Not a new reference.
#[no_mangle]
pub extern "C" fn weird_bool_fromint(value: i64) -> ObjRef {
    with_heap("weird_bool_fromint", |heap| boolean::from_int(heap, value))
}

#[no_mangle]
pub extern "C" fn weird_bool_asint(obj: ObjRef) -> i32 {
    with_heap("weird_bool_asint", |heap| boolean::as_int(heap, obj))
}

/// `sign` must be 1 or -1. Returns a new reference.
#[no_mangle]
pub extern "C" fn weird_int_new(magnitude: u64, sign: i32) -> ObjRef {
    with_heap("weird_int_new", |heap| int::new(heap, magnitude, Sign::from_raw(sign)))
}

/// Return `a + b`. Returns a new reference.
#[no_mangle]
pub extern "C" fn weird_int_add(a: ObjRef, b: ObjRef) -> ObjRef {
    with_heap("weird_int_add", |heap| int::add(heap, a, b))
}

/// 1 if `a == b`, otherwise 0
#[no_mangle]
pub extern "C" fn weird_int_eq(a: ObjRef, b: ObjRef) -> i32 {
    with_heap("weird_int_eq", |heap| i32::from(int::equals(heap, a, b)))
}

#[no_mangle]
pub extern "C" fn weird_list_new() -> ObjRef {
    with_heap("weird_list_new", list::new)
}

#[no_mangle]
pub extern "C" fn weird_list_add(list: ObjRef, item: ObjRef) {
    with_heap("weird_list_add", |heap| list::add(heap, list, item));
}

/// Does NOT return a new reference: the list already holds one.
#[no_mangle]
pub extern "C" fn weird_list_getbyindex(list: ObjRef, index: usize) -> ObjRef {
    with_heap("weird_list_getbyindex", |heap| list::get(heap, list, index))
}

#[no_mangle]
pub extern "C" fn weird_list_getlength(list: ObjRef) -> usize {
    with_heap("weird_list_getlength", |heap| list::length(heap, list))
}

/// Create a string from a copy of `len` bytes. Returns a new reference.
///
/// # Safety
/// `bytes` must be valid for reads of `len` bytes. It may be null when `len`
/// is 0.
#[no_mangle]
pub unsafe extern "C" fn weird_string_new(bytes: *const u8, len: usize) -> ObjRef {
    let bytes: &[u8] = if len == 0 {
        &[]
    } else {
        // SAFETY: caller guarantees `len` readable bytes
        unsafe { slice::from_raw_parts(bytes, len) }
    };
    with_heap("weird_string_new", |heap| string::new(heap, bytes))
}

/// Return `a` followed by `b`. Returns a new reference.
#[no_mangle]
pub extern "C" fn weird_string_concat(a: ObjRef, b: ObjRef) -> ObjRef {
    with_heap("weird_string_concat", |heap| string::concat(heap, a, b))
}

/// Copy a string into a new NUL-terminated buffer.
///
/// The buffer is not an object: the caller releases it with `free`.
#[no_mangle]
pub extern "C" fn weird_string_to_cstring(s: ObjRef) -> *mut c_char {
    with_heap("weird_string_to_cstring", |heap| {
        let contents = string::to_external_buffer(heap, s);

        // SAFETY: size is nonzero, the result is checked for null before use
        let buffer = unsafe { libc::malloc(contents.len()) }.cast::<u8>();
        if buffer.is_null() {
            fatal(Violation::HeapExhausted);
        }
        // SAFETY: `buffer` holds `contents.len()` bytes and cannot overlap
        unsafe { ptr::copy_nonoverlapping(contents.as_ptr(), buffer, contents.len()) };
        buffer.cast::<c_char>()
    })
}
