//! C FFI - Stable ABI for generated code
//!
//! Design: Thin `extern "C"` wrappers over the thread's runtime heap:
//! 1. Runtime lifecycle (init, cleanup)
//! 2. Generic objects with C payloads and C destructors
//! 3. Reference counting (incref, decref, destroy)
//! 4. Builtin types (bool, int, list, string)
//!
//! Handles cross the boundary by value as `#[repr(C)]` [`ObjRef`]s. There is
//! no error return channel: every contract violation is fatal and aborts the
//! process, since a panic must never unwind into C frames.
//!
//! [`ObjRef`]: crate::objects::ObjRef

mod builtins;
mod object;

#[cfg(test)]
mod tests;

pub use builtins::{
    weird_bool_asint, weird_bool_fromint, weird_int_add, weird_int_eq, weird_int_new,
    weird_list_add, weird_list_getbyindex, weird_list_getlength, weird_list_new,
    weird_string_concat, weird_string_new, weird_string_to_cstring,
};
pub use object::{
    weird_object_data, weird_object_decref, weird_object_destroy, weird_object_incref,
    weird_object_new, weird_object_refcount, CDestructor,
};

use std::panic::{self, AssertUnwindSafe};
use std::process;

use crate::heap::Heap;
use crate::logging::{self, debug, error};
use crate::runtime;

/// Initialize the runtime (called once at program start)
#[no_mangle]
pub extern "C" fn weird_runtime_init() {
    guard("weird_runtime_init", runtime::init);
    debug!("FFI ready for C interop");
}

/// Tear down the runtime (called once at program exit)
#[no_mangle]
pub extern "C" fn weird_runtime_cleanup() {
    guard("weird_runtime_cleanup", || {
        runtime::cleanup();
    });
}

/// Run an entry point, aborting instead of unwinding across the boundary
#[inline]
fn guard<R>(fn_name: &'static str, f: impl FnOnce() -> R) -> R {
    logging::log_ffi_call(fn_name);
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error!(event = "ffi_abort", function = fn_name, "fatal runtime error, aborting");
            process::abort()
        }
    }
}

/// `guard` + access to the runtime heap, then any C destructors it queued
#[inline]
fn with_heap<R>(fn_name: &'static str, f: impl FnOnce(&mut Heap) -> R) -> R {
    guard(fn_name, || {
        let result = runtime::with_heap(f);
        object::run_pending_destructors();
        result
    })
}
