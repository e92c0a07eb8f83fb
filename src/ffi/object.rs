//! Object lifecycle - C API for generic objects and reference counting
//!
//! C code can store its own data in the heap: the runtime owns the object
//! header and refcount, the caller owns the pointed-to data and supplies the
//! destructor that frees it.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::{c_char, c_void, CStr};

use crate::logging::trace;
use crate::objects::{ObjRef, Payload};

use super::with_heap;

/// Destructor for C-owned object data, called once with the data pointer
pub type CDestructor = extern "C" fn(*mut c_void);

/// Opaque payload of an object created through [`weird_object_new`]
struct ForeignPayload {
    data: *mut c_void,
    destructor: Option<CDestructor>,
}

struct PendingDestructor {
    destructor: CDestructor,
    data: *mut c_void,
}

thread_local! {
    /// C destructors of objects released while the heap was borrowed
    static PENDING: RefCell<VecDeque<PendingDestructor>> =
        const { RefCell::new(VecDeque::new()) };
}

impl Drop for ForeignPayload {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor {
            let pending = PendingDestructor { destructor, data: self.data };
            PENDING.with(|queue| queue.borrow_mut().push_back(pending));
        }
    }
}

/// Run queued C destructors in release order.
///
/// Must be called with the heap released, since a destructor may release
/// references of its own (which queue further destructors).
pub(super) fn run_pending_destructors() {
    while let Some(PendingDestructor { destructor, data }) =
        PENDING.with(|queue| queue.borrow_mut().pop_front())
    {
        trace!(event = "foreign_destructor", data = ?data);
        destructor(data);
    }
}

/// Create a new object. Returns a new reference.
///
/// `destructor(data)` runs exactly once, when the object is destroyed, after
/// the runtime call that destroyed it is done with the heap. It may release
/// references to other objects it owns.
///
/// # Safety
/// `type_name` must be null or a valid NUL-terminated string. It is copied.
#[no_mangle]
pub unsafe extern "C" fn weird_object_new(
    type_name: *const c_char,
    data: *mut c_void,
    destructor: Option<CDestructor>,
) -> ObjRef {
    let type_name: Cow<'static, str> = if type_name.is_null() {
        Cow::Borrowed("Object")
    } else {
        // SAFETY: caller guarantees a valid C string
        Cow::Owned(unsafe { CStr::from_ptr(type_name) }.to_string_lossy().into_owned())
    };
    let payload = Payload::opaque(ForeignPayload { data, destructor });

    with_heap("weird_object_new", move |heap| heap.create(type_name, None, payload))
}

/// The data pointer an object was created with, or null for builtin objects
#[no_mangle]
pub extern "C" fn weird_object_data(obj: ObjRef) -> *mut c_void {
    with_heap("weird_object_data", |heap| {
        heap.payload(obj)
            .downcast_ref::<ForeignPayload>()
            .map_or(std::ptr::null_mut(), |foreign| foreign.data)
    })
}

#[no_mangle]
pub extern "C" fn weird_object_incref(obj: ObjRef) {
    with_heap("weird_object_incref", |heap| heap.increment(obj));
}

/// Release one reference, destroying the object when none remain
#[no_mangle]
pub extern "C" fn weird_object_decref(obj: ObjRef) {
    with_heap("weird_object_decref", |heap| heap.decrement(obj));
}

/// Destroy an object regardless of its refcount
#[no_mangle]
pub extern "C" fn weird_object_destroy(obj: ObjRef) {
    with_heap("weird_object_destroy", |heap| heap.destroy(obj));
}

/// Current reference count (for debugging/testing)
#[no_mangle]
pub extern "C" fn weird_object_refcount(obj: ObjRef) -> usize {
    with_heap("weird_object_refcount", |heap| heap.refcount(obj))
}
