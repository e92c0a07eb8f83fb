//! Tests for the C entry points, called the way generated code calls them

use super::*;
use crate::objects::ObjRef;
use crate::runtime;
use std::cell::Cell;
use std::ffi::{c_void, CStr};

thread_local! {
    static FREED: Cell<usize> = const { Cell::new(0) };
}

extern "C" fn free_boxed_u32(data: *mut c_void) {
    // SAFETY: created by Box::into_raw in the test below
    drop(unsafe { Box::from_raw(data.cast::<u32>()) });
    FREED.with(|freed| freed.set(freed.get() + 1));
}

/// Destructor of a C container owning one child object
extern "C" fn release_child(data: *mut c_void) {
    // SAFETY: created by Box::into_raw in the tests below
    let child = unsafe { Box::from_raw(data.cast::<ObjRef>()) };
    weird_object_decref(*child);
    FREED.with(|freed| freed.set(freed.get() + 1));
}

fn new_container(child: ObjRef) -> ObjRef {
    let data = Box::into_raw(Box::new(child)).cast::<c_void>();
    unsafe { weird_object_new(b"Container\0".as_ptr().cast(), data, Some(release_child)) }
}

#[test]
fn test_foreign_object_lifecycle() {
    weird_runtime_init();

    let data = Box::into_raw(Box::new(42u32)).cast::<c_void>();
    let name = b"Counter\0".as_ptr().cast();
    let obj = unsafe { weird_object_new(name, data, Some(free_boxed_u32)) };
    assert_eq!(weird_object_refcount(obj), 1);
    assert_eq!(weird_object_data(obj), data);
    assert_eq!(runtime::with_heap(|heap| heap.type_name(obj).to_string()), "Counter");

    weird_object_incref(obj);
    weird_object_decref(obj);
    assert_eq!(FREED.with(Cell::get), 0);

    weird_object_decref(obj);
    assert_eq!(FREED.with(Cell::get), 1);

    weird_runtime_cleanup();
}

#[test]
fn test_destroy_ignores_refcount() {
    weird_runtime_init();

    let data = Box::into_raw(Box::new(7u32)).cast::<c_void>();
    let obj = unsafe { weird_object_new(std::ptr::null(), data, Some(free_boxed_u32)) };
    weird_object_incref(obj);
    weird_object_destroy(obj);
    assert_eq!(FREED.with(Cell::get), 1);
    assert!(!runtime::with_heap(|heap| heap.is_live(obj)));

    weird_runtime_cleanup();
}

#[test]
fn test_builtin_objects_have_no_data_pointer() {
    weird_runtime_init();
    let n = weird_int_new(1, 1);
    assert!(weird_object_data(n).is_null());
    weird_object_decref(n);
    weird_runtime_cleanup();
}

#[test]
fn test_booleans() {
    weird_runtime_init();
    let t = weird_bool_fromint(2);
    let f = weird_bool_fromint(0);
    assert_ne!(t, f);
    assert_eq!(weird_bool_asint(t), 1);
    assert_eq!(weird_bool_asint(f), 0);

    // no-ops on the singletons
    weird_object_incref(t);
    weird_object_decref(t);
    weird_object_decref(t);
    assert_eq!(weird_bool_asint(t), 1);
    weird_runtime_cleanup();
}

#[test]
fn test_integer_arithmetic() {
    weird_runtime_init();
    let a = weird_int_new(5, 1);
    let b = weird_int_new(3, -1);
    let sum = weird_int_add(a, b);
    let two = weird_int_new(2, 1);

    assert_eq!(weird_int_eq(sum, two), 1);
    assert_eq!(weird_int_eq(sum, a), 0);

    for obj in [a, b, sum, two] {
        weird_object_decref(obj);
    }
    assert_eq!(runtime::cleanup().live_objects, 0);
}

#[test]
fn test_list_of_integers() {
    weird_runtime_init();
    let list = weird_list_new();
    for n in 1..=3 {
        let number = weird_int_new(n, 1);
        weird_list_add(list, number);
        weird_object_decref(number);
    }

    assert_eq!(weird_list_getlength(list), 3);
    let second = weird_list_getbyindex(list, 1);
    assert_eq!(weird_object_refcount(second), 1);
    assert_eq!(runtime::with_heap(|heap| crate::builtins::int::to_i128(heap, second)), 2);

    weird_object_decref(list);
    let stats = runtime::cleanup();
    assert_eq!(stats.live_objects, 0);
    assert_eq!(stats.total_destroyed, stats.total_created);
}

#[test]
fn test_string_round_trip_through_c_buffer() {
    weird_runtime_init();
    let hello = unsafe { weird_string_new(b"hello ".as_ptr(), 6) };
    let world = unsafe { weird_string_new(b"world".as_ptr(), 5) };
    let empty = unsafe { weird_string_new(std::ptr::null(), 0) };

    let joined = weird_string_concat(hello, world);
    let joined = {
        let tmp = weird_string_concat(joined, empty);
        weird_object_decref(joined);
        tmp
    };

    let buffer = weird_string_to_cstring(joined);
    let text = unsafe { CStr::from_ptr(buffer) }.to_string_lossy().into_owned();
    unsafe { libc::free(buffer.cast()) };
    assert_eq!(text, "hello world");

    for obj in [hello, world, empty, joined] {
        weird_object_decref(obj);
    }
    assert_eq!(runtime::cleanup().live_objects, 0);
}

#[test]
fn test_container_destructor_releases_children() {
    weird_runtime_init();
    let child = weird_int_new(5, 1);
    // the caller's reference moves into the container
    let parent = new_container(child);
    assert_eq!(weird_object_refcount(child), 1);

    weird_object_decref(parent);
    assert_eq!(FREED.with(Cell::get), 1);
    runtime::with_heap(|heap| {
        assert!(!heap.is_live(parent));
        assert!(!heap.is_live(child));
    });
    assert_eq!(runtime::cleanup().live_objects, 0);
}

#[test]
fn test_nested_containers_release_in_chain() {
    weird_runtime_init();
    let leaf = weird_int_new(1, -1);
    let inner = new_container(leaf);
    let outer = new_container(inner);

    weird_object_decref(outer);
    assert_eq!(FREED.with(Cell::get), 2);
    assert_eq!(runtime::cleanup().live_objects, 0);
}

#[test]
fn test_leaked_objects_skip_destructors_at_cleanup() {
    weird_runtime_init();
    let data = Box::into_raw(Box::new(3u32));
    unsafe { weird_object_new(std::ptr::null(), data.cast(), Some(free_boxed_u32)) };

    let stats = runtime::cleanup();
    assert_eq!(stats.live_objects, 1);
    assert_eq!(FREED.with(Cell::get), 0);

    // still owned by the caller
    assert_eq!(unsafe { *data }, 3);
    drop(unsafe { Box::from_raw(data) });
}
