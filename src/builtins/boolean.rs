//! Boolean type - the TRUE and FALSE singletons
//!
//! Design: Exactly two objects exist per heap, created by [`init`] and
//! destroyed by [`finalize`]. They are immortal: increment/decrement on them
//! are no-ops, so callers may treat them like any other owned reference.

use crate::error::{fatal, Violation};
use crate::heap::{Heap, TypeInfo};
use crate::logging::debug;
use crate::objects::{ObjRef, Payload};

static BOOL_TYPE: TypeInfo = TypeInfo::simple("Bool");

#[derive(Debug, Clone, Copy)]
pub(crate) struct Booleans {
    true_obj: ObjRef,
    false_obj: ObjRef,
}

/// Create the two singletons on `heap`
pub fn init(heap: &mut Heap) {
    if heap.booleans.is_some() {
        fatal(Violation::BooleansAlreadyInitialized);
    }

    let true_obj = heap.create_immortal(BOOL_TYPE.name, BOOL_TYPE.drop, Payload::Bool(true));
    let false_obj = heap.create_immortal(BOOL_TYPE.name, BOOL_TYPE.drop, Payload::Bool(false));
    heap.booleans = Some(Booleans { true_obj, false_obj });

    debug!(true_obj = %true_obj, false_obj = %false_obj, "boolean singletons created");
}

/// Destroy the two singletons
pub fn finalize(heap: &mut Heap) {
    let booleans = heap
        .booleans
        .take()
        .unwrap_or_else(|| fatal(Violation::BooleansNotInitialized));

    heap.destroy(booleans.true_obj);
    heap.destroy(booleans.false_obj);
    debug!("boolean singletons destroyed");
}

pub fn is_initialized(heap: &Heap) -> bool {
    heap.booleans.is_some()
}

#[inline]
fn singletons(heap: &Heap) -> Booleans {
    heap.booleans
        .unwrap_or_else(|| fatal(Violation::BooleansNotInitialized))
}

pub fn true_object(heap: &Heap) -> ObjRef {
    singletons(heap).true_obj
}

pub fn false_object(heap: &Heap) -> ObjRef {
    singletons(heap).false_obj
}

/// Nonzero maps to TRUE, zero to FALSE. Never allocates.
pub fn from_int(heap: &Heap, value: i64) -> ObjRef {
    from_bool(heap, value != 0)
}

pub fn from_bool(heap: &Heap, value: bool) -> ObjRef {
    let booleans = singletons(heap);
    if value {
        booleans.true_obj
    } else {
        booleans.false_obj
    }
}

/// Return 1 for TRUE, 0 for FALSE.
///
/// Anything else is fatal, including another object with a `Bool` payload.
pub fn as_int(heap: &Heap, obj: ObjRef) -> i32 {
    let booleans = singletons(heap);
    if obj == booleans.true_obj {
        1
    } else if obj == booleans.false_obj {
        0
    } else {
        fatal(Violation::NotABoolean { handle: obj })
    }
}

pub fn is_true(heap: &Heap, obj: ObjRef) -> bool {
    as_int(heap, obj) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_with_booleans() -> Heap {
        let mut heap = Heap::new();
        init(&mut heap);
        heap
    }

    #[test]
    fn test_from_int_returns_singletons() {
        let heap = heap_with_booleans();
        let t = from_int(&heap, 1);
        assert_eq!(from_int(&heap, 42), t);
        assert_eq!(from_int(&heap, -7), t);
        assert_eq!(from_int(&heap, 0), false_object(&heap));
        assert_ne!(t, false_object(&heap));
        assert_eq!(heap.live_objects(), 2);
    }

    #[test]
    fn test_as_int_roundtrip() {
        let heap = heap_with_booleans();
        assert_eq!(as_int(&heap, from_bool(&heap, true)), 1);
        assert_eq!(as_int(&heap, from_bool(&heap, false)), 0);
        assert!(is_true(&heap, true_object(&heap)));
        assert!(!is_true(&heap, false_object(&heap)));
    }

    #[test]
    fn test_refcount_traffic_never_destroys() {
        let mut heap = heap_with_booleans();
        let t = true_object(&heap);
        let f = false_object(&heap);

        for _ in 0..10 {
            heap.decrement(t);
            heap.decrement(f);
        }
        heap.increment(t);

        assert!(heap.is_live(t));
        assert!(heap.is_live(f));
        assert_eq!(heap.type_name(t), "Bool");
        assert!(heap.is_immortal(f));
    }

    #[test]
    fn test_finalize_destroys_both() {
        let mut heap = heap_with_booleans();
        let t = true_object(&heap);
        let f = false_object(&heap);

        finalize(&mut heap);
        assert!(!is_initialized(&heap));
        assert!(!heap.is_live(t));
        assert!(!heap.is_live(f));
        assert_eq!(heap.live_objects(), 0);
    }

    #[test]
    #[should_panic(expected = "neither TRUE nor FALSE")]
    fn test_as_int_rejects_other_objects() {
        let mut heap = heap_with_booleans();
        // same payload, different identity
        let impostor = heap.create("Bool", None, Payload::Bool(true));
        as_int(&heap, impostor);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_init_is_fatal() {
        let mut heap = heap_with_booleans();
        init(&mut heap);
    }

    #[test]
    #[should_panic(expected = "not initialized")]
    fn test_use_before_init_is_fatal() {
        let heap = Heap::new();
        from_int(&heap, 1);
    }
}
