//! List type - growable sequence of owned object references
//!
//! Design: Contiguous array growing by a factor of ten (10, 100, 1000, ...)
//! - Fast indexing O(1)
//! - Few reallocations for long lists
//! - Every stored element is one owned reference
//!
//! `add` increments the element but `get` does not: a handle from `get`
//! is borrowed from the list and is only valid while the list keeps that
//! slot. Use `get_owned` (or increment it yourself) to outlive the list.
//!
//! No cycle collection: a list that contains itself, directly or through
//! nested lists, is never destroyed.

use crate::error::{fatal, Violation};
use crate::heap::{Heap, TypeInfo};
use crate::logging::debug;
use crate::objects::{ListData, ObjRef, Payload};

pub const INITIAL_CAPACITY: usize = 10;
pub const GROWTH_FACTOR: usize = 10;

static LIST_TYPE: TypeInfo = TypeInfo::with_drop("List", list_drop);

/// Release every element, then the backing storage
fn list_drop(heap: &mut Heap, payload: Payload) {
    if let Payload::List(data) = payload {
        for item in data.items {
            heap.decrement(item);
        }
    }
}

/// Create a new, empty list. Returns a new reference.
pub fn new(heap: &mut Heap) -> ObjRef {
    let data = ListData {
        items: Vec::with_capacity(INITIAL_CAPACITY),
        capacity: INITIAL_CAPACITY,
    };
    LIST_TYPE.instantiate(heap, Payload::List(data))
}

/// Append `item`, taking a new reference to it.
///
/// The caller keeps its own reference and must still release it.
pub fn add(heap: &mut Heap, list: ObjRef, item: ObjRef) {
    // check the list before touching the item's refcount
    heap.payload(list).expect_list();
    heap.increment(item);

    let data = heap.payload_mut(list).expect_list_mut();
    if data.items.len() == data.capacity {
        grow(list, data);
    }
    data.items.push(item);
}

fn grow(list: ObjRef, data: &mut ListData) {
    let new_capacity = data
        .capacity
        .checked_mul(GROWTH_FACTOR)
        .unwrap_or_else(|| fatal(Violation::HeapExhausted));

    data.items.reserve_exact(new_capacity - data.items.len());
    debug!(
        event = "list_grow",
        list = %list,
        old_capacity = data.capacity,
        new_capacity,
        "resizing list"
    );
    data.capacity = new_capacity;
}

/// Look up an element by index.
///
/// Does NOT return a new reference: the list already holds one.
pub fn get(heap: &Heap, list: ObjRef, index: usize) -> ObjRef {
    let data = heap.payload(list).expect_list();
    data.items.get(index).copied().unwrap_or_else(|| {
        fatal(Violation::IndexOutOfBounds { index, length: data.items.len() })
    })
}

/// Look up an element by index. Returns a new reference.
pub fn get_owned(heap: &mut Heap, list: ObjRef, index: usize) -> ObjRef {
    let item = get(heap, list, index);
    heap.increment(item);
    item
}

pub fn length(heap: &Heap, list: ObjRef) -> usize {
    heap.payload(list).expect_list().len()
}

pub fn capacity(heap: &Heap, list: ObjRef) -> usize {
    heap.payload(list).expect_list().capacity()
}
