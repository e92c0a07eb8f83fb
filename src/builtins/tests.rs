//! Tests across builtin types

use super::*;
use crate::objects::{ObjectType, Sign};

#[test]
fn test_init_and_cleanup() {
    let mut heap = Heap::new();
    init(&mut heap);
    assert!(boolean::is_initialized(&heap));
    assert_eq!(heap.stats().immortal_objects, 2);

    cleanup(&mut heap);
    assert!(!boolean::is_initialized(&heap));
    assert_eq!(heap.live_objects(), 0);
}

#[test]
fn test_list_of_integers_is_fully_released() {
    let mut heap = Heap::new();
    init(&mut heap);
    let baseline = heap.stats();

    let list = list::new(&mut heap);
    let mut numbers = Vec::new();
    for n in 1..=3 {
        let number = int::new(&mut heap, n, Sign::Positive);
        list::add(&mut heap, list, number);
        heap.decrement(number);
        numbers.push(number);
    }
    assert_eq!(heap.stats().counted_objects(), 4);

    heap.decrement(list);
    assert!(numbers.iter().all(|&number| !heap.is_live(number)));
    assert!(baseline.diff(&heap.stats()).is_empty());

    cleanup(&mut heap);
}

#[test]
fn test_mixed_list_contents() {
    let mut heap = Heap::new();
    init(&mut heap);

    let list = list::new(&mut heap);
    let t = boolean::from_int(&heap, 1);
    let n = int::from_i64(&mut heap, -5);
    let s = string::new(&mut heap, b"five");

    for item in [t, n, s] {
        list::add(&mut heap, list, item);
        heap.decrement(item);
    }

    let kinds: Vec<_> = (0..list::length(&heap, list))
        .map(|i| heap.object_type(list::get(&heap, list, i)))
        .collect();
    assert_eq!(kinds, [ObjectType::Bool, ObjectType::Int, ObjectType::String]);
    assert!(boolean::is_true(&heap, list::get(&heap, list, 0)));

    heap.decrement(list);
    // the singleton survives its list
    assert!(heap.is_live(t));
    assert_eq!(heap.stats().counted_objects(), 0);

    cleanup(&mut heap);
    assert_eq!(heap.live_objects(), 0);
}
