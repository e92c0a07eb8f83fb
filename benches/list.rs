//! List benchmarks
//!
//! Append (with growth) and teardown of lists holding owned references.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weird_runtime::builtins::{int, list};
use weird_runtime::{Heap, Sign};

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_append");

    for len in [10usize, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut heap = Heap::new();
            let item = int::new(&mut heap, 42, Sign::Positive);
            b.iter(|| {
                let l = list::new(&mut heap);
                for _ in 0..len {
                    list::add(&mut heap, l, item);
                }
                black_box(list::length(&heap, l));
                heap.decrement(l);
            });
            heap.decrement(item);
        });
    }

    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut heap = Heap::new();
    let l = list::new(&mut heap);
    for n in 0..1_000 {
        let item = int::new(&mut heap, n, Sign::Positive);
        list::add(&mut heap, l, item);
        heap.decrement(item);
    }

    c.bench_function("list_get", |b| {
        b.iter(|| {
            for i in 0..1_000 {
                black_box(list::get(&heap, l, black_box(i)));
            }
        });
    });

    heap.decrement(l);
}

criterion_group!(benches, bench_append, bench_index);
criterion_main!(benches);
