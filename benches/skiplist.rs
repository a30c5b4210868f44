use criterion::{criterion_group, criterion_main, Criterion};
use skipmap::{Options, SkipList};
use std::hint::black_box;

fn filled(n: u64) -> SkipList<u64, u64> {
    let mut list = SkipList::with_options(Options::default().seed(0xdeadbeef)).unwrap();
    for i in 0..n {
        list.insert(i.wrapping_mul(0x9e37_79b9_7f4a_7c15), i);
    }
    list
}

fn skiplist_insert(c: &mut Criterion) {
    c.bench_function("skiplist insert 10k", |b| {
        b.iter(|| black_box(filled(10_000)));
    });
}

fn skiplist_get_hit(c: &mut Criterion) {
    let list = filled(1_000_000);
    let key = 777_u64.wrapping_mul(0x9e37_79b9_7f4a_7c15);

    c.bench_function("skiplist get hit", |b| {
        b.iter(|| assert_eq!(Some(&777), list.get(black_box(&key))));
    });
}

fn skiplist_get_miss(c: &mut Criterion) {
    let list = filled(1_000_000);

    c.bench_function("skiplist get miss", |b| {
        b.iter(|| assert!(list.get(black_box(&1)).is_none()));
    });
}

fn skiplist_churn(c: &mut Criterion) {
    let mut list = filled(100_000);
    let mut i = 0_u64;

    c.bench_function("skiplist insert+delete", |b| {
        b.iter(|| {
            i += 1;
            // the multiplier is odd, so keys past the loaded range never collide
            let key = (100_000 + i).wrapping_mul(0x9e37_79b9_7f4a_7c15);
            assert!(list.insert(key, i));
            list.delete(&key);
        });
    });
}

criterion_group!(
    benches,
    skiplist_insert,
    skiplist_get_hit,
    skiplist_get_miss,
    skiplist_churn
);
criterion_main!(benches);
