use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use rbtree_index::RedBlackTree;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 100;

fn bench_btreeset_insert(c: &mut Criterion) {
    c.bench_function("bench btreeset insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut set = BTreeSet::new();
            for _ in 0..NUM_OF_OPERATIONS {
                set.insert(rng.next_u32());
            }
        })
    });
}

fn bench_btreeset_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = BTreeSet::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        set.insert(key);
        values.push(key);
    }

    c.bench_function("bench btreeset get", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(set.get(key));
            }
        })
    });
}

fn bench_red_black_tree_insert(c: &mut Criterion) {
    c.bench_function("bench red black tree insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut tree = RedBlackTree::new();
            for _ in 0..NUM_OF_OPERATIONS {
                tree.insert(rng.next_u32());
            }
        })
    });
}

fn bench_red_black_tree_search(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree = RedBlackTree::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        tree.insert(key);
        values.push(key);
    }

    c.bench_function("bench red black tree search", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(tree.search(key));
            }
        })
    });
}

fn bench_red_black_tree_delete_root(c: &mut Criterion) {
    c.bench_function("bench red black tree delete root", |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::new();
            for key in 0..NUM_OF_OPERATIONS {
                tree.insert(key);
            }
            while let Some(root) = tree.root() {
                black_box(tree.delete(root));
            }
        })
    });
}

fn bench_red_black_tree_walk(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree = RedBlackTree::new();
    for _ in 0..NUM_OF_OPERATIONS {
        tree.insert(rng.next_u32());
    }

    c.bench_function("bench red black tree walk", move |b| {
        b.iter(|| {
            tree.walk_in_order(|key| {
                black_box(key);
            });
            tree.walk_reverse_in_order(|key| {
                black_box(key);
            });
        })
    });
}

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_btreeset_get,
    bench_red_black_tree_insert,
    bench_red_black_tree_search,
    bench_red_black_tree_delete_root,
    bench_red_black_tree_walk,
);
criterion_main!(benches);
