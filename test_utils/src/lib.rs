//! Differential testing against a `BTreeMap` reference model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op<K, V> {
    Insert(K, V),
    Get(K),
    Contains(K),
    Delete(K),
    Len,
}

/// Observable result of one [`Op`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V> {
    Inserted(bool),
    Value(Option<V>),
    Present(bool),
    Deleted(Option<V>),
    Len(usize),
}

/// Reference map with insert-if-absent semantics.
#[derive(Debug, Clone, Default)]
pub struct Model<K, V> {
    map: BTreeMap<K, V>,
}

impl<K: Ord + Clone, V: Clone> Model<K, V> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn apply(&mut self, op: &Op<K, V>) -> Outcome<V> {
        match op {
            Op::Insert(k, v) => {
                if self.map.contains_key(k) {
                    Outcome::Inserted(false)
                } else {
                    self.map.insert(k.clone(), v.clone());
                    Outcome::Inserted(true)
                }
            }
            Op::Get(k) => Outcome::Value(self.map.get(k).cloned()),
            Op::Contains(k) => Outcome::Present(self.map.contains_key(k)),
            Op::Delete(k) => Outcome::Deleted(self.map.remove(k)),
            Op::Len => Outcome::Len(self.map.len()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn entries(&self) -> Vec<(K, V)> {
        self.map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Runs every op through `apply` and the model, panicking on the first
/// diverging outcome. Returns the model for further checks.
pub fn check_against_model<K, V, F>(ops: &[Op<K, V>], mut apply: F) -> Model<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + PartialEq + Debug,
    F: FnMut(&Op<K, V>) -> Outcome<V>,
{
    let mut model = Model::new();
    for (i, op) in ops.iter().enumerate() {
        let expected = model.apply(op);
        let actual = apply(op);
        assert_eq!(actual, expected, "op #{} {:?} diverged from the model", i, op);
    }
    model
}

/// Reproducible mixed workload over keys in `0..key_space`.
pub fn random_ops(seed: u64, count: usize, key_space: u64) -> Vec<Op<u64, u64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let key_space = key_space.max(1);
    (0..count)
        .map(|_| {
            let key = rng.gen_range(0..key_space);
            match rng.gen_range(0..5) {
                0 => Op::Insert(key, rng.gen()),
                1 => Op::Contains(key),
                2 => Op::Get(key),
                3 => Op::Delete(key),
                _ => Op::Len,
            }
        })
        .collect()
}
