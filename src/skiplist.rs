use crate::arena::{Arena, Node, NodeId};
use crate::iter::{Cursor, Iter, Keys, LevelKeys, Values};
use crate::options::{Options, MAX_LEVEL_LIMIT};
use common::HeightGenerator;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};

/// Predecessor of a node at some level. `None` is the head sentinel.
type Link = Option<NodeId>;

/// An ordered map backed by a skip list.
///
/// Keys are unique and immutable once inserted: [`insert`](SkipList::insert)
/// rejects a key that is already present instead of overwriting it.
///
/// ```
/// use skipmap::SkipList;
///
/// let mut list = SkipList::new();
/// assert!(list.insert(3, "c"));
/// assert!(list.insert(1, "a"));
/// assert!(!list.insert(3, "z"));
///
/// assert_eq!(list.get(&3), Some(&"c"));
/// assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
/// ```
pub struct SkipList<K, V, R = StdRng> {
    arena: Arena<K, V>,
    head: [Link; MAX_LEVEL_LIMIT],
    heights: HeightGenerator<R>,
    max_level: usize,
    level: usize,
    len: usize,
}

impl<K: Ord, V> SkipList<K, V> {
    pub fn new() -> Self {
        Self::build(StdRng::from_entropy(), Options::default())
    }

    /// Seeds the level oracle from `options.seed` when set.
    pub fn with_options(options: Options) -> crate::Result<Self> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::build(rng, options))
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, R: RngCore> SkipList<K, V, R> {
    /// Uses `rng` for the level oracle. `options.seed` is ignored.
    pub fn with_rng(rng: R, options: Options) -> crate::Result<Self> {
        options.validate()?;
        Ok(Self::build(rng, options))
    }

    fn build(rng: R, options: Options) -> Self {
        Self {
            arena: Arena::new(),
            head: [None; MAX_LEVEL_LIMIT],
            heights: HeightGenerator::new(rng, options.max_level, options.branching_factor),
            max_level: options.max_level,
            level: 0,
            len: 0,
        }
    }

    /// Inserts `key` unless it is already present.
    ///
    /// Returns `false` and leaves the list untouched on a duplicate key.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut prevs = [None; MAX_LEVEL_LIMIT];
        if let Some(next) = self.find_predecessors(&key, &mut prevs) {
            if self.arena.get(next).key == key {
                return false;
            }
        }

        let height = self.heights.next_height();
        debug_assert!((1..=self.max_level).contains(&height));
        if height > self.level {
            // prevs above the old level still point at the head
            log::debug!("skip list grows from {} to {} levels", self.level, height);
            self.level = height;
        }

        let current = self.arena.alloc(Node::new(key, value, height));
        for (level, prev) in prevs.iter().enumerate().take(height) {
            let next = self.next_of(*prev, level);
            self.arena.get_mut(current).set_next(level, next);
            self.set_next_of(*prev, level, Some(current));
        }

        self.len += 1;
        true
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut prevs = [None; MAX_LEVEL_LIMIT];
        let target = self.find_predecessors(key, &mut prevs)?;
        if self.arena.get(target).key.borrow() != key {
            return None;
        }

        let height = self.arena.get(target).height();
        debug_assert!(height <= self.level, "node taller than the list");
        for (level, prev) in prevs.iter().enumerate().take(height) {
            debug_assert_eq!(self.next_of(*prev, level), Some(target));
            let next = self.arena.get(target).next(level);
            self.set_next_of(*prev, level, next);
        }

        let old_level = self.level;
        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level != old_level {
            log::debug!("skip list shrinks from {} to {} levels", old_level, self.level);
        }

        self.len -= 1;
        Some(self.arena.free(target).value)
    }

    /// Frees every node.
    pub fn clear(&mut self) {
        log::trace!("clearing skip list of {} entries", self.len);
        self.arena.clear();
        self.head = [None; MAX_LEVEL_LIMIT];
        self.level = 0;
        self.len = 0;
    }
}

impl<K: Ord, V, R> SkipList<K, V, R> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.arena.get(self.find_greater_or_equal(key)?);
        (node.key.borrow() == key).then_some(&node.value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.head[0].map(|id| self.entry(id))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.find_last().map(|id| self.entry(id))
    }

    /// Walks from the top occupied level down, filling `prevs` with the last
    /// node before `key` on every level. Returns the level-0 successor.
    fn find_predecessors<Q>(&self, key: &Q, prevs: &mut [Link]) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current: Link = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.arena.get(next).key.borrow() < key {
                    current = Some(next);
                } else {
                    break;
                }
            }
            prevs[level] = current;
        }
        self.next_of(current, 0)
    }

    pub(crate) fn find_greater_or_equal<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.next_of(self.find_less_than(key), 0)
    }

    pub(crate) fn find_less_than<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current: Link = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.arena.get(next).key.borrow() < key {
                    current = Some(next);
                } else {
                    break;
                }
            }
        }
        current
    }

    pub(crate) fn find_last(&self) -> Option<NodeId> {
        let mut current: Link = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                current = Some(next);
            }
        }
        current
    }

    pub fn cursor(&self) -> Cursor<'_, K, V, R> {
        Cursor::new(self)
    }

    /// Panics if the list structure is inconsistent.
    ///
    /// Checks level ordering, the subset relation between adjacent levels,
    /// the element count and the current level.
    pub fn check_invariants(&self) {
        assert!(self.level <= self.max_level);
        for level in self.level..MAX_LEVEL_LIMIT {
            assert!(self.head[level].is_none(), "head link set above level {}", self.level);
        }
        if self.level > 0 {
            assert!(self.head[self.level - 1].is_some(), "top level {} is empty", self.level);
        }

        let mut below: Option<HashSet<NodeId>> = None;
        let mut heights = Vec::with_capacity(self.len);
        let mut tallest = 0;
        for level in 0..self.level {
            let mut seen = HashSet::new();
            let mut prev: Option<&K> = None;
            let mut current = self.head[level];
            while let Some(id) = current {
                let node = self.arena.get(id);
                assert!(node.height() > level, "node linked above its height");
                if let Some(prev) = prev {
                    assert!(prev < &node.key, "level {} out of order", level);
                }
                if let Some(below) = &below {
                    assert!(below.contains(&id), "level {} not a subset of level {}", level, level - 1);
                }
                if level == 0 {
                    heights.push(node.height());
                }
                tallest = tallest.max(node.height());
                prev = Some(&node.key);
                seen.insert(id);
                current = node.next(level);
            }
            if level == 0 {
                assert_eq!(seen.len(), self.len, "level 0 length differs from len");
                assert_eq!(self.arena.len(), self.len, "arena holds unlinked nodes");
            }
            let expected = heights.iter().filter(|h| **h > level).count();
            assert_eq!(seen.len(), expected, "level {} misses nodes tall enough for it", level);
            below = Some(seen);
        }
        assert_eq!(tallest, self.level, "current level differs from tallest node");
        if self.level == 0 {
            assert_eq!(self.len, 0);
        }
    }
}

impl<K, V, R> SkipList<K, V, R> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels holding at least one node.
    pub fn current_level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.head[0], self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Keys linked at `level`, ascending. Empty for unoccupied levels.
    pub fn level_keys(&self, level: usize) -> LevelKeys<'_, K, V> {
        let start = if level < self.level { self.head[level] } else { None };
        LevelKeys::new(&self.arena, start, level)
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.arena.get(id);
        (&node.key, &node.value)
    }

    pub(crate) fn next_of(&self, prev: Link, level: usize) -> Option<NodeId> {
        match prev {
            None => self.head[level],
            Some(id) => self.arena.get(id).next(level),
        }
    }

    fn set_next_of(&mut self, prev: Link, level: usize, next: Option<NodeId>) {
        match prev {
            None => self.head[level] = next,
            Some(id) => self.arena.get_mut(id).set_next(level, next),
        }
    }
}

impl<'a, K, V, R> IntoIterator for &'a SkipList<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Debug, V: Debug, R> Debug for SkipList<K, V, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per level, top level first: `Level 1:(3, c) (9, i) `.
impl<K: Display, V: Display, R> Display for SkipList<K, V, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for level in (0..self.level).rev() {
            write!(f, "Level {}:", level)?;
            let mut current = self.head[level];
            while let Some(id) = current {
                let node = self.arena.get(id);
                write!(f, "({}, {}) ", node.key, node.value)?;
                current = node.next(level);
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
