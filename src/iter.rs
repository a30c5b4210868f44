use crate::arena::{Arena, NodeId};
use crate::skiplist::SkipList;
use std::borrow::Borrow;
use std::iter::FusedIterator;

/// Ascending iterator over the level-0 chain.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    node: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, node: Option<NodeId>, remaining: usize) -> Self {
        Self {
            arena,
            node,
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.node?);
        self.node = node.next(0);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            node: self.node,
            remaining: self.remaining,
        }
    }
}

pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self(iter)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self(iter)
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Keys linked at a single level.
pub struct LevelKeys<'a, K, V> {
    arena: &'a Arena<K, V>,
    node: Option<NodeId>,
    level: usize,
}

impl<'a, K, V> LevelKeys<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, node: Option<NodeId>, level: usize) -> Self {
        Self { arena, node, level }
    }
}

impl<'a, K, V> Iterator for LevelKeys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.node?);
        self.node = node.next(self.level);
        Some(&node.key)
    }
}

/// A read cursor that can seek and step in both directions.
///
/// Stepping backwards re-runs the search for the current key, since nodes
/// only link forward.
pub struct Cursor<'a, K, V, R> {
    list: &'a SkipList<K, V, R>,
    node: Option<NodeId>,
}

impl<'a, K: Ord, V, R> Cursor<'a, K, V, R> {
    pub(crate) fn new(list: &'a SkipList<K, V, R>) -> Self {
        Self { list, node: None }
    }

    pub fn valid(&self) -> bool {
        self.node.is_some()
    }

    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        self.node.map(|id| self.list.entry(id))
    }

    pub fn key(&self) -> Option<&'a K> {
        self.current().map(|(k, _)| k)
    }

    /// Steps to the next entry. Past the end the cursor becomes invalid.
    pub fn move_next(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.next_of(Some(id), 0);
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.find_less_than(self.list.entry(id).0);
        }
    }

    /// Positions at the first entry whose key is `>= target`.
    pub fn seek<Q>(&mut self, target: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.node = self.list.find_greater_or_equal(target);
    }

    pub fn seek_to_first(&mut self) {
        self.node = self.list.next_of(None, 0);
    }

    pub fn seek_to_last(&mut self) {
        self.node = self.list.find_last();
    }
}

#[cfg(test)]
mod tests {
    use crate::options::Options;
    use crate::skiplist::SkipList;

    fn make_skipmap() -> SkipList<&'static str, u32> {
        let mut skm = SkipList::with_options(Options::default().seed(0xdeadbeef)).unwrap();
        let keys = [
            "aba", "abb", "abc", "abd", "abe", "abf", "abg", "abh", "abi", "abj", "abk", "abl",
            "abm", "abn", "abo", "abp", "abq", "abr", "abs", "abt", "abu", "abv", "abw", "abx",
            "aby", "abz",
        ];
        for (i, k) in keys.into_iter().enumerate() {
            skm.insert(k, i as u32);
        }
        skm
    }

    #[test]
    fn test_cursor_seek_valid() {
        let skm = make_skipmap();
        let mut cursor = skm.cursor();
        assert!(!cursor.valid());

        cursor.seek_to_first();
        assert!(cursor.valid());
        assert_eq!(cursor.key(), Some(&"aba"));
        cursor.move_next();
        assert_eq!(cursor.key(), Some(&"abb"));

        cursor.seek("abz");
        assert_eq!(cursor.current(), Some((&"abz", &25)));
        // go back to beginning
        cursor.seek("aba");
        assert_eq!(cursor.key(), Some(&"aba"));

        cursor.seek("");
        assert!(cursor.valid());
        cursor.move_prev();
        assert!(!cursor.valid());
        assert_eq!(cursor.current(), None);

        cursor.seek("abk1");
        assert_eq!(cursor.key(), Some(&"abl"));
        cursor.seek("ab{");
        assert!(!cursor.valid());
    }

    #[test]
    fn test_cursor_walks_both_ways() {
        let skm = make_skipmap();
        let mut cursor = skm.cursor();

        cursor.seek_to_last();
        let mut backwards = Vec::new();
        while let Some(k) = cursor.key() {
            backwards.push(*k);
            cursor.move_prev();
        }
        backwards.reverse();
        assert_eq!(backwards, skm.keys().copied().collect::<Vec<_>>());

        cursor.seek_to_first();
        let mut n = 0;
        while cursor.valid() {
            n += 1;
            cursor.move_next();
        }
        assert_eq!(n, 26);
        // stays invalid
        cursor.move_next();
        assert!(!cursor.valid());
    }

    #[test]
    fn test_cursor_on_empty() {
        let skm: SkipList<u8, u8> = SkipList::new();
        let mut cursor = skm.cursor();
        cursor.seek_to_first();
        assert!(!cursor.valid());
        cursor.seek_to_last();
        assert!(!cursor.valid());
        cursor.seek(&3);
        assert!(!cursor.valid());
    }

    #[test]
    fn test_iter_is_restartable() {
        let skm = make_skipmap();
        let iter = skm.iter();
        let again = iter.clone();
        assert_eq!(iter.count(), 26);
        assert_eq!(again.len(), 26);
        assert_eq!(skm.iter().count(), 26);
    }
}
