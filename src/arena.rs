//! Slab storage for skip list nodes.
//!
//! Nodes are addressed by a stable [`NodeId`]. Freed slots go on a free list
//! and are handed out again by later allocations.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    skips: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    /// Allocates every link up front, all empty.
    pub(crate) fn new(key: K, value: V, height: usize) -> Self {
        Self {
            key,
            value,
            skips: vec![None; height],
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.skips.len()
    }

    pub(crate) fn next(&self, level: usize) -> Option<NodeId> {
        self.skips[level]
    }

    pub(crate) fn set_next(&mut self, level: usize, node: Option<NodeId>) {
        self.skips[level] = node
    }
}

#[derive(Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Option<usize>,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.len += 1;
        match self.free {
            Some(idx) => {
                if let Slot::Vacant { next_free } = self.slots[idx] {
                    self.free = next_free;
                }
                self.slots[idx] = Slot::Occupied(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        let slot = std::mem::replace(
            &mut self.slots[id.0],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free = Some(id.0);
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => unreachable!("double free of node {}", id.0),
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node id {}", id.0),
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node id {}", id.0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::{Arena, Node};

    #[test]
    fn test_alloc_and_get() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new("a", 1, 1));
        let b = arena.alloc(Node::new("b", 2, 3));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).key, "a");
        assert_eq!(arena.get(b).value, 2);
        assert_eq!(arena.get(b).height(), 3);
        assert_eq!(arena.get(b).next(2), None);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, 1, 1));
        let b = arena.alloc(Node::new(2, 2, 1));
        let _c = arena.alloc(Node::new(3, 3, 1));

        assert_eq!(arena.free(a).key, 1);
        assert_eq!(arena.free(b).key, 2);
        assert_eq!(arena.len(), 1);

        // last freed, first reused
        assert_eq!(arena.alloc(Node::new(4, 4, 1)), b);
        assert_eq!(arena.alloc(Node::new(5, 5, 1)), a);
        assert_eq!(arena.capacity(), 3);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_links() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, 1, 2));
        let b = arena.alloc(Node::new(2, 2, 1));
        arena.get_mut(a).set_next(0, Some(b));
        assert_eq!(arena.get(a).next(0), Some(b));
        assert_eq!(arena.get(a).next(1), None);
    }

    #[test]
    #[should_panic]
    fn test_double_free_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, 1, 1));
        arena.free(a);
        arena.free(a);
    }
}
