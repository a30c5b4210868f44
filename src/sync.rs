use crate::options::Options;
use crate::skiplist::SkipList;
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A skip list shared between threads behind one reader-writer lock.
///
/// Lookups take the read lock. Every mutation takes the write lock, so
/// mutations are fully serialized. Clones share the same list.
pub struct SharedSkipList<K, V> {
    inner: Arc<RwLock<SkipList<K, V>>>,
}

impl<K, V> Clone for SharedSkipList<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Ord, V> Default for SharedSkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> From<SkipList<K, V>> for SharedSkipList<K, V> {
    fn from(list: SkipList<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(list)),
        }
    }
}

impl<K: Ord, V> SharedSkipList<K, V> {
    pub fn new() -> Self {
        SkipList::new().into()
    }

    pub fn with_options(options: Options) -> crate::Result<Self> {
        Ok(SkipList::with_options(options)?.into())
    }

    pub fn insert(&self, key: K, value: V) -> bool {
        self.inner.write().insert(key, value)
    }

    /// Returns a copy of the value, since the lock is released on return.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains(key)
    }

    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().delete(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }

    /// Runs `f` with the read lock held.
    pub fn read<T>(&self, f: impl FnOnce(&SkipList<K, V>) -> T) -> T {
        f(&*self.inner.read())
    }

    /// Runs `f` with the write lock held. Several operations inside one call
    /// are atomic with respect to other handles.
    pub fn write<T>(&self, f: impl FnOnce(&mut SkipList<K, V>) -> T) -> T {
        f(&mut *self.inner.write())
    }

    /// Unwraps the list if this is the last handle.
    pub fn try_into_inner(self) -> Result<SkipList<K, V>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<K: Debug, V: Debug> Debug for SharedSkipList<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.inner.read(), f)
    }
}
