//! Byte-String Keyed Hash Table
//!
//! The one container every coverage structure is built from: the file table,
//! each file's line table and the prefill cache. Keys are arbitrary byte
//! strings; values are owned and handed to an optional destructor when the
//! table is torn down.

use hashbrown::HashMap;

/// Value destructor invoked once per value on teardown
pub type Destructor<V> = fn(V);

/// Hash table keyed by byte strings with a pluggable value destructor
///
/// Iteration order is unspecified. Callers that need a stable order collect
/// and sort.
#[derive(Debug)]
pub struct HashTable<V> {
    slots: HashMap<Box<[u8]>, V>,
    dtor: Option<Destructor<V>>,
}

impl<V> HashTable<V> {
    /// Create a table with an advisory capacity hint
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            dtor: None,
        }
    }

    /// Create a table whose values are passed to `dtor` on teardown
    #[must_use]
    pub fn with_destructor(capacity: usize, dtor: Destructor<V>) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            dtor: Some(dtor),
        }
    }

    /// Look up a value
    #[inline]
    #[must_use]
    pub fn find(&self, key: &[u8]) -> Option<&V> {
        self.slots.get(key)
    }

    /// Look up a value mutably
    #[inline]
    pub fn find_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        self.slots.get_mut(key)
    }

    /// Insert a value under a key that `find` reported absent
    ///
    /// Overwriting an existing key is a caller bug.
    pub fn insert(&mut self, key: &[u8], value: V) {
        let previous = self.slots.insert(key.into(), value);
        debug_assert!(previous.is_none(), "insert over an existing key");
    }

    /// Find the value for `key`, inserting `make()` first if it is absent
    ///
    /// The key is only copied into the table on a miss.
    pub fn find_or_insert_with(&mut self, key: &[u8], make: impl FnOnce() -> V) -> &mut V {
        self.slots.entry_ref(key).or_insert_with(make)
    }

    /// Visit every entry in unspecified order
    pub fn for_each(&self, mut visitor: impl FnMut(&[u8], &V)) {
        for (key, value) in &self.slots {
            visitor(key, value);
        }
    }

    /// Iterate over values in unspecified order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.values()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Release every value through the destructor, keeping the allocation
    pub fn clear(&mut self) {
        match self.dtor {
            Some(dtor) => self.slots.drain().for_each(|(_, value)| dtor(value)),
            None => self.slots.clear(),
        }
    }

    /// Release every value through the destructor, then the table itself
    pub fn destroy(mut self) {
        self.clear();
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_find_absent() {
        let table: HashTable<u32> = HashTable::new(4);
        assert!(table.find(b"missing").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_then_find() {
        let mut table = HashTable::new(4);
        table.insert(b"/srv/app/index.php", 7_u32);
        assert_eq!(table.find(b"/srv/app/index.php"), Some(&7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_or_insert_with_only_builds_on_miss() {
        let mut table = HashTable::new(4);
        let mut builds = 0;
        for _ in 0..3 {
            let value = table.find_or_insert_with(b"k", || {
                builds += 1;
                0_u32
            });
            *value += 1;
        }
        assert_eq!(builds, 1);
        assert_eq!(table.find(b"k"), Some(&3));
    }

    #[test]
    fn test_for_each_visits_every_entry() {
        let mut table = HashTable::new(4);
        table.insert(b"a", 1_u32);
        table.insert(b"b", 2);
        table.insert(b"c", 3);

        let mut keys = Vec::new();
        let mut sum = 0;
        table.for_each(|key, value| {
            keys.push(key.to_vec());
            sum += value;
        });
        keys.sort();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(sum, 6);
    }

    static DROPPED: AtomicUsize = AtomicUsize::new(0);

    fn count_drop(_: u32) {
        DROPPED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_destructor_runs_on_clear_and_drop() {
        DROPPED.store(0, Ordering::SeqCst);

        let mut table = HashTable::with_destructor(4, count_drop);
        table.insert(b"x", 1);
        table.insert(b"y", 2);
        table.clear();
        assert_eq!(DROPPED.load(Ordering::SeqCst), 2);
        assert!(table.is_empty());

        table.insert(b"z", 3);
        table.destroy();
        assert_eq!(DROPPED.load(Ordering::SeqCst), 3);
    }
}
