//! IndexedMaxHeap implementation

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use super::error::HeapError;

/// One live element of the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<K, P> {
    pub identifier: K,
    pub priority: P,
}

/// Binary max-heap with an identifier -> position index.
///
/// Invariants held between calls:
/// - `positions[entries[i].identifier] == i` for every `i`, and `positions`
///   has no other keys
/// - `entries[(i - 1) / 2].priority >= entries[i].priority` for every `i > 0`
///
/// When both children of a sifted-down entry have equal priority the right
/// child is promoted. This is visible in the extraction order of tasks that
/// share a priority.
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<K, P> {
    entries: Vec<Entry<K, P>>,
    positions: HashMap<K, usize>,
}

impl<K, P> Default for IndexedMaxHeap<K, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K, P> IndexedMaxHeap<K, P>
where
    K: Eq + Hash + Clone,
    P: Ord + Copy,
{
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `identifier` is live
    pub fn contains(&self, identifier: &K) -> bool {
        self.positions.contains_key(identifier)
    }

    /// Current priority of a live identifier
    pub fn priority_of(&self, identifier: &K) -> Option<P> {
        self.positions.get(identifier).map(|&index| self.entries[index].priority)
    }

    /// The maximum entry, without removing it
    pub fn peek(&self) -> Option<&Entry<K, P>> {
        self.entries.first()
    }

    /// Iterate over live entries in array order (not priority order)
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, P>> {
        self.entries.iter()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Insert a new entry
    ///
    /// Fails with [`HeapError::DuplicateIdentifier`] if `identifier` is
    /// already live; the heap is not modified in that case.
    pub fn insert(&mut self, identifier: K, priority: P) -> Result<(), HeapError<K>> {
        if self.positions.contains_key(&identifier) {
            return Err(HeapError::DuplicateIdentifier(identifier));
        }

        let index = self.entries.len();
        self.positions.insert(identifier.clone(), index);
        self.entries.push(Entry { identifier, priority });
        self.sift_up(index);
        Ok(())
    }

    /// Remove and return the entry with the highest priority
    pub fn extract_max(&mut self) -> Result<Entry<K, P>, HeapError<K>> {
        if self.entries.is_empty() {
            return Err(HeapError::EmptyCollection);
        }

        // Park the maximum in the last slot so removal touches nothing else
        let last = self.entries.len() - 1;
        self.swap_entries(0, last);
        let entry = self.entries.swap_remove(last);
        self.positions.remove(&entry.identifier);

        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(entry)
    }

    /// Set a new priority for a live identifier, returning the previous one
    pub fn change_priority(&mut self, identifier: &K, priority: P) -> Result<P, HeapError<K>> {
        let index = *self
            .positions
            .get(identifier)
            .ok_or_else(|| HeapError::UnknownIdentifier(identifier.clone()))?;

        let previous = std::mem::replace(&mut self.entries[index].priority, priority);

        // A raised entry can only violate order against its parent, a
        // lowered one only against its children
        match priority.cmp(&previous) {
            Ordering::Greater => self.sift_up(index),
            Ordering::Less => self.sift_down(index),
            Ordering::Equal => {}
        }
        Ok(previous)
    }

    /// Check both heap invariants in O(n)
    pub fn is_valid(&self) -> bool {
        if self.positions.len() != self.entries.len() {
            return false;
        }

        self.entries.iter().enumerate().all(|(index, entry)| {
            let indexed = self.positions.get(&entry.identifier) == Some(&index);
            let ordered = index == 0 || self.entries[parent(index)].priority >= entry.priority;
            indexed && ordered
        })
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);
            if self.entries[parent].priority >= self.entries[index].priority {
                break;
            }
            self.swap_entries(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;

            // Ties go to the right child
            let child = if right < len && self.entries[right].priority >= self.entries[left].priority {
                right
            } else {
                left
            };

            if self.entries[child].priority <= self.entries[index].priority {
                break;
            }
            self.swap_entries(index, child);
            index = child;
        }
    }

    /// Swap two slots and rewrite both position bindings.
    ///
    /// This is the only place entries move, so the index can't drift from
    /// the array.
    fn swap_entries(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(position) = self.positions.get_mut(&self.entries[a].identifier) {
            *position = a;
        }
        if let Some(position) = self.positions.get_mut(&self.entries[b].identifier) {
            *position = b;
        }
    }
}

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(items: &[(u64, i64)]) -> IndexedMaxHeap<u64, i64> {
        let mut heap = IndexedMaxHeap::new();
        for &(id, priority) in items {
            heap.insert(id, priority).unwrap();
        }
        heap
    }

    fn drain_ids(heap: &mut IndexedMaxHeap<u64, i64>) -> Vec<u64> {
        let mut ids = Vec::new();
        while let Ok(entry) = heap.extract_max() {
            ids.push(entry.identifier);
        }
        ids
    }

    #[test]
    fn test_extracts_in_descending_order() {
        let mut heap = loaded(&[(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);

        let priorities: Vec<i64> = std::iter::from_fn(|| heap.extract_max().ok())
            .map(|e| e.priority)
            .collect();

        assert_eq!(priorities, vec![50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_priority_increase_promotes() {
        let mut heap = loaded(&[(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);

        assert_eq!(heap.extract_max().unwrap().identifier, 5);
        assert_eq!(heap.extract_max().unwrap().identifier, 4);

        assert_eq!(heap.change_priority(&1, 100), Ok(10));
        assert!(heap.is_valid());

        assert_eq!(heap.extract_max().unwrap(), Entry { identifier: 1, priority: 100 });
        assert_eq!(heap.extract_max().unwrap(), Entry { identifier: 3, priority: 30 });
        assert_eq!(heap.extract_max().unwrap(), Entry { identifier: 2, priority: 20 });
        assert!(heap.is_empty());
    }

    #[test]
    fn test_priority_decrease_demotes() {
        let mut heap = loaded(&[(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);

        assert_eq!(heap.change_priority(&5, 15), Ok(50));
        assert!(heap.is_valid());

        assert_eq!(drain_ids(&mut heap), vec![4, 3, 2, 5, 1]);
    }

    #[test]
    fn test_decrease_leaves_unrelated_positions_consistent() {
        let mut heap = loaded(&[(1, 70), (2, 60), (3, 50), (4, 40), (5, 30), (6, 20), (7, 10)]);

        heap.change_priority(&1, 5).unwrap();
        assert!(heap.is_valid());
        for id in 2..=7 {
            assert!(heap.contains(&id));
        }
        assert_eq!(heap.priority_of(&1), Some(5));
        assert_eq!(heap.priority_of(&4), Some(40));
        assert_eq!(drain_ids(&mut heap), vec![2, 3, 4, 5, 6, 7, 1]);
    }

    #[test]
    fn test_equal_priority_change_is_noop() {
        let mut heap = loaded(&[(1, 10), (2, 20), (3, 30)]);
        let before: Vec<_> = heap.iter().copied().collect();

        assert_eq!(heap.change_priority(&2, 20), Ok(20));

        let after: Vec<_> = heap.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sift_down_prefers_right_child_on_tie() {
        // Array after inserts: [1:10, 2:5, 3:5, 4:1]. Extracting 1 moves 4 to
        // the root with two children of equal priority.
        let mut heap = loaded(&[(1, 10), (2, 5), (3, 5), (4, 1)]);

        assert_eq!(drain_ids(&mut heap), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_extract_from_empty_is_idempotent() {
        let mut heap: IndexedMaxHeap<u64, i64> = IndexedMaxHeap::new();

        for _ in 0..3 {
            assert_eq!(heap.extract_max(), Err(HeapError::EmptyCollection));
            assert_eq!(heap.len(), 0);
            assert!(heap.is_valid());
        }
    }

    #[test]
    fn test_extract_last_entry_clears_index() {
        let mut heap = loaded(&[(8, 80)]);

        assert_eq!(heap.extract_max(), Ok(Entry { identifier: 8, priority: 80 }));
        assert!(heap.is_empty());
        assert!(heap.positions.is_empty());
        assert_eq!(heap.extract_max(), Err(HeapError::EmptyCollection));
    }

    #[test]
    fn test_round_trip_leaves_heap_empty() {
        let items: Vec<(u64, i64)> = (0..64).map(|i| (i, (i as i64 * 37) % 11)).collect();
        let mut heap = loaded(&items);
        assert_eq!(heap.len(), 64);

        let drained = drain_ids(&mut heap);
        assert_eq!(drained.len(), 64);
        assert!(heap.is_empty());
        assert!(heap.positions.is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected_without_mutation() {
        let mut heap = loaded(&[(1, 10), (2, 20)]);

        assert_eq!(heap.insert(1, 99), Err(HeapError::DuplicateIdentifier(1)));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.priority_of(&1), Some(10));
        assert!(heap.is_valid());
    }

    #[test]
    fn test_change_unknown_identifier() {
        let mut heap = loaded(&[(1, 10)]);

        assert_eq!(heap.change_priority(&9, 50), Err(HeapError::UnknownIdentifier(9)));
        assert_eq!(heap.priority_of(&1), Some(10));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_extracted_identifier_can_be_reinserted() {
        let mut heap = loaded(&[(1, 10), (2, 20)]);

        let top = heap.extract_max().unwrap();
        assert!(!heap.contains(&top.identifier));
        assert_eq!(heap.change_priority(&2, 1), Err(HeapError::UnknownIdentifier(2)));

        heap.insert(2, 50).unwrap();
        assert_eq!(heap.peek(), Some(&Entry { identifier: 2, priority: 50 }));
        assert!(heap.is_valid());
    }

    #[test]
    fn test_peek_and_clear() {
        let mut heap = loaded(&[(1, 3), (2, 9), (3, 6)]);

        assert_eq!(heap.peek().map(|e| e.identifier), Some(2));
        assert_eq!(heap.len(), 3);

        heap.clear();
        assert!(heap.is_empty());
        assert!(heap.peek().is_none());
        assert!(!heap.contains(&2));
    }

    #[test]
    fn test_string_identifiers() {
        let mut heap = IndexedMaxHeap::with_capacity(4);
        heap.insert("build".to_string(), 2).unwrap();
        heap.insert("deploy".to_string(), 1).unwrap();
        heap.change_priority(&"deploy".to_string(), 3).unwrap();

        assert_eq!(heap.extract_max().unwrap().identifier, "deploy");
    }
}
