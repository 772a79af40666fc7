//! Insertion-ordered set.
//!
//! Pairs an [`IntrusiveList`] (order) with an `FxHashMap` from element to its
//! node id (membership), which gives O(1) append, O(1) removal of any element
//! and O(1) access to the oldest element.
//!
//! ```text
//!   index: { X → id_1, Y → id_2, Z → id_3 }
//!
//!   order: head ─► [X] ◄──► [Y] ◄──► [Z] ◄── tail
//!                 oldest             newest
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
pub struct ActiveSet<T> {
    order: IntrusiveList<T>,
    index: FxHashMap<T, SlotId>,
}

impl<T> ActiveSet<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            order: IntrusiveList::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// Appends `item` as the newest element. Returns `false` if it was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }
        let id = self.order.push_back(item);
        self.index.insert(item, id);
        true
    }

    /// Removes `item` wherever it sits in the order.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.index.remove(item) {
            Some(id) => self.order.remove(id).is_some(),
            None => false,
        }
    }

    pub fn oldest(&self) -> Option<T> {
        self.order.front().copied()
    }

    /// Element at position `n`, counting from the oldest.
    pub fn nth(&self, n: usize) -> Option<T> {
        self.order
            .nth_id(n)
            .and_then(|id| self.order.get(id))
            .copied()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.order.iter().copied()
    }

    /// Copies the current order out so callers can mutate the set while walking it.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.order.debug_validate_invariants();
        assert_eq!(self.order.len(), self.index.len());
        for (item, &id) in &self.index {
            assert!(self.order.get(id) == Some(item), "index points at wrong node");
        }
    }
}

impl<T> Default for ActiveSet<T>
where
    T: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
