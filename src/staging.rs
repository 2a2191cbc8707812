// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::entry::Entry;
use crate::key::Key;

/// The staging buffer absorbs writes before bank table placement
///
/// A tiny, fully-associative buffer ordered by recency: index 0 is the newest
/// slot, index `C-1` is the drain slot. It is a shift register rather than a
/// linked list, so eviction order is exactly insertion order and worst-case
/// staleness is bounded by `C` sweep calls.
///
/// At most one slot ever holds a given key: every write path goes through
/// [`StagingBuffer::swap`], which invalidates matches before inserting.
pub struct StagingBuffer<K, V> {
    slots: Box<[Option<Entry<K, V>>]>,
}

impl<K: Key, V> StagingBuffer<K, V> {
    /// Creates a buffer with `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);

        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Count of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns the value associated with `key`, if any slot holds it.
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Whether a write that does not overwrite an existing key can succeed.
    pub fn can_insert(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Invalidates any slot holding `remove_key`, then writes
    /// `(insert_key, value)` into the newest slot.
    ///
    /// Making room at the front shifts the newest run of entries one position
    /// toward the drain end; the first free slot swallows the hole, so
    /// recency order is preserved. With `mark_valid == false` the write is
    /// suppressed and only the invalidation and shift happen.
    ///
    /// Fails (returning `false`, with the invalidation already applied) if
    /// the buffer has no free slot left.
    pub fn swap(&mut self, remove_key: K, insert_key: K, value: V, mark_valid: bool) -> bool {
        self.remove(remove_key);

        let Some(free) = self.slots.iter().position(Option::is_none) else {
            return false;
        };

        #[allow(clippy::expect_used)]
        self.slots
            .get_mut(..=free)
            .expect("slot range should be in bounds")
            .rotate_right(1);

        if mark_valid {
            *self.front_mut() = Some(Entry::new(insert_key, value));
        }

        true
    }

    /// Writes a key→value binding, replacing any staged entry for `key`.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.swap(key, key, value, true)
    }

    /// Invalidates the slot holding `key`. Returns whether one did.
    pub fn remove(&mut self, key: K) -> bool {
        let mut hit = false;

        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|entry| entry.key == key) {
                *slot = None;
                hit = true;
            }
        }

        hit
    }

    /// Takes the entry in the drain slot, then compacts.
    ///
    /// The compaction pass runs unconditionally so that older entries keep
    /// marching toward the drain end even on ticks that drained nothing;
    /// without it, a drained or removed slot would stall the queue behind it.
    pub fn sweep_out(&mut self) -> Option<Entry<K, V>> {
        let drained = self.slots.last_mut().and_then(Option::take);
        self.shift();
        drained
    }

    /// Moves every entry one position toward the drain end, if the drain slot
    /// is free.
    pub fn shift(&mut self) {
        if self.slots.last().is_some_and(Option::is_none) {
            self.slots.rotate_right(1);
        }
    }

    /// Invalidates all slots.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Iterates over occupied slots, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.slots.iter().flatten()
    }

    #[allow(clippy::expect_used)]
    fn front_mut(&mut self) -> &mut Option<Entry<K, V>> {
        self.slots.first_mut().expect("capacity should be non-zero")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn staging_insert_get() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(2, 200));

        assert_eq!(Some(&100), buf.get(1));
        assert_eq!(Some(&200), buf.get(2));
        assert_eq!(None, buf.get(3));
        assert_eq!(2, buf.len());
    }

    #[test]
    fn staging_overwrite_keeps_one_copy() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(1, 101));

        assert_eq!(Some(&101), buf.get(1));
        assert_eq!(1, buf.len());
    }

    #[test]
    fn staging_overwrite_works_when_full() {
        let mut buf = StagingBuffer::<u32, u64>::new(2);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(2, 200));
        assert!(!buf.can_insert());

        // the invalidate-first step frees the slot being overwritten
        assert!(buf.insert(2, 201));
        assert_eq!(Some(&201), buf.get(2));
        assert_eq!(Some(&100), buf.get(1));
    }

    #[test]
    fn staging_capacity_boundary() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        for key in 0..4 {
            assert!(buf.insert(key, u64::from(key)));
        }

        assert!(!buf.can_insert());
        assert!(!buf.insert(99, 99));

        assert!(buf.sweep_out().is_some());
        assert!(buf.can_insert());
        assert!(buf.insert(99, 99));
    }

    #[test]
    fn staging_drains_in_insertion_order() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        for key in [10, 20, 30, 40] {
            assert!(buf.insert(key, u64::from(key)));
        }

        let mut drained = Vec::new();
        for _ in 0..8 {
            if let Some(entry) = buf.sweep_out() {
                drained.push(entry.key);
            }
        }

        assert_eq!(vec![10, 20, 30, 40], drained);
        assert!(buf.is_empty());
    }

    #[test]
    fn staging_partial_fill_needs_shifts_to_drain() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);
        assert!(buf.insert(7, 70));

        // the entry sits in the newest slot and has to migrate to the drain
        assert!(buf.sweep_out().is_none());
        assert!(buf.sweep_out().is_none());
        assert!(buf.sweep_out().is_none());

        let entry = buf.sweep_out().expect("should drain after C shifts");
        assert_eq!(7, entry.key);
    }

    #[test]
    fn staging_remove_invalidates() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.remove(1));
        assert!(!buf.remove(1));

        assert_eq!(None, buf.get(1));
        assert!(buf.is_empty());
    }

    #[test]
    fn staging_swap_hole_keeps_order() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(2, 200));
        assert!(buf.insert(3, 300));
        assert!(buf.remove(2));

        // the hole left by the removal is consumed by the next insert
        assert!(buf.insert(4, 400));
        assert_eq!(3, buf.len());

        let mut drained = Vec::new();
        for _ in 0..8 {
            if let Some(entry) = buf.sweep_out() {
                drained.push(entry.key);
            }
        }

        // insertion order among survivors is intact
        assert_eq!(vec![1, 3, 4], drained);
    }

    #[test]
    fn staging_swap_invalid_write_only_removes() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.swap(1, 2, 200, false));

        assert_eq!(None, buf.get(1));
        assert_eq!(None, buf.get(2));
        assert!(buf.is_empty());
    }

    #[test]
    fn staging_swap_full_fails_after_invalidation() {
        let mut buf = StagingBuffer::<u32, u64>::new(2);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(2, 200));

        // 3 does not match anything, so nothing is freed and the write fails
        assert!(!buf.swap(3, 3, 300, true));
        assert_eq!(Some(&100), buf.get(1));
        assert_eq!(Some(&200), buf.get(2));
    }

    #[test]
    fn staging_clear() {
        let mut buf = StagingBuffer::<u32, u64>::new(4);

        assert!(buf.insert(1, 100));
        assert!(buf.insert(2, 200));
        buf.clear();

        assert!(buf.is_empty());
        assert!(buf.can_insert());
        assert_eq!(None, buf.get(1));
    }

    #[test]
    fn staging_single_slot() {
        let mut buf = StagingBuffer::<u32, u64>::new(1);

        assert!(buf.insert(1, 100));
        assert!(!buf.can_insert());
        assert!(!buf.insert(2, 200));

        let entry = buf.sweep_out().expect("should drain immediately");
        assert_eq!(1, entry.key);
        assert!(buf.can_insert());
    }
}
